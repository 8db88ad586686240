//! # Error Handling
//!
//! Error types for the authgate library. Note that an auth-service failure
//! is deliberately *not* an error: the enforcer maps it to a `Deny` verdict
//! (fail-closed). Errors here surface only from configuration handling and
//! upstream forwarding.

mod types;

pub use types::{AuthGateError, Result};
