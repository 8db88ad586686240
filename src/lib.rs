//! # Authgate
//!
//! Authgate is a global external-authentication gate for reverse-proxy and
//! ingress systems: for every inbound request to a routed path it decides
//! whether an auth sub-request must be issued to a configured external
//! endpoint, and enforces the endpoint's verdict (401 on deny, forward to
//! the route's upstream on allow).
//!
//! ## Architecture
//!
//! ```text
//! Route Registry ─┐
//!                 ├─> Auth Decision Evaluator ─> Auth Enforcement Executor
//! Policy Store  ──┘        (pure)                 (one sub-request, fail-closed)
//! ```
//!
//! The decision depends on three layered configuration sources with strict
//! precedence: the cluster-wide auth URL (empty = kill switch), the
//! cluster-wide path exemption list, and the per-route override annotation.
//! Evaluation is a pure function over immutable configuration snapshots;
//! the only side effect is the single bounded auth sub-request per enforced
//! evaluation.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use authgate::auth::{Enforcer, GatewayRequest};
//! use authgate::config::{GlobalAuthConfig, PolicyStore};
//! use authgate::domain::{Route, RouteRegistry};
//! use authgate::Gateway;
//!
//! # async fn run() -> authgate::Result<()> {
//! let routes = Arc::new(RouteRegistry::with_routes(vec![
//!     Route::new("example.test", "/foo", "http://echo.internal"),
//! ]));
//! let policy = Arc::new(PolicyStore::with_config(
//!     GlobalAuthConfig::with_auth_url("http://auth.internal/verify")?,
//! ));
//! let gateway = Gateway::new(routes, policy, Enforcer::new()?);
//!
//! let response = gateway.handle(GatewayRequest::get("example.test", "/foo")).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
mod gateway;
pub mod observability;

// Re-export commonly used types
pub use auth::{decide, AuthDecision, AuthVerdict, Enforcer};
pub use config::{GlobalAuthConfig, PolicyStore};
pub use domain::{AuthOverride, Route, RouteRegistry};
pub use errors::{AuthGateError, Result};
pub use gateway::Gateway;
pub use observability::init_tracing;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
