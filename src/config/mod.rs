//! # Configuration Management
//!
//! Cluster-wide policy configuration for the auth gate: the global auth URL
//! and path exemption list, the key/value settings interface that populates
//! them, and the snapshot store that makes them safely readable per request.

pub mod settings;
pub mod store;

pub use settings::{
    GlobalAuthConfig, ObservabilityConfig, GLOBAL_AUTH_URL_SETTING, NO_AUTH_LOCATIONS_SETTING,
};
pub use store::PolicyStore;
