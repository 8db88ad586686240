//! Domain layer
//!
//! Pure domain entities for routing configuration, with zero infrastructure
//! dependencies. A [`Route`] is the unit that may carry a per-route auth
//! override; the [`RouteRegistry`] resolves an incoming (host, path) pair to
//! the configured route over an immutable snapshot.

pub mod route;

pub use route::{AuthOverride, Route, RouteRegistry, ENABLE_GLOBAL_AUTH_ANNOTATION};
