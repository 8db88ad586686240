//! Auth decision evaluator
//!
//! Decides, per request, whether the global external-authentication gate
//! applies. The three configuration sources are checked as an ordered chain
//! of guard clauses with strict precedence:
//!
//! 1. no global auth URL configured → skip (cluster-wide kill switch)
//! 2. request path in the exemption list → skip, regardless of any
//!    per-route override
//! 3. route override `Disabled` → skip
//! 4. route override `Enabled` → enforce
//! 5. no override → enforce (the global default)
//!
//! The function is pure and total: it reads nothing but its arguments,
//! cannot fail, and re-evaluating the same inputs always yields the same
//! decision.

use crate::config::GlobalAuthConfig;
use crate::domain::{AuthOverride, Route};

/// Outcome of evaluating the global auth gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// Issue an auth sub-request to the given URL before forwarding
    Enforce(String),
    /// Forward directly, no auth sub-request
    Skip,
}

impl AuthDecision {
    /// Whether this decision requires an auth sub-request.
    pub fn is_enforced(&self) -> bool {
        matches!(self, AuthDecision::Enforce(_))
    }
}

/// Decide whether the given request must pass external authentication.
pub fn decide(global: &GlobalAuthConfig, route: &Route, request_path: &str) -> AuthDecision {
    let Some(auth_url) = global.auth_url.as_deref().filter(|url| !url.is_empty()) else {
        return AuthDecision::Skip;
    };

    // Path exemption outranks everything, including a force-enable override.
    if global.is_exempt(request_path) {
        return AuthDecision::Skip;
    }

    match route.auth_override {
        AuthOverride::Disabled => AuthDecision::Skip,
        AuthOverride::Enabled | AuthOverride::Inherit => {
            AuthDecision::Enforce(auth_url.to_string())
        }
    }
}
