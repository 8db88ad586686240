//! Route domain types
//!
//! Routes map a (host, path) pair to an upstream service and optionally
//! carry a per-route override of the global authentication default. The
//! override arrives as a loosely-typed string annotation and is parsed
//! defensively into a strict tri-state: a malformed value on one route must
//! never break enforcement for its siblings.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

/// Route annotation key toggling global authentication for one route.
pub const ENABLE_GLOBAL_AUTH_ANNOTATION: &str = "enable-global-auth";

/// Per-route override of the global authentication default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthOverride {
    /// Inherit the global default (enforce when a global URL is configured)
    #[default]
    Inherit,
    /// Force-enforce authentication for this route
    Enabled,
    /// Force-skip authentication for this route
    Disabled,
}

impl AuthOverride {
    /// Parse an annotation value into the tri-state override.
    ///
    /// Accepts the usual boolean spellings (`1/t/T/true/True/TRUE` and the
    /// `0/f/false` counterparts, as Go's `strconv.ParseBool` does, since
    /// annotation values typically come from Kubernetes manifests). Anything
    /// else degrades to [`AuthOverride::Inherit`] with a warning.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "1" | "t" | "T" | "true" | "True" | "TRUE" => AuthOverride::Enabled,
            "0" | "f" | "F" | "false" | "False" | "FALSE" => AuthOverride::Disabled,
            other => {
                warn!(
                    annotation = ENABLE_GLOBAL_AUTH_ANNOTATION,
                    value = other,
                    "Unparseable auth override annotation; inheriting global default"
                );
                AuthOverride::Inherit
            }
        }
    }

    /// Extract the override from a route's annotation map.
    ///
    /// Absence of the annotation means [`AuthOverride::Inherit`].
    pub fn from_annotations(annotations: &HashMap<String, String>) -> Self {
        annotations
            .get(ENABLE_GLOBAL_AUTH_ANNOTATION)
            .map(|value| Self::parse(value))
            .unwrap_or_default()
    }
}

/// A configured (host, path) mapping to an upstream service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Virtual host the route is served under
    pub host: String,

    /// Location path prefix for route selection
    pub path: String,

    /// Base URL of the upstream service requests are forwarded to
    pub upstream: String,

    /// Per-route override of the global authentication default
    pub auth_override: AuthOverride,
}

impl Route {
    /// Create a route inheriting the global authentication default.
    pub fn new<H, P, U>(host: H, path: P, upstream: U) -> Self
    where
        H: Into<String>,
        P: Into<String>,
        U: Into<String>,
    {
        Self {
            host: host.into(),
            path: path.into(),
            upstream: upstream.into(),
            auth_override: AuthOverride::Inherit,
        }
    }

    /// Set the auth override for this route.
    pub fn with_auth_override(mut self, auth_override: AuthOverride) -> Self {
        self.auth_override = auth_override;
        self
    }

    /// Whether this route serves the given request, location-style: the
    /// route path must be a prefix of the request path ending at a path
    /// segment boundary.
    pub fn matches(&self, host: &str, request_path: &str) -> bool {
        if self.host != host {
            return false;
        }
        match request_path.strip_prefix(self.path.as_str()) {
            Some(rest) => {
                rest.is_empty() || rest.starts_with('/') || self.path.ends_with('/')
            }
            None => false,
        }
    }
}

/// Registry of configured routes, read per request as an immutable snapshot.
///
/// Population is driven by the surrounding control plane; the evaluator only
/// uses the read contract. Updates replace the whole snapshot, so resolution
/// never observes a partially-applied route set.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: RwLock<Arc<Vec<Route>>>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the given routes.
    pub fn with_routes(routes: Vec<Route>) -> Self {
        Self {
            routes: RwLock::new(Arc::new(routes)),
        }
    }

    /// Replace the full route set.
    pub fn replace(&self, routes: Vec<Route>) {
        let next = Arc::new(routes);
        match self.routes.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Snapshot of the current route set.
    pub fn snapshot(&self) -> Arc<Vec<Route>> {
        match self.routes.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Resolve the route serving the given host and request path.
    ///
    /// Longest-prefix match among matching locations, the way an ingress
    /// picks the most specific location block.
    pub fn resolve(&self, host: &str, request_path: &str) -> Option<Route> {
        self.snapshot()
            .iter()
            .filter(|route| route.matches(host, request_path))
            .max_by_key(|route| route.path.len())
            .cloned()
    }
}
