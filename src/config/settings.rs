//! # Configuration Settings
//!
//! Defines the cluster-wide policy settings consumed by the auth gate.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::errors::{AuthGateError, Result};

/// Settings key carrying the cluster-wide external authentication URL.
pub const GLOBAL_AUTH_URL_SETTING: &str = "global-auth-url";

/// Settings key carrying the comma-separated list of auth-exempt paths.
pub const NO_AUTH_LOCATIONS_SETTING: &str = "no-auth-locations";

/// Cluster-wide external authentication policy.
///
/// An absent `auth_url` means the global gate is inactive: no route is ever
/// auth-gated, regardless of per-route overrides. Paths in `exempt_paths`
/// are compared literally against the request path (case-sensitive, no
/// trailing-slash canonicalization) and are never auth-gated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GlobalAuthConfig {
    /// External authentication endpoint (empty = gate disabled cluster-wide)
    #[validate(url(message = "Auth URL must be a valid URL"))]
    pub auth_url: Option<String>,

    /// Paths never subject to global authentication
    pub exempt_paths: BTreeSet<String>,
}

impl GlobalAuthConfig {
    /// Build a config with the given auth URL and no exemptions.
    ///
    /// Fails when the URL is not a valid http/https URL; use
    /// [`GlobalAuthConfig::from_settings`] for the lenient settings path.
    pub fn with_auth_url<S: Into<String>>(auth_url: S) -> Result<Self> {
        let auth_url = auth_url.into();
        validate_auth_url(&auth_url)?;
        Ok(Self {
            auth_url: Some(auth_url),
            exempt_paths: BTreeSet::new(),
        })
    }

    /// Whether the global gate is active at all.
    pub fn is_active(&self) -> bool {
        self.auth_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Whether the given request path is exempt from authentication.
    ///
    /// Exact, case-sensitive match; multiple entries are OR-combined.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.contains(path)
    }

    /// Parse policy settings from the key/value settings interface.
    ///
    /// Recognized keys are [`GLOBAL_AUTH_URL_SETTING`] and
    /// [`NO_AUTH_LOCATIONS_SETTING`]; unknown keys are ignored. This path is
    /// lenient: an unparseable auth URL disables the gate with a warning
    /// instead of failing the whole settings update.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let auth_url = settings
            .get(GLOBAL_AUTH_URL_SETTING)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .and_then(|raw| match validate_auth_url(raw) {
                Ok(()) => Some(raw.to_string()),
                Err(error) => {
                    warn!(
                        setting = GLOBAL_AUTH_URL_SETTING,
                        value = raw,
                        %error,
                        "Ignoring invalid global auth URL; gate disabled"
                    );
                    None
                }
            });

        let exempt_paths = settings
            .get(NO_AUTH_LOCATIONS_SETTING)
            .map(|raw| parse_exempt_paths(raw))
            .unwrap_or_default();

        Self {
            auth_url,
            exempt_paths,
        }
    }
}

/// Parse the comma-separated exemption list, trimming whitespace and
/// dropping empty entries.
fn parse_exempt_paths(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_auth_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| AuthGateError::config(format!("Invalid auth URL '{}': {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AuthGateError::config(format!(
            "Unsupported auth URL scheme '{}': expected http or https",
            other
        ))),
    }
}

/// Observability configuration for the embedding process
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config_is_inactive() {
        let config = GlobalAuthConfig::default();
        assert!(!config.is_active());
        assert!(config.exempt_paths.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_auth_url() {
        let config = GlobalAuthConfig::with_auth_url("http://auth.internal/verify").unwrap();
        assert!(config.is_active());
        assert_eq!(
            config.auth_url.as_deref(),
            Some("http://auth.internal/verify")
        );
    }

    #[test]
    fn test_with_auth_url_rejects_bad_scheme() {
        assert!(GlobalAuthConfig::with_auth_url("ftp://auth.internal").is_err());
        assert!(GlobalAuthConfig::with_auth_url("not a url").is_err());
    }

    #[test]
    fn test_from_settings_parses_url_and_exemptions() {
        let config = GlobalAuthConfig::from_settings(&settings(&[
            (GLOBAL_AUTH_URL_SETTING, "http://auth.internal/verify"),
            (NO_AUTH_LOCATIONS_SETTING, "/bar, /healthz ,,"),
        ]));

        assert!(config.is_active());
        assert!(config.is_exempt("/bar"));
        assert!(config.is_exempt("/healthz"));
        assert!(!config.is_exempt("/foo"));
        assert!(!config.is_exempt(""));
    }

    #[test]
    fn test_from_settings_invalid_url_disables_gate() {
        let config = GlobalAuthConfig::from_settings(&settings(&[
            (GLOBAL_AUTH_URL_SETTING, "::not-a-url::"),
            (NO_AUTH_LOCATIONS_SETTING, "/bar"),
        ]));

        assert!(!config.is_active());
        // The exemption list still parses; settings are independent.
        assert!(config.is_exempt("/bar"));
    }

    #[test]
    fn test_from_settings_missing_keys() {
        let config = GlobalAuthConfig::from_settings(&HashMap::new());
        assert_eq!(config, GlobalAuthConfig::default());
    }

    #[test]
    fn test_observability_defaults() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logging);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = GlobalAuthConfig::from_settings(&settings(&[
            (GLOBAL_AUTH_URL_SETTING, "http://auth.internal/verify"),
            (NO_AUTH_LOCATIONS_SETTING, "/bar,/healthz"),
        ]));

        // Snapshots are exposed to debug/status endpoints as JSON.
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalAuthConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_exemption_match_is_exact_and_case_sensitive() {
        let config = GlobalAuthConfig::from_settings(&settings(&[(
            NO_AUTH_LOCATIONS_SETTING,
            "/bar",
        )]));

        assert!(config.is_exempt("/bar"));
        assert!(!config.is_exempt("/bar/"));
        assert!(!config.is_exempt("/Bar"));
        assert!(!config.is_exempt("/bar/baz"));
    }
}
