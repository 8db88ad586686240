//! # Policy Store
//!
//! Snapshot holder for the cluster-wide auth policy. Each request reads an
//! immutable `Arc` snapshot; settings updates swap the whole snapshot under
//! a brief write lock, so a reconfiguration never tears a half-updated
//! config into an in-flight evaluation. Updates become visible to
//! subsequent requests only.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::config::settings::GlobalAuthConfig;

/// Shared, atomically-swappable view of the global auth policy.
#[derive(Debug, Default)]
pub struct PolicyStore {
    current: RwLock<Arc<GlobalAuthConfig>>,
}

impl PolicyStore {
    /// Create a store with the gate disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given policy.
    pub fn with_config(config: GlobalAuthConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Take an immutable snapshot of the current policy.
    pub fn snapshot(&self) -> Arc<GlobalAuthConfig> {
        // Lock poisoning only happens if an updater panicked mid-swap; the
        // stored Arc is still the last complete snapshot.
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the current policy with a new snapshot.
    pub fn update(&self, config: GlobalAuthConfig) {
        let auth_enabled = config.is_active();
        let exempt_count = config.exempt_paths.len();
        let next = Arc::new(config);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        info!(
            auth_enabled,
            exempt_count, "Applied global auth policy update"
        );
    }

    /// Parse and apply a key/value settings update in one step.
    pub fn apply_settings(&self, settings: &HashMap<String, String>) {
        self.update(GlobalAuthConfig::from_settings(settings));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{GLOBAL_AUTH_URL_SETTING, NO_AUTH_LOCATIONS_SETTING};

    #[test]
    fn test_snapshot_starts_disabled() {
        let store = PolicyStore::new();
        assert!(!store.snapshot().is_active());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_update_logs_policy_change() {
        let store = PolicyStore::new();
        store.update(GlobalAuthConfig::with_auth_url("http://auth.internal/verify").unwrap());
        assert!(logs_contain("Applied global auth policy update"));
    }

    #[test]
    fn test_update_swaps_snapshot() {
        let store = PolicyStore::new();
        let before = store.snapshot();

        store.update(GlobalAuthConfig::with_auth_url("http://auth.internal/verify").unwrap());

        let after = store.snapshot();
        assert!(after.is_active());
        // The previously taken snapshot is unaffected by the swap.
        assert!(!before.is_active());
    }

    #[test]
    fn test_apply_settings() {
        let store = PolicyStore::new();
        let settings: HashMap<String, String> = [
            (
                GLOBAL_AUTH_URL_SETTING.to_string(),
                "http://auth.internal/verify".to_string(),
            ),
            (NO_AUTH_LOCATIONS_SETTING.to_string(), "/bar".to_string()),
        ]
        .into_iter()
        .collect();

        store.apply_settings(&settings);

        let snapshot = store.snapshot();
        assert!(snapshot.is_active());
        assert!(snapshot.is_exempt("/bar"));
    }

    #[test]
    fn test_concurrent_snapshots() {
        let store = Arc::new(PolicyStore::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    if i % 2 == 0 {
                        store.update(
                            GlobalAuthConfig::with_auth_url("http://auth.internal/verify")
                                .unwrap(),
                        );
                    } else {
                        // Snapshots are always complete configs, never torn.
                        let snap = store.snapshot();
                        if snap.is_active() {
                            assert_eq!(
                                snap.auth_url.as_deref(),
                                Some("http://auth.internal/verify")
                            );
                        }
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
