//! Consent extension configuration, builder-first with env fallbacks.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::preferences::ConsentStatus;

/// Configuration for the consent controller. Every field has a sensible
/// default, so `ConsentConfig::default()` is a working embedded setup.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ConsentConfig {
    /// Where the file store persists the record.
    #[builder(default = default_store_path())]
    pub store_path: PathBuf,

    /// Dispatch an audit event after each successful merge, for
    /// history-tracking consumers.
    #[builder(default = true)]
    pub emit_audit_events: bool,

    /// Initial posture when nothing is persisted. Never overrides a
    /// persisted record; explicit updates overwrite per category as usual.
    #[builder(default)]
    pub default_categories: BTreeMap<String, ConsentStatus>,
}

impl ConsentConfig {
    /// Load configuration from environment variables, defaulting anything
    /// unset. `GREENLIGHT_AUDIT_EVENTS=false` (or `0`) disables audit
    /// events.
    pub fn from_env() -> Self {
        Self::builder()
            .store_path(
                env::var("GREENLIGHT_STORE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_store_path()),
            )
            .emit_audit_events(
                env::var("GREENLIGHT_AUDIT_EVENTS")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            )
            .build()
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("greenlight/consent.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_working_setup() {
        let config = ConsentConfig::default();
        assert_eq!(config.store_path, PathBuf::from("greenlight/consent.json"));
        assert!(config.emit_audit_events);
        assert!(config.default_categories.is_empty());
    }

    #[test]
    fn builder_overrides_stick() {
        let config = ConsentConfig::builder()
            .emit_audit_events(false)
            .default_categories([("collect".to_string(), ConsentStatus::Unknown)].into())
            .build();

        assert!(!config.emit_audit_events);
        assert_eq!(
            config.default_categories["collect"],
            ConsentStatus::Unknown
        );
    }
}
