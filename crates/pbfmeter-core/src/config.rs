//! Metering configuration.

use serde::{Deserialize, Serialize};

/// Default prefix for meter names
pub const DEFAULT_NAMESPACE: &str = "pbf";

/// Metering configuration
///
/// Missing fields fall back to [`MeteringConfig::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteringConfig {
    /// Whether channels are wrapped at all. When `false`, no registry is
    /// created and channels pass through untouched.
    pub enabled: bool,
    /// Prefix of every meter name (`<namespace>/<category>/<dir>/...`)
    pub namespace: String,
}

impl Default for MeteringConfig {
    fn default() -> Self {
        Self { enabled: true, namespace: DEFAULT_NAMESPACE.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_metering() {
        let config = MeteringConfig::default();
        assert!(config.enabled);
        assert_eq!(config.namespace, "pbf");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: MeteringConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
    }
}
