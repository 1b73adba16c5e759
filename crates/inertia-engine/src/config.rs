//! Engine configuration fixed at startup.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Asset version advertised to the client.
#[derive(Clone, Default)]
pub enum AssetVersion {
    /// No versioning; clients never see a version mismatch.
    #[default]
    Unversioned,
    /// A fixed value (string or number).
    Fixed(Value),
    /// Computed per request by a zero-arg provider.
    Computed(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl AssetVersion {
    /// Version value for the current request.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Unversioned => Value::Null,
            Self::Fixed(value) => value.clone(),
            Self::Computed(provider) => provider(),
        }
    }
}

impl fmt::Debug for AssetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unversioned => f.write_str("Unversioned"),
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Asset version advertised to clients.
    pub version: AssetVersion,
    /// Default for `clearHistory` when the request does not override it.
    pub clear_history: bool,
    /// Default for `encryptHistory` when the request does not override it.
    pub encrypt_history: bool,
}

impl Config {
    /// Create a configuration with no versioning and plain history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise a fixed asset version.
    pub fn with_version(mut self, version: impl Into<Value>) -> Self {
        self.version = AssetVersion::Fixed(version.into());
        self
    }

    /// Compute the asset version per request.
    pub fn with_version_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.version = AssetVersion::Computed(Arc::new(provider));
        self
    }

    /// Clear client-side history state by default.
    pub fn with_clear_history(mut self, clear: bool) -> Self {
        self.clear_history = clear;
        self
    }

    /// Encrypt client-side history state by default.
    pub fn with_encrypt_history(mut self, encrypt: bool) -> Self {
        self.encrypt_history = encrypt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();

        assert_eq!(config.version.resolve(), Value::Null);
        assert!(!config.clear_history);
        assert!(!config.encrypt_history);
    }

    #[test]
    fn test_fixed_version() {
        let config = Config::new().with_version("abc123");

        assert_eq!(config.version.resolve(), json!("abc123"));
    }

    #[test]
    fn test_numeric_version() {
        let config = Config::new().with_version(42);

        assert_eq!(config.version.resolve(), json!(42));
    }

    #[test]
    fn test_computed_version_runs_per_call() {
        let config = Config::new().with_version_provider(|| json!("computed"));

        assert_eq!(config.version.resolve(), json!("computed"));
        assert_eq!(config.version.resolve(), json!("computed"));
    }

    #[test]
    fn test_history_defaults_configurable() {
        let config = Config::new()
            .with_clear_history(true)
            .with_encrypt_history(true);

        assert!(config.clear_history);
        assert!(config.encrypt_history);
    }
}
