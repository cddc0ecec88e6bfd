//! Mock construction configuration

use serde::{Deserialize, Serialize};

/// Construction options shared by every mock a builder produces
///
/// Missing fields take their defaults when deserialized, so a partial JSON
/// document such as `{"isa_method": "is_a"}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Name of the identity-check method
    pub isa_method: String,
    /// Install the default identity check when the caller declared none
    pub install_default_isa: bool,
    /// Ask the load suppressor to block the real type
    pub suppress_real_load: bool,
}

impl MockConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With identity-check method name
    #[inline]
    #[must_use]
    pub fn with_isa_method(mut self, name: impl Into<String>) -> Self {
        self.isa_method = name.into();
        self
    }

    /// Without the default identity check
    #[inline]
    #[must_use]
    pub fn without_default_isa(mut self) -> Self {
        self.install_default_isa = false;
        self
    }

    /// With real-load suppression
    #[inline]
    #[must_use]
    pub fn with_suppress_real_load(mut self, suppress: bool) -> Self {
        self.suppress_real_load = suppress;
        self
    }

    /// Parse configuration from JSON
    ///
    /// # Errors
    /// Returns the underlying `serde_json` error for invalid documents
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            isa_method: "isa".to_string(),
            install_default_isa: true,
            suppress_real_load: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MockConfig::new();
        assert_eq!(config.isa_method, "isa");
        assert!(config.install_default_isa);
        assert!(!config.suppress_real_load);
    }

    #[test]
    fn builder_methods() {
        let config = MockConfig::new()
            .with_isa_method("is_a")
            .without_default_isa()
            .with_suppress_real_load(true);
        assert_eq!(config.isa_method, "is_a");
        assert!(!config.install_default_isa);
        assert!(config.suppress_real_load);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = MockConfig::from_json(r#"{ "suppress_real_load": true }"#).unwrap();
        assert_eq!(config.isa_method, "isa");
        assert!(config.install_default_isa);
        assert!(config.suppress_real_load);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(MockConfig::from_json(r#"{ "install_default_isa": "yes" }"#).is_err());
    }
}
