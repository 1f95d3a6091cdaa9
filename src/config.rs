//! Encoder configuration
//!
//! Settings that stay fixed for the lifetime of an [`Encoder`](crate::Encoder):
//! the schema version whose type table is consulted, the charset written in
//! the XML declaration, entity expansion, debug tracing and the handling of
//! array items in literal mode.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::namespaces::XSD_NAMESPACE;

/// How array items are named when encoding with `use="literal"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayItemNaming {
    /// Every item is an `<item>` child of the array element, in both modes
    #[default]
    Item,
    /// In literal mode the array element itself is repeated once per item,
    /// with no wrapper; encoded mode is unaffected
    ElementName,
}

/// Configuration for the encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Schema namespace whose type table decides built-in primitives
    schema_version: String,
    /// Charset written into the XML declaration
    charset: String,
    /// Whether special characters are expanded to entities
    char_encoding: bool,
    /// Debug level, 0 turns tracing off
    debug_level: u8,
    /// Title used in debug trace lines
    title: String,
    /// Literal-mode array item naming
    literal_array_items: ArrayItemNaming,
    /// Only declare namespaces that were referenced during encoding
    prune_unused_namespaces: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            schema_version: XSD_NAMESPACE.to_string(),
            charset: "UTF-8".to_string(),
            char_encoding: true,
            debug_level: 0,
            title: "soapenc".to_string(),
            literal_array_items: ArrayItemNaming::default(),
            prune_unused_namespaces: false,
        }
    }
}

impl EncoderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON document; missing keys keep their
    /// default values
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the encoder cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.charset.trim().is_empty() {
            return Err(ConfigError::new("charset must not be empty")
                .with_key("charset")
                .into());
        }
        if self.schema_version.trim().is_empty() {
            return Err(ConfigError::new("schema version must not be empty")
                .with_key("schema_version")
                .into());
        }
        if self.debug_level > 9 {
            return Err(ConfigError::new(format!(
                "debug level {} is outside 0-9",
                self.debug_level
            ))
            .with_key("debug_level")
            .into());
        }
        Ok(())
    }

    /// Get the schema version
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Get the charset
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Check if entity expansion is enabled
    pub fn char_encoding(&self) -> bool {
        self.char_encoding
    }

    /// Get the debug level
    pub fn debug_level(&self) -> u8 {
        self.debug_level
    }

    /// Get the trace title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the literal-mode array item naming
    pub fn literal_array_items(&self) -> ArrayItemNaming {
        self.literal_array_items
    }

    /// Check if unused namespace declarations are pruned
    pub fn prune_unused_namespaces(&self) -> bool {
        self.prune_unused_namespaces
    }

    /// Set schema version
    pub fn with_schema_version(mut self, schema: impl Into<String>) -> Self {
        self.schema_version = schema.into();
        self
    }

    /// Set charset
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Set entity expansion
    pub fn with_char_encoding(mut self, enabled: bool) -> Self {
        self.char_encoding = enabled;
        self
    }

    /// Set debug level
    pub fn with_debug_level(mut self, level: u8) -> Self {
        self.debug_level = level;
        self
    }

    /// Set trace title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set literal-mode array item naming
    pub fn with_literal_array_items(mut self, naming: ArrayItemNaming) -> Self {
        self.literal_array_items = naming;
        self
    }

    /// Set namespace pruning
    pub fn with_prune_unused_namespaces(mut self, prune: bool) -> Self {
        self.prune_unused_namespaces = prune;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_defaults() {
        let config = EncoderConfig::default();
        assert_eq!(config.schema_version(), XSD_NAMESPACE);
        assert_eq!(config.charset(), "UTF-8");
        assert!(config.char_encoding());
        assert_eq!(config.debug_level(), 0);
        assert_eq!(config.literal_array_items(), ArrayItemNaming::Item);
        assert!(!config.prune_unused_namespaces());
    }

    #[test]
    fn test_config_builder() {
        let config = EncoderConfig::new()
            .with_charset("ISO-8859-1")
            .with_debug_level(3)
            .with_literal_array_items(ArrayItemNaming::ElementName);

        assert_eq!(config.charset(), "ISO-8859-1");
        assert_eq!(config.debug_level(), 3);
        assert_eq!(config.literal_array_items(), ArrayItemNaming::ElementName);
    }

    #[test]
    fn test_config_from_json() {
        let config = EncoderConfig::from_json_str(
            r#"{"charset": "ISO-8859-1", "literal_array_items": "element_name"}"#,
        )
        .unwrap();
        assert_eq!(config.charset(), "ISO-8859-1");
        assert_eq!(config.literal_array_items(), ArrayItemNaming::ElementName);
        assert!(config.char_encoding());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = EncoderConfig::from_json_str(r#"{"charset": " "}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = EncoderConfig::from_json_str(r#"{"debug_level": 12}"#).unwrap_err();
        assert!(err.to_string().contains("debug_level"));

        assert!(matches!(
            EncoderConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }
}
