//! Converter configuration
//!
//! Holds the knobs of a conversion: the attribute marker, the `$schema`
//! URI, resource limits, whether choice groups emit `oneOf`, and the table
//! of attribute key overrides.

use crate::limits::Limits;
use crate::JSON_SCHEMA_DRAFT_07;
use serde::{Deserialize, Serialize};

/// Replaces the property key of one attribute at one element path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOverride {
    /// Dotted path of the enclosing element, from the document root
    pub path: String,
    /// Attribute name as declared in the schema
    pub attribute: String,
    /// Property key emitted instead of the prefixed attribute name
    pub key: String,
}

impl AttributeOverride {
    /// Create a new override
    pub fn new(
        path: impl Into<String>,
        attribute: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            attribute: attribute.into(),
            key: key.into(),
        }
    }

    /// Keep the attribute's bare name at `path`
    pub fn unprefixed(path: impl Into<String>, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self::new(path, attribute.clone(), attribute)
    }
}

/// The overrides shipped by default
///
/// `testProject` on the `TestResults` root is emitted without the attribute
/// marker; consumers of that schema expect the bare name.
pub fn default_overrides() -> Vec<AttributeOverride> {
    vec![AttributeOverride::unprefixed("TestResults", "testProject")]
}

/// Configuration for conversions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Prefix for attribute property names
    attr_prefix: String,
    /// Value of the `$schema` keyword
    schema_uri: String,
    /// Whether choice groups with several members emit `oneOf`
    one_of: bool,
    /// Resource limits
    limits: Limits,
    /// Attribute key overrides, first match wins
    attribute_overrides: Vec<AttributeOverride>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            attr_prefix: "@".to_string(),
            schema_uri: JSON_SCHEMA_DRAFT_07.to_string(),
            one_of: true,
            limits: Limits::default(),
            attribute_overrides: default_overrides(),
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get the attribute prefix
    pub fn attr_prefix(&self) -> &str {
        &self.attr_prefix
    }

    /// Get the `$schema` URI
    pub fn schema_uri(&self) -> &str {
        &self.schema_uri
    }

    /// Check if choice groups emit `oneOf`
    pub fn one_of(&self) -> bool {
        self.one_of
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Get the attribute overrides
    pub fn attribute_overrides(&self) -> &[AttributeOverride] {
        &self.attribute_overrides
    }

    /// Set attribute prefix
    pub fn with_attr_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attr_prefix = prefix.into();
        self
    }

    /// Set the `$schema` URI
    pub fn with_schema_uri(mut self, uri: impl Into<String>) -> Self {
        self.schema_uri = uri.into();
        self
    }

    /// Enable or disable `oneOf` for choice groups
    pub fn with_one_of(mut self, one_of: bool) -> Self {
        self.one_of = one_of;
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Add an attribute override
    pub fn with_attribute_override(mut self, over: AttributeOverride) -> Self {
        self.attribute_overrides.push(over);
        self
    }

    /// Remove all attribute overrides, including the default ones
    pub fn without_attribute_overrides(mut self) -> Self {
        self.attribute_overrides.clear();
        self
    }

    /// Property key for attribute `name` on the element at `path`
    pub fn attribute_key(&self, path: &str, name: &str) -> String {
        self.attribute_overrides
            .iter()
            .find(|o| o.path == path && o.attribute == name)
            .map(|o| o.key.clone())
            .unwrap_or_else(|| format!("{}{}", self.attr_prefix, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_config_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.attr_prefix(), "@");
        assert_eq!(config.schema_uri(), "http://json-schema.org/draft-07/schema#");
        assert!(config.one_of());
        assert_eq!(config.attribute_overrides().len(), 1);
    }

    #[test]
    fn test_attribute_key_default_override() {
        let config = ConverterConfig::default();
        assert_eq!(config.attribute_key("TestResults", "testProject"), "testProject");
        assert_eq!(config.attribute_key("TestResults", "other"), "@other");
        assert_eq!(config.attribute_key("TestResults.suite", "testProject"), "@testProject");
        assert_eq!(config.attribute_key("", "testProject"), "@testProject");
    }

    #[test]
    fn test_custom_overrides_and_prefix() {
        let config = ConverterConfig::new()
            .without_attribute_overrides()
            .with_attr_prefix("_")
            .with_attribute_override(AttributeOverride::new("order", "id", "orderId"));

        assert_eq!(config.attribute_key("TestResults", "testProject"), "_testProject");
        assert_eq!(config.attribute_key("order", "id"), "orderId");
        assert_eq!(config.attribute_key("order", "date"), "_date");
    }

    #[test]
    fn test_config_from_json() {
        let config = ConverterConfig::from_json(
            r#"{"attr_prefix": "-", "one_of": false, "limits": {"max_type_depth": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.attr_prefix(), "-");
        assert!(!config.one_of());
        assert_eq!(config.limits().max_type_depth, 5);
        assert_eq!(config.attribute_overrides(), default_overrides().as_slice());
    }

    #[test]
    fn test_config_from_bad_json() {
        assert!(matches!(
            ConverterConfig::from_json("{not json"),
            Err(crate::Error::Json(_))
        ));
    }
}
