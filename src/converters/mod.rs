//! XSD to JSON Schema conversion
//!
//! The pipeline runs in one direction: the raw input is normalized into a
//! [`Document`], the root's namespace declarations are resolved, the
//! [`Processor`] walks element declarations (calling back into the type
//! resolver and the restriction mapper) and the assembler wraps the result
//! into a draft-07 document.
//!
//! Nothing is kept between conversions, so a [`Converter`] can be shared
//! freely.

mod assembler;
mod config;
mod lexicon;
mod processor;
mod resolver;
mod restrictions;

pub use assembler::assemble;
pub use config::{default_overrides, AttributeOverride, ConverterConfig};
pub use lexicon::{lookup_builtin, map_builtin};
pub use processor::{ElementPath, ObjectShape, Occurs, Processor};
pub use resolver::{NamedType, SchemaIndex};
pub use restrictions::{extract_enum_values, process_simple_type};

use crate::documents::Document;
use crate::error::Result;
use crate::namespaces::resolve_namespaces;
use serde_json::Value as JsonValue;

/// Converts XSD documents into JSON Schema documents
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter with the given configuration
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert raw schema input (bytes or text) into a JSON Schema document
    pub fn convert(&self, input: impl AsRef<[u8]>) -> Result<JsonValue> {
        let document = Document::normalize_with_limits(input, self.config.limits())?;
        self.convert_document(&document)
    }

    /// Convert an already parsed schema document
    pub fn convert_document(&self, document: &Document) -> Result<JsonValue> {
        let namespaces = resolve_namespaces(&document.root);
        tracing::trace!(prefixes = namespaces.len(), "resolved namespaces");
        assemble(document, &namespaces, &self.config)
    }
}

/// Convert raw schema input with the default configuration
pub fn convert(input: impl AsRef<[u8]>) -> Result<JsonValue> {
    Converter::default().convert(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_convert_bytes_and_str_agree() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"><xs:element name="a" type="xs:int"/></xs:schema>"#;
        let from_str = convert(xsd).unwrap();
        let from_bytes = convert(xsd.as_bytes().to_vec()).unwrap();
        assert_eq!(from_str, from_bytes);
        assert_eq!(from_str["properties"]["a"], json!({"type": "integer"}));
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        assert!(matches!(convert("   "), Err(Error::EmptyInput)));
        assert!(matches!(convert("<a><b></a>"), Err(Error::MalformedXml(_))));
    }

    #[test]
    fn test_converter_without_one_of() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="c"><xs:complexType><xs:choice>
                <xs:element name="x" type="xs:string"/>
                <xs:element name="y" type="xs:string"/>
            </xs:choice></xs:complexType></xs:element>
        </xs:schema>"#;
        let converter = Converter::new(ConverterConfig::new().with_one_of(false));
        let schema = converter.convert(xsd).unwrap();
        assert!(schema["properties"]["c"].get("oneOf").is_none());
        assert_eq!(schema["properties"]["c"]["properties"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_converter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }
}
