//! Final document assembly
//!
//! Every `element` declaration anywhere in the schema is processed as a
//! top-level property, in document order. Nested declarations are visited
//! too, so a later declaration replaces an earlier one with the same name.
//! Named simple types with enumerations are then added as top-level
//! properties of their own.

use super::config::ConverterConfig;
use super::processor::{ElementPath, Processor};
use super::restrictions::extract_enum_values;
use crate::documents::Document;
use crate::error::Result;
use crate::namespaces::NamespaceMap;
use serde_json::{Map, Value as JsonValue};

/// Assemble the JSON Schema document for a parsed schema
pub fn assemble(
    document: &Document,
    namespaces: &NamespaceMap,
    config: &ConverterConfig,
) -> Result<JsonValue> {
    let root = &document.root;
    let processor = Processor::new(root, namespaces, config);
    let mut properties = Map::new();

    for element in root.xsd_descendants("element") {
        processor.process_element(element, &mut properties, &ElementPath::root())?;
    }

    for simple_type in root.xsd_descendants("simpleType") {
        let Some(name) = simple_type.get_non_empty_attribute("name") else {
            continue;
        };
        let enum_values = extract_enum_values(simple_type);
        if enum_values.is_empty() {
            continue;
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), JsonValue::from("string"));
        schema.insert(
            "enum".to_string(),
            JsonValue::Array(enum_values.into_iter().map(JsonValue::from).collect()),
        );
        properties.insert(name.to_string(), JsonValue::Object(schema));
    }

    tracing::debug!(
        properties = properties.len(),
        named_types = processor.index().type_count(),
        "assembled schema"
    );

    let mut schema = Map::new();
    schema.insert("$schema".to_string(), JsonValue::from(config.schema_uri()));
    schema.insert("type".to_string(), JsonValue::from("object"));
    schema.insert("properties".to_string(), JsonValue::Object(properties));
    Ok(JsonValue::Object(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::resolve_namespaces;
    use serde_json::json;

    fn assemble_str(xml: &str) -> JsonValue {
        let document = Document::from_string(xml).unwrap();
        let namespaces = resolve_namespaces(&document.root);
        assemble(&document, &namespaces, &ConverterConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_schema() {
        let schema = assemble_str(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#);
        assert_eq!(
            schema,
            json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "object",
                "properties": {}
            })
        );
    }

    #[test]
    fn test_nested_elements_surface_at_top_level() {
        let schema = assemble_str(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="code" type="xs:int"/>
                <xs:element name="box">
                    <xs:complexType>
                        <xs:sequence><xs:element name="code" type="xs:string"/></xs:sequence>
                    </xs:complexType>
                </xs:element>
            </xs:schema>"#,
        );
        let properties = schema["properties"].as_object().unwrap();
        let keys: Vec<&str> = properties.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["code", "box"]);
        // the nested declaration comes later in document order and wins
        assert_eq!(properties["code"], json!({"type": "string"}));
    }

    #[test]
    fn test_global_enumerations_added() {
        let schema = assemble_str(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="Severity">
                    <xs:restriction base="xs:string">
                        <xs:enumeration value="pass"/>
                        <xs:enumeration value="fail"/>
                    </xs:restriction>
                </xs:simpleType>
                <xs:simpleType name="Count">
                    <xs:restriction base="xs:int"/>
                </xs:simpleType>
            </xs:schema>"#,
        );
        assert_eq!(
            schema["properties"],
            json!({"Severity": {"type": "string", "enum": ["pass", "fail"]}})
        );
    }

    #[test]
    fn test_custom_schema_uri() {
        let document = Document::from_string(r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"/>"#).unwrap();
        let namespaces = resolve_namespaces(&document.root);
        let config = ConverterConfig::default().with_schema_uri("https://example.com/meta");
        let schema = assemble(&document, &namespaces, &config).unwrap();
        assert_eq!(schema["$schema"], "https://example.com/meta");
    }
}
