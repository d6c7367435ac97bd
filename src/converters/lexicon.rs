//! Built-in XSD type table
//!
//! Maps the XSD primitive types the converter knows about to fixed JSON
//! Schema fragments. Keys are qualified with `xs:`; other built-in prefixes
//! are normalized before lookup.

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::HashMap;

/// Table of `xs:` qualified type names to JSON Schema fragments
static XSD_TO_JSON_TYPES: Lazy<HashMap<&'static str, JsonValue>> = Lazy::new(|| {
    HashMap::from([
        ("xs:string", json!({"type": "string"})),
        ("xs:integer", json!({"type": "integer"})),
        ("xs:int", json!({"type": "integer"})),
        ("xs:long", json!({"type": "integer"})),
        ("xs:short", json!({"type": "integer"})),
        ("xs:decimal", json!({"type": "number"})),
        ("xs:float", json!({"type": "number"})),
        ("xs:double", json!({"type": "number"})),
        ("xs:boolean", json!({"type": "boolean"})),
        ("xs:date", json!({"type": "string", "format": "date"})),
        ("xs:time", json!({"type": "string", "format": "time"})),
        ("xs:dateTime", json!({"type": "string", "format": "dateTime"})),
        ("xs:duration", json!({"type": "string"})),
        ("xs:anyURI", json!({"type": "string", "format": "uri"})),
        ("xs:base64Binary", json!({"type": "string", "contentEncoding": "base64"})),
        ("xs:hexBinary", json!({"type": "string"})),
        ("xs:ID", json!({"type": "string"})),
        ("xs:IDREF", json!({"type": "string"})),
        ("xs:NMTOKEN", json!({"type": "string"})),
        ("xs:token", json!({"type": "string"})),
    ])
});

/// `{"type": "string"}`
pub fn string_fragment() -> Map<String, JsonValue> {
    let mut fragment = Map::new();
    fragment.insert("type".to_string(), JsonValue::from("string"));
    fragment
}

/// `{"type": "string", "format": "dateTime"}`
pub fn date_time_fragment() -> Map<String, JsonValue> {
    let mut fragment = string_fragment();
    fragment.insert("format".to_string(), JsonValue::from("dateTime"));
    fragment
}

/// Look up a built-in type by its local name
///
/// Returns `None` for names outside the table.
pub fn lookup_builtin(local_name: &str) -> Option<Map<String, JsonValue>> {
    XSD_TO_JSON_TYPES
        .get(format!("xs:{}", local_name).as_str())
        .and_then(|value| value.as_object().cloned())
}

/// Map a built-in type by local name, defaulting to `{"type": "string"}`
pub fn map_builtin(local_name: &str) -> Map<String, JsonValue> {
    lookup_builtin(local_name).unwrap_or_else(string_fragment)
}

/// Whether a built-in local name is in the table
pub fn is_known_builtin(local_name: &str) -> bool {
    XSD_TO_JSON_TYPES.contains_key(format!("xs:{}", local_name).as_str())
}
