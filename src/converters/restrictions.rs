//! Simple type restrictions
//!
//! Converts a `simpleType` (named or inline) into a JSON Schema fragment:
//! the restriction base picks the primitive type, enumerations become
//! `enum`, and length, pattern and bound facets map onto the matching
//! JSON Schema keywords.

use super::lexicon::string_fragment;
use crate::documents::Element;
use crate::namespaces::{split_qname, NamespaceMap};
use serde_json::{Map, Number, Value as JsonValue};

/// Facets copied as integers
const LENGTH_FACETS: [(&str, &str); 2] = [("minLength", "minLength"), ("maxLength", "maxLength")];

/// Facets copied as integers or floats, with their JSON Schema keyword
const BOUND_FACETS: [(&str, &str); 4] = [
    ("minInclusive", "minimum"),
    ("maxInclusive", "maximum"),
    ("minExclusive", "exclusiveMinimum"),
    ("maxExclusive", "exclusiveMaximum"),
];

/// Convert a simple type definition to a JSON Schema fragment
pub fn process_simple_type(simple_type: &Element, namespaces: &NamespaceMap) -> Map<String, JsonValue> {
    let mut schema = string_fragment();
    let restriction = simple_type.first_xsd_descendant("restriction");

    if let Some(base) = restriction.and_then(|r| builtin_base(r, namespaces)) {
        match base {
            "integer" | "int" | "long" | "short" => {
                schema.insert("type".to_string(), JsonValue::from("integer"));
            }
            "decimal" | "float" | "double" => {
                schema.insert("type".to_string(), JsonValue::from("number"));
            }
            "boolean" => {
                schema.insert("type".to_string(), JsonValue::from("boolean"));
            }
            "dateTime" => {
                schema.insert("format".to_string(), JsonValue::from("dateTime"));
            }
            _ => {}
        }
    }

    let enum_values = extract_enum_values(simple_type);
    if !enum_values.is_empty() {
        schema.insert(
            "enum".to_string(),
            JsonValue::Array(enum_values.into_iter().map(JsonValue::from).collect()),
        );
    }

    if let Some(restriction) = restriction {
        add_facets(restriction, &mut schema);
    }

    schema
}

/// Collect the `value` of every enumeration below a simple type, in document order
pub fn extract_enum_values(simple_type: &Element) -> Vec<String> {
    simple_type
        .xsd_descendants("enumeration")
        .filter_map(|e| e.get_attribute("value"))
        .map(str::to_string)
        .collect()
}

/// Local name of a restriction base when it is an XSD built-in
fn builtin_base<'a>(restriction: &'a Element, namespaces: &NamespaceMap) -> Option<&'a str> {
    match split_qname(restriction.get_attribute("base")?) {
        (Some(prefix), local) if namespaces.is_builtin_prefix(prefix) => Some(local),
        _ => None,
    }
}

/// Copy the facets that are direct children of `restriction` onto `schema`
fn add_facets(restriction: &Element, schema: &mut Map<String, JsonValue>) {
    for (facet, keyword) in LENGTH_FACETS {
        if let Some(value) = facet_value(restriction, facet) {
            match value.trim().parse::<i64>() {
                Ok(length) => {
                    schema.insert(keyword.to_string(), JsonValue::from(length));
                }
                Err(_) => tracing::debug!(facet, value, "dropping non-integer length facet"),
            }
        }
    }

    if let Some(pattern) = facet_value(restriction, "pattern") {
        schema.insert("pattern".to_string(), JsonValue::from(pattern));
    }

    for (facet, keyword) in BOUND_FACETS {
        if let Some(value) = facet_value(restriction, facet) {
            match parse_number(value) {
                Some(number) => {
                    schema.insert(keyword.to_string(), JsonValue::Number(number));
                }
                None => tracing::debug!(facet, value, "dropping non-numeric bound facet"),
            }
        }
    }
}

/// Non-empty `value` of the first direct facet child named `facet`
fn facet_value<'a>(restriction: &'a Element, facet: &str) -> Option<&'a str> {
    restriction
        .first_xsd_child(facet)
        .and_then(|f| f.get_non_empty_attribute("value"))
}

/// Parse a facet value as an integer, falling back to a finite float
///
/// Integer literals of any size are kept exact.
fn parse_number(value: &str) -> Option<Number> {
    let value = value.trim();
    if let Ok(integer) = value.parse::<i64>() {
        return Some(Number::from(integer));
    }
    if let Some(integer) = big_integer(value) {
        return Some(integer);
    }
    value.parse::<f64>().ok().and_then(Number::from_f64)
}

/// An optionally signed run of digits too large for `i64`
fn big_integer(value: &str) -> Option<Number> {
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    let literal = if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };
    literal.parse::<Number>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::namespaces::resolve_namespaces;
    use serde_json::json;

    fn convert_simple(body: &str) -> JsonValue {
        let xml = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"><xs:simpleType name="T">{}</xs:simpleType></xs:schema>"#,
            body
        );
        let doc = Document::from_string(&xml).unwrap();
        let namespaces = resolve_namespaces(&doc.root);
        let simple_type = doc.root.first_xsd_child("simpleType").unwrap();
        JsonValue::Object(process_simple_type(simple_type, &namespaces))
    }

    #[test]
    fn test_enumeration() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:string">
                <xs:enumeration value="admin"/>
                <xs:enumeration value="user"/>
                <xs:enumeration value="guest"/>
            </xs:restriction>"#,
        );
        assert_eq!(schema, json!({"type": "string", "enum": ["admin", "user", "guest"]}));
    }

    #[test]
    fn test_integer_bounds() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:integer">
                <xs:minInclusive value="18"/>
                <xs:maxInclusive value="120"/>
            </xs:restriction>"#,
        );
        assert_eq!(schema, json!({"type": "integer", "minimum": 18, "maximum": 120}));
    }

    #[test]
    fn test_string_facets() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:string">
                <xs:minLength value="3"/>
                <xs:maxLength value="20"/>
                <xs:pattern value="[a-z]\d+"/>
            </xs:restriction>"#,
        );
        assert_eq!(
            schema,
            json!({"type": "string", "minLength": 3, "maxLength": 20, "pattern": "[a-z]\\d+"})
        );
    }

    #[test]
    fn test_exclusive_float_bounds() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:decimal">
                <xs:minExclusive value="0.5"/>
                <xs:maxExclusive value=" 99 "/>
            </xs:restriction>"#,
        );
        assert_eq!(
            schema,
            json!({"type": "number", "exclusiveMinimum": 0.5, "exclusiveMaximum": 99})
        );
    }

    #[test]
    fn test_unparsable_facets_dropped() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:int">
                <xs:minLength value="three"/>
                <xs:minInclusive value="low"/>
                <xs:maxInclusive value="NaN"/>
                <xs:pattern value=""/>
            </xs:restriction>"#,
        );
        assert_eq!(schema, json!({"type": "integer"}));
    }

    #[test]
    fn test_large_integer_bounds_stay_exact() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:integer">
                <xs:minInclusive value="-99999999999999999999"/>
                <xs:maxInclusive value="99999999999999999999"/>
                <xs:maxExclusive value="18446744073709551615"/>
            </xs:restriction>"#,
        );
        assert_eq!(schema["minimum"].to_string(), "-99999999999999999999");
        assert_eq!(schema["maximum"].to_string(), "99999999999999999999");
        assert_eq!(schema["exclusiveMaximum"].to_string(), "18446744073709551615");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42 "), Some(Number::from(42)));
        assert_eq!(parse_number("+7"), Some(Number::from(7)));
        assert_eq!(
            parse_number("000123456789012345678901").map(|n| n.to_string()),
            Some("123456789012345678901".to_string())
        );
        assert_eq!(parse_number("2.5"), Number::from_f64(2.5));
        assert_eq!(parse_number("1e3"), Number::from_f64(1000.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("twelve"), None);
    }

    #[test]
    fn test_date_time_and_boolean_bases() {
        assert_eq!(
            convert_simple(r#"<xs:restriction base="xs:dateTime"/>"#),
            json!({"type": "string", "format": "dateTime"})
        );
        assert_eq!(
            convert_simple(r#"<xs:restriction base="xs:boolean"/>"#),
            json!({"type": "boolean"})
        );
    }

    #[test]
    fn test_non_builtin_base_stays_string() {
        assert_eq!(
            convert_simple(r#"<xs:restriction base="tns:Other"/>"#),
            json!({"type": "string"})
        );
        assert_eq!(convert_simple(""), json!({"type": "string"}));
    }

    #[test]
    fn test_enum_keeps_restriction_type() {
        let schema = convert_simple(
            r#"<xs:restriction base="xs:int"><xs:enumeration value="1"/><xs:enumeration value="2"/></xs:restriction>"#,
        );
        assert_eq!(schema, json!({"type": "integer", "enum": ["1", "2"]}));
    }
}
