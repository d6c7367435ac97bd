//! Element and complex type processing
//!
//! This is the recursive core of the conversion. An element declaration is
//! resolved (following `ref`), its type is found (built-in, named, inline or
//! none) and turned into a JSON Schema fragment. Complex types become
//! objects whose properties come from their attributes and from the
//! elements of their sequence, all and choice groups.
//!
//! Each complex type call owns its accumulators ([`ObjectShape`]) and
//! returns them by value; group processing returns a shape of its own that
//! the caller merges.

use super::config::ConverterConfig;
use super::lexicon::{date_time_fragment, is_known_builtin, map_builtin, string_fragment};
use super::resolver::{NamedType, SchemaIndex};
use super::restrictions::process_simple_type;
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::{split_qname, NamespaceMap};
use serde_json::{Map, Value as JsonValue};
use std::cell::Cell;
use std::fmt;

/// Names of the elements from the document root to the current element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPath(Vec<String>);

impl ElementPath {
    /// The empty path
    pub fn root() -> Self {
        Self::default()
    }

    /// A copy of this path extended with `name`
    pub fn child(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        names.push(name.to_string());
        Self(names)
    }

    /// Number of names in the path
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lookup key: the names joined with `.`
    pub fn key(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Cardinality of an element declaration, taken from its raw attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// `minOccurs` is exactly `"0"`
    pub optional: bool,
    /// `maxOccurs` is `unbounded` or an integer greater than 1
    pub multiple: bool,
}

impl Occurs {
    /// Read occurrence attributes from an element declaration
    ///
    /// For a `ref` member this is the referenced declaration; attributes on
    /// the referencing node are not consulted.
    pub fn of(declaration: &Element) -> Self {
        Self {
            optional: declaration.get_attribute("minOccurs") == Some("0"),
            multiple: declaration
                .get_attribute("maxOccurs")
                .map_or(false, is_multiple),
        }
    }

    /// Whether the element must appear
    pub fn is_required(&self) -> bool {
        !self.optional
    }
}

/// `unbounded`, or a plain decimal integer greater than 1
fn is_multiple(max_occurs: &str) -> bool {
    if max_occurs == "unbounded" {
        return true;
    }
    if max_occurs.is_empty() || !max_occurs.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let significant = max_occurs.trim_start_matches('0');
    significant.len() > 1 || (significant.len() == 1 && significant != "1")
}

/// Properties and required keys accumulated for one object
#[derive(Debug, Default)]
pub struct ObjectShape {
    /// Object properties in discovery order
    pub properties: Map<String, JsonValue>,
    /// Required property keys in discovery order
    pub required: Vec<String>,
    /// `oneOf` alternatives, one list per choice group
    pub alternatives: Vec<Vec<JsonValue>>,
}

impl ObjectShape {
    /// Add a property, replacing any earlier one with the same key
    pub fn insert(&mut self, key: impl Into<String>, fragment: Map<String, JsonValue>) {
        self.properties.insert(key.into(), JsonValue::Object(fragment));
    }

    /// Mark a property as required
    pub fn require(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !self.required.contains(&key) {
            self.required.push(key);
        }
    }

    /// Merge another shape into this one
    pub fn merge(&mut self, other: ObjectShape) {
        for (key, value) in other.properties {
            self.properties.insert(key, value);
        }
        for key in other.required {
            self.require(key);
        }
        self.alternatives.extend(other.alternatives);
    }

    /// Build the `{type: object, ...}` fragment
    pub fn into_fragment(self) -> Map<String, JsonValue> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), JsonValue::from("object"));
        schema.insert("properties".to_string(), JsonValue::Object(self.properties));

        if !self.required.is_empty() {
            schema.insert(
                "required".to_string(),
                JsonValue::Array(self.required.into_iter().map(JsonValue::from).collect()),
            );
        }

        let mut alternatives = self.alternatives;
        match alternatives.len() {
            0 => {}
            1 => {
                schema.insert("oneOf".to_string(), JsonValue::Array(alternatives.remove(0)));
            }
            _ => {
                let all_of = alternatives
                    .into_iter()
                    .map(|one_of| {
                        let mut group = Map::new();
                        group.insert("oneOf".to_string(), JsonValue::Array(one_of));
                        JsonValue::Object(group)
                    })
                    .collect();
                schema.insert("allOf".to_string(), JsonValue::Array(all_of));
            }
        }

        schema
    }
}

/// How a `type` attribute resolved
enum TypeRef<'a> {
    /// An XSD built-in, already mapped
    Builtin(Map<String, JsonValue>),
    /// A named definition in the document
    Named(NamedType<'a>),
    /// Nothing matched
    Unresolved,
}

/// Recursive element and type processor for one document
pub struct Processor<'a> {
    index: SchemaIndex<'a>,
    namespaces: &'a NamespaceMap,
    config: &'a ConverterConfig,
    /// Complex types expanded so far
    expansions: Cell<usize>,
}

impl<'a> Processor<'a> {
    /// Create a processor over the document rooted at `root`
    pub fn new(root: &'a Element, namespaces: &'a NamespaceMap, config: &'a ConverterConfig) -> Self {
        Self {
            index: SchemaIndex::build(root),
            namespaces,
            config,
            expansions: Cell::new(0),
        }
    }

    /// The document's name index
    pub fn index(&self) -> &SchemaIndex<'a> {
        &self.index
    }

    /// Convert one element declaration and insert it into `properties`
    ///
    /// Elements that have no name, or whose `ref` cannot be resolved, are
    /// skipped without error.
    pub fn process_element(
        &self,
        element: &'a Element,
        properties: &mut Map<String, JsonValue>,
        path: &ElementPath,
    ) -> Result<()> {
        let Some(declaration) = self.resolve_reference(element) else {
            return Ok(());
        };
        let Some(name) = declaration.get_non_empty_attribute("name") else {
            return Ok(());
        };

        let fragment = self.element_fragment(declaration, &path.child(name))?;
        properties.insert(name.to_string(), JsonValue::Object(fragment));
        Ok(())
    }

    /// Convert a complex type into an object fragment
    pub fn process_complex_type(
        &self,
        complex_type: &'a Element,
        path: &ElementPath,
    ) -> Result<Map<String, JsonValue>> {
        let limits = self.config.limits();
        limits.check_type_depth(path.len(), &path.key())?;
        let expansions = self.expansions.get() + 1;
        limits.check_type_expansions(expansions)?;
        self.expansions.set(expansions);

        let mut shape = self.process_attributes(complex_type, path);

        let groups = complex_type
            .xsd_descendants("sequence")
            .chain(complex_type.xsd_descendants("all"));
        for group in groups {
            shape.merge(self.process_sequence(group, path)?);
        }

        for choice in complex_type.xsd_descendants("choice") {
            shape.merge(self.process_choice(choice, path)?);
        }

        Ok(shape.into_fragment())
    }

    /// Follow a `ref` on an element without a name
    fn resolve_reference(&self, element: &'a Element) -> Option<&'a Element> {
        match (
            element.get_non_empty_attribute("ref"),
            element.get_non_empty_attribute("name"),
        ) {
            (Some(reference), None) => {
                let resolved = self.index.find_referenced_element(reference);
                if resolved.is_none() {
                    tracing::debug!(reference, "skipping unresolved element reference");
                }
                resolved
            }
            _ => Some(element),
        }
    }

    /// Fragment for a (resolved, named) element declaration at `path`
    fn element_fragment(&self, element: &'a Element, path: &ElementPath) -> Result<Map<String, JsonValue>> {
        tracing::trace!(%path, "processing element");

        if let Some(type_name) = element.get_non_empty_attribute("type") {
            return self.type_fragment(type_name, path);
        }

        if let Some(simple_type) = element.first_xsd_child("simpleType") {
            return Ok(process_simple_type(simple_type, self.namespaces));
        }

        if let Some(complex_type) = element.first_xsd_child("complexType") {
            return self.process_complex_type(complex_type, path);
        }

        Ok(ObjectShape::default().into_fragment())
    }

    /// Resolve a `type` attribute value
    fn resolve_type(&self, type_name: &str) -> TypeRef<'a> {
        if type_name == "dateTime" {
            return TypeRef::Builtin(date_time_fragment());
        }

        let (prefix, local) = split_qname(type_name);
        if let Some(prefix) = prefix {
            if self.namespaces.is_builtin_prefix(prefix) {
                if !is_known_builtin(local) {
                    tracing::debug!(type_name, "unmapped built-in type, using string");
                }
                return TypeRef::Builtin(map_builtin(local));
            }
        }

        match self.index.find_named_type(local) {
            Some(named) => TypeRef::Named(named),
            None => {
                tracing::debug!(type_name, "unresolved type reference, using string");
                TypeRef::Unresolved
            }
        }
    }

    /// Fragment for an element `type` attribute
    fn type_fragment(&self, type_name: &str, path: &ElementPath) -> Result<Map<String, JsonValue>> {
        match self.resolve_type(type_name) {
            TypeRef::Builtin(fragment) => Ok(fragment),
            TypeRef::Named(NamedType::Simple(node)) => Ok(process_simple_type(node, self.namespaces)),
            TypeRef::Named(NamedType::Complex(node)) => self.process_complex_type(node, path),
            TypeRef::Unresolved => Ok(string_fragment()),
        }
    }

    /// Fragment for an attribute `type`; attributes only take simple types
    fn attribute_type_fragment(&self, type_name: &str) -> Map<String, JsonValue> {
        match self.resolve_type(type_name) {
            TypeRef::Builtin(fragment) => fragment,
            TypeRef::Named(NamedType::Simple(node)) => process_simple_type(node, self.namespaces),
            TypeRef::Named(NamedType::Complex(_)) | TypeRef::Unresolved => string_fragment(),
        }
    }

    /// Attributes declared anywhere below a complex type
    fn process_attributes(&self, complex_type: &'a Element, path: &ElementPath) -> ObjectShape {
        let mut shape = ObjectShape::default();
        let path_key = path.key();

        for attribute in complex_type.xsd_descendants("attribute") {
            let (Some(name), Some(type_name)) = (
                attribute.get_non_empty_attribute("name"),
                attribute.get_non_empty_attribute("type"),
            ) else {
                continue;
            };

            let key = self.config.attribute_key(&path_key, name);
            shape.insert(key.clone(), self.attribute_type_fragment(type_name));
            if attribute.get_attribute("use") == Some("required") {
                shape.require(key);
            }
        }

        shape
    }

    /// Resolve and convert the direct element children of a group
    fn group_members(
        &self,
        group: &'a Element,
        path: &ElementPath,
    ) -> Result<Vec<(&'a Element, &'a str, Map<String, JsonValue>)>> {
        let mut members = Vec::new();

        for member in group.xsd_children("element") {
            let Some(declaration) = self.resolve_reference(member) else {
                continue;
            };
            let Some(name) = declaration.get_non_empty_attribute("name") else {
                continue;
            };
            let fragment = self.element_fragment(declaration, &path.child(name))?;
            members.push((declaration, name, fragment));
        }

        Ok(members)
    }

    /// Elements of a `sequence` or `all` group
    fn process_sequence(&self, group: &'a Element, path: &ElementPath) -> Result<ObjectShape> {
        let mut shape = ObjectShape::default();

        for (declaration, name, fragment) in self.group_members(group, path)? {
            let occurs = Occurs::of(declaration);
            if occurs.is_required() {
                shape.require(name);
            }

            let fragment = if occurs.multiple {
                array_of(fragment)
            } else {
                fragment
            };
            shape.insert(name, fragment);
        }

        Ok(shape)
    }

    /// Elements of a `choice` group: optional properties plus `oneOf`
    fn process_choice(&self, choice: &'a Element, path: &ElementPath) -> Result<ObjectShape> {
        let mut shape = ObjectShape::default();
        let mut alternatives = Vec::new();

        for (_, name, fragment) in self.group_members(choice, path)? {
            if self.config.one_of() {
                alternatives.push(single_property_object(name, fragment.clone()));
            }
            shape.insert(name, fragment);
        }

        if alternatives.len() > 1 {
            shape.alternatives.push(alternatives);
        }

        Ok(shape)
    }
}

/// `{type: array, items: <fragment>}`
fn array_of(items: Map<String, JsonValue>) -> Map<String, JsonValue> {
    let mut schema = Map::new();
    schema.insert("type".to_string(), JsonValue::from("array"));
    schema.insert("items".to_string(), JsonValue::Object(items));
    schema
}

/// `{type: object, properties: {name: fragment}, required: [name]}`
fn single_property_object(name: &str, fragment: Map<String, JsonValue>) -> JsonValue {
    let mut shape = ObjectShape::default();
    shape.insert(name, fragment);
    shape.require(name);
    JsonValue::Object(shape.into_fragment())
}
