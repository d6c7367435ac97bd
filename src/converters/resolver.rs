//! Named type and element lookup
//!
//! Lookups ignore namespace scoping: every named `complexType`,
//! `simpleType` and `element` anywhere in the document is indexed by its
//! `name`, and the first one in document order wins.

use crate::documents::Element;
use crate::namespaces::local_part;
use std::collections::HashMap;

/// A named type definition found in the schema
#[derive(Debug, Clone, Copy)]
pub enum NamedType<'a> {
    /// A `complexType` definition
    Complex(&'a Element),
    /// A `simpleType` definition
    Simple(&'a Element),
}

/// Name index over a schema document, built once per conversion
#[derive(Debug, Default)]
pub struct SchemaIndex<'a> {
    complex_types: HashMap<&'a str, &'a Element>,
    simple_types: HashMap<&'a str, &'a Element>,
    elements: HashMap<&'a str, &'a Element>,
}

impl<'a> SchemaIndex<'a> {
    /// Index every named definition below `root`
    pub fn build(root: &'a Element) -> Self {
        let mut index = SchemaIndex::default();

        for node in root.descendants() {
            let Some(name) = node.get_attribute("name") else {
                continue;
            };
            let table = if node.is_xsd("complexType") {
                &mut index.complex_types
            } else if node.is_xsd("simpleType") {
                &mut index.simple_types
            } else if node.is_xsd("element") {
                &mut index.elements
            } else {
                continue;
            };
            table.entry(name).or_insert(node);
        }

        index
    }

    /// Find a named type; complex types take precedence over simple types
    pub fn find_named_type(&self, name: &str) -> Option<NamedType<'a>> {
        self.complex_types
            .get(name)
            .map(|&node| NamedType::Complex(node))
            .or_else(|| self.simple_types.get(name).map(|&node| NamedType::Simple(node)))
    }

    /// Find the element declaration a `ref` points at
    pub fn find_referenced_element(&self, reference: &str) -> Option<&'a Element> {
        self.elements.get(local_part(reference)).copied()
    }

    /// Number of indexed named types
    pub fn type_count(&self) -> usize {
        self.complex_types.len() + self.simple_types.len()
    }
}
