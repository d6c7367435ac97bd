//! XML namespace handling
//!
//! This module provides qualified names, the per-element namespace
//! declarations collected while parsing, and the schema-level prefix map
//! used to recognise references to XSD built-in types.

use crate::documents::Element;
use crate::XSD_NAMESPACE;
use indexmap::IndexMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Prefixes that always denote XSD built-in types
const BUILTIN_PREFIXES: [&str; 2] = ["xs", "xsd"];

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Check whether this name is `local_name` in the XML Schema namespace
    pub fn is_xsd(&self, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(XSD_NAMESPACE) && self.local_name == local_name
    }
}

/// Clark notation: `{namespace}local`, or the bare local name
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace declarations made on a single element
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI, in declaration order
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Iterate over the prefixed declarations
    pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &NamespaceUri)> {
        self.prefixes.iter()
    }

    /// True when no declarations were made
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }
}

/// Prefix to namespace URI mapping of a schema document
///
/// The empty prefix stands for a default namespace bound to the XML
/// Schema URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    prefixes: IndexMap<Prefix, NamespaceUri>,
}

impl NamespaceMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Get the namespace bound to a prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Check whether a prefix is bound
    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// Number of bound prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// True when nothing is bound
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterate over the bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &NamespaceUri)> {
        self.prefixes.iter()
    }

    /// Whether a type name prefix refers to XSD built-in types
    ///
    /// `xs` and `xsd` always do; any other non-empty prefix does when it is
    /// bound to the XML Schema namespace.
    pub fn is_builtin_prefix(&self, prefix: &str) -> bool {
        BUILTIN_PREFIXES.contains(&prefix)
            || (!prefix.is_empty() && self.get(prefix) == Some(XSD_NAMESPACE))
    }
}

/// Build the prefix map of a schema from its root element
///
/// All prefixed declarations on the root are kept. A default namespace is
/// recorded under the empty prefix only when it is the XML Schema namespace.
/// An `xs` binding is added when neither `xs` nor `xsd` is declared.
pub fn resolve_namespaces(root: &Element) -> NamespaceMap {
    let mut map = NamespaceMap::new();

    for (prefix, uri) in root.namespaces.iter() {
        map.insert(prefix.as_str(), uri.as_str());
    }

    if root.namespaces.get_default_namespace() == Some(XSD_NAMESPACE) {
        map.insert("", XSD_NAMESPACE);
    }

    if !map.contains("xs") && !map.contains("xsd") {
        map.insert("xs", XSD_NAMESPACE);
    }

    map
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Strip any prefix from a QName
pub fn local_part(qname: &str) -> &str {
    split_qname(qname).1
}
