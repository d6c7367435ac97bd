//! Schema document loading
//!
//! This module normalizes raw schema input (bytes or text) into a tree of
//! namespace-resolved elements. Element tags are resolved against the
//! namespace declarations in scope, so schema nodes are recognised by the
//! XML Schema namespace URI whatever prefix (or default namespace) the
//! document uses.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{split_qname, NamespaceContext, QName};
use crate::XML_NAMESPACE;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes in document order, keyed by their name as written
    pub attributes: IndexMap<String, String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Check whether this is the XSD component `local_name`
    pub fn is_xsd(&self, local_name: &str) -> bool {
        self.qname.is_xsd(local_name)
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Get a non-empty attribute value by name
    pub fn get_non_empty_attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute(name).filter(|v| !v.is_empty())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Direct children that are the XSD component `local_name`
    pub fn xsd_children<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |e| e.is_xsd(local_name))
    }

    /// First direct child that is the XSD component `local_name`
    pub fn first_xsd_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.is_xsd(local_name))
    }

    /// All descendants in document order (depth-first, excluding self)
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Descendants that are the XSD component `local_name`, in document order
    pub fn xsd_descendants<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.is_xsd(local_name))
    }

    /// First descendant that is the XSD component `local_name`
    pub fn first_xsd_descendant(&self, local_name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is_xsd(local_name))
    }
}

/// Depth-first, document-order iterator over the descendants of an element
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(element) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Parsed schema document
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Normalize raw input into a document using default limits
    pub fn normalize(content: impl AsRef<[u8]>) -> Result<Self> {
        Self::normalize_with_limits(content, &Limits::default())
    }

    /// Normalize raw input into a document
    ///
    /// Decodes the bytes as UTF-8, rejects empty or whitespace-only input,
    /// then parses the text as XML.
    pub fn normalize_with_limits(content: impl AsRef<[u8]>, limits: &Limits) -> Result<Self> {
        let text = std::str::from_utf8(content.as_ref())
            .map_err(|e| Error::Decode(format!("schema is not valid UTF-8: {}", e)))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        limits.check_xml_size(text.len())?;
        Self::parse(text, limits)
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse XML text into a namespace-resolved element tree
    pub fn parse(xml: &str, limits: &Limits) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut root: Option<Element> = None;
        let mut element_stack: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                ParseError::new(e.to_string()).at_offset(xml, reader.buffer_position())
            })?;

            match event {
                Event::Start(e) => {
                    let element = Self::open_element(xml, &reader, &e, &root, &element_stack)?;
                    element_stack.push(element);
                    limits.check_xml_depth(element_stack.len())?;
                }
                Event::Empty(e) => {
                    let element = Self::open_element(xml, &reader, &e, &root, &element_stack)?;
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    Self::close_element(element, &mut root, &mut element_stack);
                }
                Event::End(_) => {
                    if let Some(current) = element_stack.pop() {
                        Self::close_element(current, &mut root, &mut element_stack);
                    }
                }
                Event::Text(text) => {
                    if element_stack.is_empty() {
                        return Err(ParseError::new("text outside of the document element")
                            .at_offset(xml, reader.buffer_position())
                            .into());
                    }
                    // Content is discarded but its references must still resolve
                    text.unescape().map_err(|e| {
                        ParseError::new(format!("bad text content: {}", e))
                            .at_offset(xml, reader.buffer_position())
                    })?;
                }
                Event::CData(_) => {
                    if element_stack.is_empty() {
                        return Err(ParseError::new("text outside of the document element")
                            .at_offset(xml, reader.buffer_position())
                            .into());
                    }
                }
                Event::Eof => break,
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
        }

        if let Some(open) = element_stack.last() {
            return Err(ParseError::new(format!(
                "unclosed element `{}`",
                open.local_name()
            ))
            .at_offset(xml, xml.len())
            .into());
        }

        root.map(|root| Document { root })
            .ok_or_else(|| ParseError::new("no element found").at_offset(xml, xml.len()).into())
    }

    /// Attach a finished element to its parent, or make it the root
    fn close_element(element: Element, root: &mut Option<Element>, stack: &mut [Element]) {
        if let Some(parent) = stack.last_mut() {
            parent.add_child(element);
        } else {
            *root = Some(element);
        }
    }

    /// Build an element from a start tag, resolving its namespace
    fn open_element(
        xml: &str,
        reader: &Reader<&[u8]>,
        start: &BytesStart,
        root: &Option<Element>,
        ancestors: &[Element],
    ) -> Result<Element> {
        let error_at = |message: String| -> Error {
            ParseError::new(message)
                .at_offset(xml, reader.buffer_position())
                .into()
        };

        if root.is_some() && ancestors.is_empty() {
            return Err(error_at("junk after document element".to_string()));
        }

        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| error_at(format!("invalid element name: {}", e)))?
            .to_string();

        let mut declarations = NamespaceContext::new();
        let mut attributes = IndexMap::new();

        for attr_result in start.attributes() {
            let attr = attr_result.map_err(|e| error_at(format!("bad attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| error_at(format!("invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| error_at(format!("bad attribute value: {}", e)))?
                .to_string();

            // Namespace declarations are kept apart from regular attributes
            if attr_name == "xmlns" {
                declarations.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                declarations.add_prefix(prefix, attr_value);
            } else {
                attributes.insert(attr_name, attr_value);
            }
        }

        let (prefix, local) = split_qname(&name);
        let namespace = match prefix {
            Some("xml") => Some(XML_NAMESPACE),
            Some(prefix) => Some(
                lookup_namespace(&declarations, ancestors, |ctx| ctx.get_namespace(prefix))
                    .ok_or_else(|| error_at(format!("unbound prefix `{}`", prefix)))?,
            ),
            None => lookup_namespace(&declarations, ancestors, |ctx| ctx.get_default_namespace())
                .filter(|uri| !uri.is_empty()),
        };
        let qname = match namespace {
            Some(uri) => QName::namespaced(uri, local),
            None => QName::local(local),
        };

        let mut element = Element::new(qname);
        element.attributes = attributes;
        element.namespaces = declarations;
        Ok(element)
    }
}

/// Find a namespace binding on the element itself or its nearest ancestor
fn lookup_namespace<'a>(
    own: &'a NamespaceContext,
    ancestors: &'a [Element],
    get: impl Fn(&'a NamespaceContext) -> Option<&'a str>,
) -> Option<&'a str> {
    get(own).or_else(|| ancestors.iter().rev().find_map(|e| get(&e.namespaces)))
}
