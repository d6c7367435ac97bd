//! # xsd2jsonschema
//!
//! Converts XML Schema (XSD) documents into JSON Schema (draft-07) documents
//! describing the same document shape.
//!
//! The conversion is a best-effort structural mapping, not a validator:
//!
//! - Elements become properties; complex types become objects
//! - Attributes become `@`-prefixed properties
//! - `minOccurs="0"` makes a property optional, `maxOccurs > 1` an array
//! - Choice groups are flattened to optional properties plus a `oneOf`
//! - Simple type restrictions map to `enum`, length, pattern and bound keywords
//! - Unresolved references and unknown types degrade to `{"type": "string"}`
//!
//! ## Example
//!
//! ```rust
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!     <xs:element name="age" type="xs:integer"/>
//! </xs:schema>"#;
//!
//! let schema = xsd2jsonschema::convert(xsd)?;
//! assert_eq!(schema["properties"]["age"]["type"], "integer");
//! # Ok::<(), xsd2jsonschema::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Input handling
pub mod namespaces;
pub mod documents;

// Conversion
pub mod converters;

// Re-exports for convenience
pub use converters::{convert, AttributeOverride, Converter, ConverterConfig};
pub use error::{Error, ParseError, Result};
pub use limits::Limits;

/// Version of the xsd2jsonschema library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// JSON Schema draft-07 meta-schema URI
pub const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";
