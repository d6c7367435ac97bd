//! Limits and constraints for schema conversion
//!
//! This module defines limits that keep a single conversion bounded:
//! the size of the input, the nesting depth of the XML tree, the depth of
//! recursive type resolution (which also stops self-referential types) and
//! the total number of complex type expansions.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Global limits configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum XML input size in bytes
    pub max_xml_size: usize,

    /// Maximum nesting depth of the XML tree
    pub max_xml_depth: usize,

    /// Maximum depth of nested complex type processing
    pub max_type_depth: usize,

    /// Maximum number of complex type expansions in one conversion
    ///
    /// Nested groups are rescanned by every enclosing type, so the work of
    /// a conversion can grow much faster than the document.
    pub max_type_expansions: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_xml_depth: 1000,
            max_type_depth: 64,
            max_type_expansions: 250_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_xml_depth: 100,
            max_type_depth: 20,
            max_type_expansions: 25_000,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_xml_depth: 10000,
            max_type_depth: 1000,
            max_type_expansions: 10_000_000,
        }
    }

    /// Set the maximum type recursion depth
    pub fn with_max_type_depth(mut self, depth: usize) -> Self {
        self.max_type_depth = depth;
        self
    }

    /// Set the maximum number of complex type expansions
    pub fn with_max_type_expansions(mut self, expansions: usize) -> Self {
        self.max_type_expansions = expansions;
        self
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the type recursion depth is within limits
    pub fn check_type_depth(&self, depth: usize, path: &str) -> Result<()> {
        if depth > self.max_type_depth {
            Err(Error::SchemaTooDeep {
                path: path.to_string(),
                limit: self.max_type_depth,
            })
        } else {
            Ok(())
        }
    }

    /// Check if the number of complex type expansions is within limits
    pub fn check_type_expansions(&self, expansions: usize) -> Result<()> {
        if expansions > self.max_type_expansions {
            Err(Error::LimitExceeded(format!(
                "more than {} complex type expansions",
                self.max_type_expansions
            )))
        } else {
            Ok(())
        }
    }
}
