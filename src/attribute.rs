//! Attributes of netcdf files and variables

use super::types::{NcType, Value};

/// Extra properties of a variable or of the file itself
/// are stored as attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) value: Value,
}

impl Attribute {
    /// Get the name of the attribute
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value of the attribute
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Type of the attribute
    pub fn vartype(&self) -> NcType {
        self.value.vartype()
    }
}

/// Find an attribute by name in a list of attributes
pub(crate) fn find<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}
