//! Variables in the netcdf file
#![allow(clippy::similar_names)]

use super::attribute::{self, Attribute};
use super::types::{NcType, Value};

/// This struct defines a `netCDF` variable.
///
/// The descriptor only holds the metadata from the header,
/// data is decoded through [`File`](crate::File).
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) dimension_ids: Vec<usize>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) vartype: NcType,
    /// Bytes, per record for record variables
    pub(crate) size: u32,
    pub(crate) offset: u64,
    pub(crate) is_record: bool,
}

impl Variable {
    /// Get name of variable
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Indices into the list of dimensions of the file,
    /// outermost first
    pub fn dimension_ids(&self) -> &[usize] {
        &self.dimension_ids
    }
    /// Get an attribute of this variable
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.attributes, name)
    }
    /// Value of an attribute of this variable
    pub fn attribute_value(&self, name: &str) -> Option<&Value> {
        self.attribute(name).map(Attribute::value)
    }
    /// Iterator over all the attributes of this variable
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }
    /// Type of the elements
    pub fn vartype(&self) -> NcType {
        self.vartype
    }
    /// Size in bytes as declared in the header. For record
    /// variables this is the size of a single record
    pub fn size(&self) -> u32 {
        self.size
    }
    /// Position of the first element in the file
    pub fn offset(&self) -> u64 {
        self.offset
    }
    /// Whether the first dimension is the unlimited dimension
    pub fn is_record(&self) -> bool {
        self.is_record
    }
    /// Elements per record, or in total for a non-record variable
    ///
    /// Record variables with a declared size of zero hold a single element
    /// per record
    pub(crate) fn width(&self) -> usize {
        if self.is_record && self.size == 0 {
            1
        } else {
            self.size as usize / self.vartype.size()
        }
    }
}

/// A variable given either by name or by a descriptor
/// taken from the header
#[derive(Debug, Clone, Copy)]
pub enum VariableRef<'a> {
    /// Look up by name
    ByName(&'a str),
    /// Already resolved
    ByDescriptor(&'a Variable),
}

impl<'a> From<&'a str> for VariableRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::ByName(name)
    }
}

impl<'a> From<&'a String> for VariableRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::ByName(name)
    }
}

impl<'a> From<&'a Variable> for VariableRef<'a> {
    fn from(var: &'a Variable) -> Self {
        Self::ByDescriptor(var)
    }
}

impl std::fmt::Display for VariableRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByName(name) => f.write_str(name),
            Self::ByDescriptor(var) => f.write_str(&var.name),
        }
    }
}
