//! Parsing of the header of a netcdf v3 file
//!
//! The header is made of three tagged lists, each of which is either
//! `tag, count, count × element` or the empty marker `0, 0`:
//! dimensions (tag 10), global attributes (tag 12) and
//! variables (tag 11). Variables carry their own attribute list.

use super::attribute::Attribute;
use super::cursor::ByteCursor;
use super::dimension::Dimension;
use super::error::{self, not_netcdf};
use super::types::NcType;
use super::utils::{padding, read_name};
use super::variable::Variable;

const ABSENT: u32 = 0;
const NC_DIMENSION: u32 = 10;
const NC_VARIABLE: u32 = 11;
const NC_ATTRIBUTE: u32 = 12;

/// Number of records when the record dimension is streamed
pub const STREAMING: u32 = u32::MAX;

/// Format of the file, given by the fourth byte
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Version byte 1, 32-bit offsets
    Classic,
    /// Version byte 2
    Offset64,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => f.write_str("classic format"),
            Self::Offset64 => f.write_str("64-bit offset format"),
        }
    }
}

/// Metadata of the unlimited dimension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDimension {
    /// Number of records
    pub length: u32,
    /// Index into the list of dimensions, `None` if
    /// the file has no unlimited dimension
    pub id: Option<usize>,
    /// Name of the unlimited dimension
    pub name: Option<String>,
    /// Bytes between the start of two consecutive records,
    /// the sum of the sizes of all record variables
    pub record_step: u64,
}

/// All metadata of a file
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Format of the file
    pub version: Version,
    /// Unlimited dimension and record layout
    pub record_dimension: RecordDimension,
    /// Dimensions, indexed by the ids stored in variables
    pub dimensions: Vec<Dimension>,
    /// Attributes of the file
    pub global_attributes: Vec<Attribute>,
    /// Variables in file order
    pub variables: Vec<Variable>,
}

impl Header {
    /// Find a variable by name
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Length of each dimension of the variable, using the number
    /// of records for the record dimension
    pub fn shape(&self, var: &Variable) -> Vec<usize> {
        var.dimension_ids
            .iter()
            .map(|&id| {
                if Some(id) == self.record_dimension.id {
                    self.record_dimension.length as usize
                } else {
                    self.dimensions.get(id).map_or(0, |d| d.size)
                }
            })
            .collect()
    }
}

/// Parse the header, starting at the magic bytes
pub fn parse(cursor: &mut ByteCursor) -> error::Result<Header> {
    match cursor.read_bytes(3) {
        Ok(b"CDF") => {}
        _ => return not_netcdf("should start with CDF"),
    }
    let version = match cursor.read_u8() {
        Ok(1) => Version::Classic,
        Ok(2) => Version::Offset64,
        _ => return not_netcdf("unknown version"),
    };

    let mut record_dimension = RecordDimension {
        length: cursor.read_u32()?,
        ..RecordDimension::default()
    };

    let dimensions = dimension_list(cursor, &mut record_dimension)?;
    let global_attributes = attribute_list(cursor)?;
    let variables = variable_list(cursor, version, &dimensions, &mut record_dimension)?;

    Ok(Header {
        version,
        record_dimension,
        dimensions,
        global_attributes,
        variables,
    })
}

/// Reads the list tag, returning the number of elements
fn list_len(cursor: &mut ByteCursor, expected: u32, what: &str) -> error::Result<usize> {
    let tag = cursor.read_u32()?;
    if tag == ABSENT {
        if cursor.read_u32()? != ABSENT {
            return not_netcdf(format!("wrong empty tag for list of {what}"));
        }
        return Ok(0);
    }
    if tag != expected {
        return not_netcdf(format!("wrong tag for list of {what}"));
    }
    Ok(cursor.read_u32()?.try_into()?)
}

fn read_type(cursor: &mut ByteCursor) -> error::Result<NcType> {
    let code = cursor.read_u32()?;
    NcType::try_from(code).or_else(|_| not_netcdf(format!("non valid type {code}")))
}

fn dimension_list(
    cursor: &mut ByteCursor,
    record_dimension: &mut RecordDimension,
) -> error::Result<Vec<Dimension>> {
    let ndims = list_len(cursor, NC_DIMENSION, "dimensions")?;
    let mut dimensions = Vec::with_capacity(ndims.min(cursor.remaining() / 8));
    for id in 0..ndims {
        let name = read_name(cursor)?;
        let size: usize = cursor.read_u32()?.try_into()?;
        if size == 0 {
            if record_dimension.id.is_some() {
                return not_netcdf("multiple unlimited dimensions");
            }
            record_dimension.id = Some(id);
            record_dimension.name = Some(name.clone());
        }
        dimensions.push(Dimension { name, size });
    }
    Ok(dimensions)
}

fn attribute_list(cursor: &mut ByteCursor) -> error::Result<Vec<Attribute>> {
    let natts = list_len(cursor, NC_ATTRIBUTE, "attributes")?;
    let mut attributes = Vec::with_capacity(natts.min(cursor.remaining() / 12));
    for _ in 0..natts {
        let name = read_name(cursor)?;
        let vartype = read_type(cursor)?;
        let nelems = cursor.read_u32()?.try_into()?;
        let value = vartype.decode(cursor, nelems)?;
        padding(cursor)?;
        attributes.push(Attribute { name, value });
    }
    Ok(attributes)
}

fn variable_list(
    cursor: &mut ByteCursor,
    version: Version,
    dimensions: &[Dimension],
    record_dimension: &mut RecordDimension,
) -> error::Result<Vec<Variable>> {
    let nvars = list_len(cursor, NC_VARIABLE, "variables")?;
    let mut variables = Vec::with_capacity(nvars.min(cursor.remaining() / 24));
    for _ in 0..nvars {
        let name = read_name(cursor)?;
        let ndims: usize = cursor.read_u32()?.try_into()?;
        let mut dimension_ids = Vec::with_capacity(ndims.min(cursor.remaining() / 4));
        for _ in 0..ndims {
            let id: usize = cursor.read_u32()?.try_into()?;
            if id >= dimensions.len() {
                return not_netcdf("dimension id out of range");
            }
            dimension_ids.push(id);
        }
        let attributes = attribute_list(cursor)?;
        let vartype = read_type(cursor)?;
        let size = cursor.read_u32()?;

        let offset = match version {
            Version::Classic => cursor.read_u32()?,
            Version::Offset64 => {
                if cursor.read_u32()? != 0 {
                    return not_netcdf("offsets larger than 4GB not supported");
                }
                cursor.read_u32()?
            }
        };

        let is_record = record_dimension.id.is_some()
            && dimension_ids.first().copied() == record_dimension.id;
        if is_record {
            record_dimension.record_step += u64::from(size);
        }

        variables.push(Variable {
            name,
            dimension_ids,
            attributes,
            vartype,
            size,
            offset: offset.into(),
            is_record,
        });
    }
    Ok(variables)
}
