//! Open netcdf v3 files held in memory
#![allow(clippy::similar_names)]

use parking_lot::Mutex;

use super::attribute::{self, Attribute};
use super::cursor::ByteCursor;
use super::data::{self, Data};
use super::dimension::Dimension;
use super::error;
use super::extent::Extents;
use super::header::{self, Header, RecordDimension, Version};
use super::types::{NcGet, Value};
use super::variable::{Variable, VariableRef};

#[cfg(feature = "ndarray")]
use ndarray::ArrayD;

/// Read only accessible file
///
/// The header is parsed when the file is opened. Decoding data moves a
/// shared cursor, which is locked for the duration of each call, so a
/// `File` can be shared between threads.
#[derive(Debug)]
pub struct File<'buf> {
    header: Header,
    buf: &'buf [u8],
    cursor: Mutex<ByteCursor<'buf>>,
}

impl<'buf> File<'buf> {
    /// Parse the header of a buffer holding a complete file
    pub fn from_bytes(buf: &'buf [u8]) -> error::Result<Self> {
        let mut cursor = ByteCursor::new(buf);
        let header = header::parse(&mut cursor)?;
        Ok(Self {
            header,
            buf,
            cursor: Mutex::new(cursor),
        })
    }

    /// Format of the file
    pub fn version(&self) -> Version {
        self.header.version
    }

    /// All metadata of the file
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get all dimensions in the file
    pub fn dimensions(&self) -> &[Dimension] {
        &self.header.dimensions
    }

    /// Get a single dimension
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.header.dimensions.iter().find(|d| d.name == name)
    }

    /// Length of a dimension, the number of records for
    /// the unlimited dimension
    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        let dim = self.dimension(name)?;
        if dim.is_unlimited() {
            Some(self.header.record_dimension.length as usize)
        } else {
            Some(dim.len())
        }
    }

    /// The unlimited dimension and layout of the records
    pub fn record_dimension(&self) -> &RecordDimension {
        &self.header.record_dimension
    }

    /// Get all attributes of the file
    pub fn global_attributes(&self) -> &[Attribute] {
        &self.header.global_attributes
    }

    /// Get a single attribute of the file
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.header.global_attributes, name)
    }

    /// Value of an attribute of the file
    pub fn attribute_value(&self, name: &str) -> Option<&Value> {
        self.attribute(name).map(Attribute::value)
    }

    /// Whether the file has an attribute with this name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Get all variables in the file
    pub fn variables(&self) -> &[Variable] {
        &self.header.variables
    }

    /// Get a variable from the file
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.header.variable(name)
    }

    /// Whether the file has a variable with this name
    pub fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Resolve a name or a descriptor to a variable
    pub fn find_variable<'a>(
        &'a self,
        var: impl Into<VariableRef<'a>>,
    ) -> error::Result<&'a Variable> {
        match var.into() {
            VariableRef::ByName(name) => self
                .variable(name)
                .ok_or_else(|| error::Error::VariableNotFound(name.to_string())),
            VariableRef::ByDescriptor(var) => Ok(var),
        }
    }

    /// An independent cursor over the buffer of this file, which
    /// can be used with the functions of [`data`](crate::data)
    /// without taking the lock
    pub fn cursor(&self) -> ByteCursor<'buf> {
        ByteCursor::new(self.buf)
    }

    /// All values of a variable
    ///
    /// Record variables give one entry per record
    pub fn values<'a>(&'a self, var: impl Into<VariableRef<'a>>) -> error::Result<Data> {
        let var = self.find_variable(var)?;
        let mut cursor = self.cursor.lock();
        if var.is_record {
            data::record(&mut cursor, var, &self.header.record_dimension)
        } else {
            data::non_record(&mut cursor, var)
        }
    }

    /// Part of a variable, with start and length counted in elements
    ///
    /// For record variables the selection must stay within one record
    /// or cover whole records
    pub fn values_slice<'a>(
        &'a self,
        var: impl Into<VariableRef<'a>>,
        start: Option<i64>,
        length: Option<i64>,
    ) -> error::Result<Data> {
        let var = self.find_variable(var)?;
        let mut cursor = self.cursor.lock();
        if var.is_record {
            data::record_slice(
                &mut cursor,
                var,
                &self.header.record_dimension,
                start,
                length,
            )
        } else {
            data::non_record_slice(&mut cursor, var, start, length)
        }
    }

    /// Part of a variable, given as a `start, length` pair for each
    /// dimension
    ///
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let buffer = std::fs::read("madis-sao.nc")?;
    /// let file = netcdf3::open_mem(&buffer)?;
    /// // Rows 14 to 18 and the first three columns
    /// let data = file.values_filtered("staticIds", &[14, 5, 0, 3])?;
    /// assert_eq!(data.len(), 15);
    /// # Ok(()) }
    /// ```
    pub fn values_filtered<'a>(
        &'a self,
        var: impl Into<VariableRef<'a>>,
        filter: &[i64],
    ) -> error::Result<Data> {
        let var = self.find_variable(var)?;
        let extents = Extents::from_start_length(filter, var.dimension_ids.len())?;
        self.values_extents(var, extents)
    }

    /// Part of a variable, selected with extents
    pub fn values_extents<'a, E>(
        &'a self,
        var: impl Into<VariableRef<'a>>,
        extents: E,
    ) -> error::Result<Data>
    where
        E: TryInto<Extents>,
        E::Error: Into<error::Error>,
    {
        let var = self.find_variable(var)?;
        let extents: Extents = extents.try_into().map_err(Into::into)?;
        let shape = self.header.shape(var);
        let (start, count) = extents.start_count(&shape)?;

        let mut cursor = self.cursor.lock();
        data::filtered(
            &mut cursor,
            var,
            &self.header.record_dimension,
            &shape,
            &start,
            &count,
        )
    }

    /// All elements of a variable as a flat vector
    pub fn values_as<'a, T: NcGet>(
        &'a self,
        var: impl Into<VariableRef<'a>>,
    ) -> error::Result<Vec<T>> {
        self.values(var)?.into_vec()
    }

    /// Fetches a selection of a variable into an `ndarray`
    /// with the shape of the variable
    #[cfg(feature = "ndarray")]
    pub fn values_arr<'a, T: NcGet, E>(
        &'a self,
        var: impl Into<VariableRef<'a>>,
        extents: E,
    ) -> error::Result<ArrayD<T>>
    where
        E: TryInto<Extents>,
        E::Error: Into<error::Error>,
    {
        let var = self.find_variable(var)?;
        let extents: Extents = extents.try_into().map_err(Into::into)?;
        let (_, count) = extents.start_count(&self.header.shape(var))?;
        let values = self.values_extents(var, extents)?.into_vec::<T>()?;
        ArrayD::from_shape_vec(count, values).map_err(|e| e.to_string().into())
    }

    /// All entries of a variable, written out and joined together
    ///
    /// For a character variable this gives the text it holds.
    pub fn string_value<'a>(&'a self, var: impl Into<VariableRef<'a>>) -> error::Result<String> {
        let data = self.values(var)?;
        Ok(data.entries().map(|entry| entry.to_string()).collect())
    }
}

/// Width of the names column in the dump
const NAME_WIDTH: usize = 30;
/// Longest preview of the data of a variable
const PREVIEW_LEN: usize = 50;

/// Summary of the file, listing dimensions, global attributes and
/// the start of the data of every variable
impl std::fmt::Display for File<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DIMENSIONS")?;
        for dim in self.dimensions() {
            writeln!(f, "  {:<NAME_WIDTH$} = size: {}", dim.name, dim.size)?;
        }

        writeln!(f)?;
        writeln!(f, "GLOBAL ATTRIBUTES")?;
        for att in self.global_attributes() {
            writeln!(f, "  {:<NAME_WIDTH$} = {}", att.name, att.value)?;
        }

        writeln!(f)?;
        write!(f, "VARIABLES:")?;
        for var in self.variables() {
            write!(f, "\n  {:<NAME_WIDTH$} = ", var.name)?;
            match self.values(var) {
                Ok(data) => {
                    let json = json_preview(&data);
                    let preview: String = json.chars().take(PREVIEW_LEN).collect();
                    write!(f, "{preview} (length: {})", data.len())?;
                }
                Err(e) => write!(f, "<{e}>")?,
            }
        }
        Ok(())
    }
}

fn json_preview(data: &Data) -> String {
    let entries: Vec<String> = data.entries().map(|e| json_value(&e)).collect();
    format!("[{}]", entries.join(","))
}

fn json_value(value: &Value) -> String {
    fn list<T: std::fmt::Display>(xs: &[T]) -> String {
        let xs: Vec<String> = xs.iter().map(ToString::to_string).collect();
        format!("[{}]", xs.join(","))
    }
    match value {
        Value::Str(s) => format!("{s:?}"),
        Value::Schars(x) => list(x),
        Value::Shorts(x) => list(x),
        Value::Ints(x) => list(x),
        Value::Floats(x) => list(x),
        Value::Doubles(x) => list(x),
        scalar => scalar.to_string(),
    }
}
