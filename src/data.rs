//! Decoding of variable data
//!
//! Non-record variables are stored contiguously from their offset. Record
//! variables are interleaved: record `i` of a variable starts at
//! `offset + i * record_step`, where the record step is the sum of the
//! per-record sizes of all record variables.
//!
//! All functions seek before reading, the position of the cursor on
//! return is unspecified.

use super::cursor::ByteCursor;
use super::error::{self, not_netcdf};
use super::header::{RecordDimension, STREAMING};
use super::types::{NcGet, NcType, Value, Values};
use super::variable::Variable;

#[cfg(feature = "ndarray")]
use ndarray::ArrayD;

/// Decoded data of a variable
///
/// Elements are kept in a flat buffer in row-major order. Data from non-record
/// variables has a single dimension, data from record variables has shape
/// `[records, elements per record]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    values: Values,
    shape: Vec<usize>,
}

impl Data {
    pub(crate) fn new(values: Values, shape: Vec<usize>) -> Self {
        debug_assert_eq!(values.len(), shape.iter().product::<usize>());
        Self { values, shape }
    }

    /// The flat buffer of elements
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Take the flat buffer of elements
    pub fn into_values(self) -> Values {
        self.values
    }

    /// Shape of the data
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Type of the elements
    pub fn vartype(&self) -> NcType {
        self.values.vartype()
    }

    /// Number of entries, that is elements for non-record
    /// data and records for record data
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_width(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// A single entry, a scalar when an entry holds one element
    /// and an array (or string for characters) otherwise
    pub fn entry(&self, i: usize) -> Option<Value> {
        if i >= self.len() {
            return None;
        }
        let width = self.entry_width();
        Some(self.values.value_at(i * width, width))
    }

    /// Iterator over all entries
    pub fn entries(&self) -> impl Iterator<Item = Value> + '_ {
        let width = self.entry_width();
        (0..self.len()).map(move |i| self.values.value_at(i * width, width))
    }

    /// Borrow the elements as a typed slice
    pub fn as_slice<T: NcGet>(&self) -> error::Result<&[T]> {
        T::as_slice(&self.values)
    }

    /// Take the elements as a typed vector
    pub fn into_vec<T: NcGet>(self) -> error::Result<Vec<T>> {
        T::from_values(self.values)
    }

    /// Convert into an array with the shape of the data
    #[cfg(feature = "ndarray")]
    pub fn into_array<T: NcGet>(self) -> error::Result<ArrayD<T>> {
        let shape = self.shape.clone();
        let values = self.into_vec::<T>()?;
        ArrayD::from_shape_vec(shape, values).map_err(|e| e.to_string().into())
    }
}

/// Number of records, which must be known in advance
fn record_count(record: &RecordDimension) -> error::Result<usize> {
    if record.length == STREAMING {
        return not_netcdf("streaming record dimension is not supported");
    }
    Ok(record.length.try_into()?)
}

fn position(offset: u64) -> error::Result<usize> {
    Ok(offset.try_into()?)
}

/// All data of a non-record variable
pub fn non_record(cursor: &mut ByteCursor, var: &Variable) -> error::Result<Data> {
    let n = var.width();
    cursor.seek(position(var.offset)?)?;
    let values = var.vartype.read_values(cursor, n)?;
    Ok(Data::new(values, vec![n]))
}

/// Part of a non-record variable, counted in elements
///
/// The start defaults to zero, the length to the rest of the variable
pub fn non_record_slice(
    cursor: &mut ByteCursor,
    var: &Variable,
    start: Option<i64>,
    length: Option<i64>,
) -> error::Result<Data> {
    let n = var.width();
    let start = slice_arg(start.unwrap_or(0))?;
    let length = match length {
        Some(length) => slice_arg(length)?,
        None => n.saturating_sub(start),
    };
    match start.checked_add(length) {
        Some(end) if end <= n => {}
        _ => {
            return Err(error::Error::InvalidSlice(format!(
                "variable has {n} elements, {length} requested from {start}"
            )))
        }
    }

    let size = var.vartype.size() as u64;
    cursor.seek(position(var.offset + start as u64 * size)?)?;
    let values = var.vartype.read_values(cursor, length)?;
    Ok(Data::new(values, vec![length]))
}

fn slice_arg(x: i64) -> error::Result<usize> {
    usize::try_from(x)
        .map_err(|_| error::Error::InvalidSlice(format!("{x} is not a valid index")))
}

/// All records of a record variable
pub fn record(
    cursor: &mut ByteCursor,
    var: &Variable,
    record: &RecordDimension,
) -> error::Result<Data> {
    let nrecs = record_count(record)?;
    let width = var.width();
    if record.record_step == 0 && nrecs > 0 {
        return not_netcdf("record step is zero");
    }
    read_records(cursor, var, record.record_step, 0, nrecs, 0, width)
}

/// Reads `nrecs` consecutive records, `width` elements from
/// element `within` of each record
fn read_records(
    cursor: &mut ByteCursor,
    var: &Variable,
    step: u64,
    first: usize,
    nrecs: usize,
    within: usize,
    width: usize,
) -> error::Result<Data> {
    let size = var.vartype.size() as u64;
    let mut values = Values::empty(var.vartype, nrecs.saturating_mul(width).min(cursor.len()));
    for i in first..first + nrecs {
        cursor.seek(position(var.offset + i as u64 * step + within as u64 * size)?)?;
        values.append(var.vartype.read_values(cursor, width)?)?;
    }
    Ok(Data::new(values, vec![nrecs, width]))
}

/// Part of a record variable
///
/// `start` and `length` count elements over all records placed one
/// after the other. The selection must either stay within a single record,
/// or cover whole records.
pub fn record_slice(
    cursor: &mut ByteCursor,
    var: &Variable,
    record: &RecordDimension,
    start: Option<i64>,
    length: Option<i64>,
) -> error::Result<Data> {
    let nrecs = record_count(record)?;
    let width = var.width();
    if width == 0 {
        return Err(error::Error::InvalidSlice(
            "variable has no elements per record".into(),
        ));
    }
    let start = slice_arg(start.unwrap_or(0))?;
    let length = match length {
        Some(length) => slice_arg(length)?,
        None => (nrecs * width).saturating_sub(start),
    };

    let first = start / width;
    let within = start % width;
    let (count, entry_width) = if length < width && within + length <= width {
        (1, length)
    } else if within == 0 && length % width == 0 {
        (length / width, width)
    } else {
        return Err(error::Error::InvalidSlice(format!(
            "{length} elements from {start} does not fit records of {width} elements"
        )));
    };
    if first + count > nrecs {
        return Err(error::Error::InvalidSlice(format!(
            "selection ends after the last of {nrecs} records"
        )));
    }

    read_records(
        cursor,
        var,
        record.record_step,
        first,
        count,
        within,
        entry_width,
    )
}

/// Hyperslab of a variable, given by a start and count per dimension
///
/// `shape` is the length of each dimension, with the number of records
/// for the record dimension. The selection must already be checked
/// against the shape.
pub fn filtered(
    cursor: &mut ByteCursor,
    var: &Variable,
    record: &RecordDimension,
    shape: &[usize],
    start: &[usize],
    count: &[usize],
) -> error::Result<Data> {
    if var.is_record && record_count(record)? > 0 && record.record_step == 0 {
        return not_netcdf("record step is zero");
    }
    let size = var.vartype.size() as u64;

    let mut strides = Vec::with_capacity(shape.len());
    let mut stride = size;
    for &len in shape.iter().rev() {
        strides.push(stride);
        stride = stride.saturating_mul(len as u64);
    }
    strides.reverse();
    if var.is_record {
        if let Some(outer) = strides.first_mut() {
            *outer = record.record_step;
        }
    }

    let total: usize = count.iter().product();
    let mut values = Values::empty(var.vartype, total.min(cursor.len()));
    if shape.is_empty() {
        cursor.seek(position(var.offset)?)?;
        values.append(var.vartype.read_values(cursor, 1)?)?;
    } else {
        let walk = Walk {
            vartype: var.vartype,
            start,
            count,
            strides: &strides,
        };
        walk.read(cursor, 0, var.offset, &mut values)?;
    }

    let data_shape = if var.is_record {
        vec![count[0], count[1..].iter().product()]
    } else {
        vec![total]
    };
    Ok(Data::new(values, data_shape))
}

fn offset(base: u64, index: u64, stride: u64) -> u64 {
    base.saturating_add(index.saturating_mul(stride))
}

struct Walk<'a> {
    vartype: NcType,
    start: &'a [usize],
    count: &'a [usize],
    strides: &'a [u64],
}

impl Walk<'_> {
    /// Recursion depth is bounded by the number of dimensions,
    /// a contiguous innermost dimension is read at once
    fn read(
        &self,
        cursor: &mut ByteCursor,
        level: usize,
        base: u64,
        out: &mut Values,
    ) -> error::Result<()> {
        let stride = self.strides[level];
        let start = self.start[level] as u64;
        if level + 1 == self.start.len() {
            if stride == self.vartype.size() as u64 {
                cursor.seek(position(offset(base, start, stride))?)?;
                return out.append(self.vartype.read_values(cursor, self.count[level])?);
            }
            // Records of a variable with only the record dimension
            for i in 0..self.count[level] as u64 {
                cursor.seek(position(offset(base, start + i, stride))?)?;
                out.append(self.vartype.read_values(cursor, 1)?)?;
            }
            return Ok(());
        }
        for i in 0..self.count[level] as u64 {
            self.read(cursor, level + 1, offset(base, start + i, stride), out)?;
        }
        Ok(())
    }
}
