//! Pure Rust reader for `netCDF` v3 files
//!
//! This crate decodes the classic (`CDF\x01`) and 64-bit offset (`CDF\x02`)
//! formats from a byte buffer held in memory. The header (dimensions, global
//! attributes and variable metadata) is parsed when the file is opened, the
//! data of a variable is decoded on request.
//!
//! Writing files and `netCDF-4` (`hdf5` based) files are not supported.
//!
//! For more information see:
//! * [The classic format specification](https://docs.unidata.ucar.edu/netcdf-c/current/file_format_specifications.html)
//! * [The official introduction to `netCDF`](https://docs.unidata.ucar.edu/nug/current/netcdf_introduction.html)
//!
//! # Examples
//!
//! How to read a variable from a file:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let buffer = std::fs::read("madis-sao.nc")?;
//! let file = netcdf3::open_mem(&buffer)?;
//!
//! println!("{}", file.version());
//! for dim in file.dimensions() {
//!     println!("{} = {}", dim.name(), dim.len());
//! }
//!
//! // All values of a variable, by name
//! let data = file.values("nStaticIds")?;
//! let first = data.entry(0);
//!
//! // Typed access to the flat buffer
//! let ids = file.values_as::<i32>("nStaticIds")?;
//! let period = file.attribute_value("filePeriod");
//!
//! // Sliced and filtered reads
//! let part = file.values_slice("staticIds", Some(48), Some(36))?;
//! let block = file.values_filtered("staticIds", &[14, 5, 0, 3])?;
//! let same = file.values_extents("staticIds", (14..19_usize, ..3_usize))?;
//!
//! // With the `ndarray` feature
//! # #[cfg(feature = "ndarray")]
//! let arr = file.values_arr::<u8, _>("staticIds", (14_usize, ..))?;
//! # Ok(()) }
//! ```

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod attribute;
pub mod cursor;
pub mod data;
pub mod dimension;
pub mod error;
pub mod extent;
pub mod file;
pub mod header;
pub mod types;
pub mod variable;

pub use attribute::*;
pub use data::Data;
pub use dimension::*;
pub use file::*;
pub use header::{Header, RecordDimension, Version};
pub use types::{NcType, Value, Values};
pub use variable::*;

/// Open a `netCDF` v3 file from a buffer
pub fn open_mem(buf: &[u8]) -> error::Result<File<'_>> {
    File::from_bytes(buf)
}

pub(crate) mod utils {
    use super::cursor::ByteCursor;
    use super::error;

    /// Skip to the next 4-byte boundary
    pub(crate) fn padding(cursor: &mut ByteCursor) -> error::Result<()> {
        match cursor.position() % 4 {
            0 => Ok(()),
            rem => cursor.skip(4 - rem),
        }
    }

    /// Length prefixed name, followed by padding
    pub(crate) fn read_name(cursor: &mut ByteCursor) -> error::Result<String> {
        let len = cursor.read_u32()?;
        let name = cursor.read_chars(len.try_into()?)?;
        padding(cursor)?;
        Ok(name)
    }

}
