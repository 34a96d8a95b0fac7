//! Errors that can appear when reading a netcdf v3 buffer

use std::num::TryFromIntError;

/// Various error types that can occur in this crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer is not a valid netcdf v3 file, with the reason why
    NotNetcdf(String),
    /// Could not find a variable with this name
    VariableNotFound(String),
    /// Slice selection can not be applied to the variable
    InvalidSlice(String),
    /// Wrong number of filter values, two per dimension
    InsufficientFilter {
        /// Number of values needed
        wanted: usize,
        /// Number of values supplied
        actual: usize,
    },
    /// A filter value is negative or outside the dimension
    InvalidFilterValues(String),
    /// Read past the end of the buffer
    OutOfBounds {
        /// Position the read would end at
        wanted: usize,
        /// Length of the buffer
        available: usize,
    },
    /// Type code is not one of the six classic types
    InvalidType(u32),
    /// Requested type does not correspond to what is defined
    TypeMismatch,
    /// Length of the extents does not match the variable
    DimensionMismatch {
        /// Dimensionality of the variable
        wanted: usize,
        /// Dimensionality of the request
        actual: usize,
    },
    /// Could not convert an integer, typically a file offset
    Conversion(TryFromIntError),
    /// Misc errors
    Str(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<TryFromIntError> for Error {
    fn from(e: TryFromIntError) -> Self {
        Self::Conversion(e)
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}

use std::fmt;
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNetcdf(reason) => write!(f, "Not a valid NetCDF v3.x file: {reason}"),
            Self::VariableNotFound(name) => write!(f, "variable not found: {name}"),
            Self::InvalidSlice(reason) => write!(f, "slice selection is invalid: {reason}"),
            Self::InsufficientFilter { wanted, actual } => write!(
                f,
                "insufficient filter values, needs {wanted} but got {actual}"
            ),
            Self::InvalidFilterValues(reason) => write!(f, "incorrect filter values: {reason}"),
            Self::OutOfBounds { wanted, available } => write!(
                f,
                "read out of bounds, needs {wanted} bytes but buffer has {available}"
            ),
            Self::InvalidType(t) => write!(f, "non valid type {t}"),
            Self::TypeMismatch => write!(f, "netcdf types does not correspond to what is defined"),
            Self::DimensionMismatch { wanted, actual } => write!(
                f,
                "dimensions does not match, variable has {wanted} but {actual} was given"
            ),
            Self::Conversion(e) => write!(f, "conversion error: {e}"),
            Self::Str(x) => write!(f, "{x}"),
        }
    }
}

/// Result type used in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for a malformed file
pub(crate) fn not_netcdf<T>(reason: impl Into<String>) -> Result<T> {
    Err(Error::NotNetcdf(reason.into()))
}
