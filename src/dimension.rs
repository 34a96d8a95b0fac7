//! Dimensions of a netcdf file

/// Represents a netcdf dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub(crate) name: String,
    /// Zero when unlimited
    pub(crate) size: usize,
}

#[allow(clippy::len_without_is_empty)]
impl Dimension {
    /// Gets the name of the dimension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared length of this dimension
    ///
    /// This is zero for the unlimited dimension, the number of
    /// records is found with [`File::dimension_len`](crate::File::dimension_len)
    pub fn len(&self) -> usize {
        self.size
    }

    /// Checks whether this is the record dimension
    pub fn is_unlimited(&self) -> bool {
        self.size == 0
    }
}
