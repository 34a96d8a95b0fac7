//! Contains functions and enums describing variable types

use byteorder::{BigEndian, ByteOrder};

use super::cursor::ByteCursor;
use super::error;

/// The six primitive types of the classic format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NcType {
    /// Signed 1 byte integer
    Byte,
    /// ISO/ASCII character
    Char,
    /// Signed 2 byte integer
    Short,
    /// Signed 4 byte integer
    Int,
    /// Single precision floating point number
    Float,
    /// Double precision floating point number
    Double,
}

impl NcType {
    /// Type code as stored in the file
    pub fn code(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Char => 2,
            Self::Short => 3,
            Self::Int => 4,
            Self::Float => 5,
            Self::Double => 6,
        }
    }

    /// Size of the type in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Byte | Self::Char => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Double => 8,
        }
    }

    /// Lowercase netcdf name of the type
    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Inverse of [`NcType::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "byte" => Some(Self::Byte),
            "char" => Some(Self::Char),
            "short" => Some(Self::Short),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Read `count` consecutive elements of this type
    pub fn read_values(self, cursor: &mut ByteCursor, count: usize) -> error::Result<Values> {
        let nbytes = count.checked_mul(self.size()).ok_or(error::Error::OutOfBounds {
            wanted: usize::MAX,
            available: cursor.len(),
        })?;
        let bytes = cursor.read_bytes(nbytes)?;
        Ok(match self {
            Self::Byte => Values::Byte(bytes.iter().map(|&b| b as i8).collect()),
            Self::Char => Values::Char(bytes.to_vec()),
            Self::Short => Values::Short(bytes.chunks_exact(2).map(BigEndian::read_i16).collect()),
            Self::Int => Values::Int(bytes.chunks_exact(4).map(BigEndian::read_i32).collect()),
            Self::Float => Values::Float(bytes.chunks_exact(4).map(BigEndian::read_f32).collect()),
            Self::Double => {
                Values::Double(bytes.chunks_exact(8).map(BigEndian::read_f64).collect())
            }
        })
    }

    /// Read `count` elements of this type from the current position
    ///
    /// A single element gives a scalar, more (or none) gives an array.
    /// Characters are always returned as a string, with one trailing
    /// null removed.
    pub fn decode(self, cursor: &mut ByteCursor, count: usize) -> error::Result<Value> {
        Ok(self.read_values(cursor, count)?.into_value())
    }
}

impl TryFrom<u32> for NcType {
    type Error = error::Error;
    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Char),
            3 => Ok(Self::Short),
            4 => Ok(Self::Int),
            5 => Ok(Self::Float),
            6 => Ok(Self::Double),
            x => Err(error::Error::InvalidType(x)),
        }
    }
}

impl std::fmt::Display for NcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of a type code, `"undefined"` if the code is not valid
pub fn type_name(code: u32) -> &'static str {
    NcType::try_from(code).map_or("undefined", NcType::name)
}

/// Type code of a name, `-1` if the name is not valid
pub fn type_code(name: &str) -> i32 {
    NcType::from_name(name).map_or(-1, |t| t.code() as i32)
}

/// Width in bytes of a type code, `-1` if the code is not valid
pub fn type_size(code: u32) -> i32 {
    NcType::try_from(code).map_or(-1, |t| t.size() as i32)
}

/// Removes a single trailing null
fn trim_null(bytes: &[u8]) -> &[u8] {
    match bytes.split_last() {
        Some((0, rest)) => rest,
        _ => bytes,
    }
}

/// A decoded scalar or array, as found in attributes
/// and in the entries of variable data
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Schar(i8),
    Schars(Vec<i8>),
    Str(String),
    Short(i16),
    Shorts(Vec<i16>),
    Int(i32),
    Ints(Vec<i32>),
    Float(f32),
    Floats(Vec<f32>),
    Double(f64),
    Doubles(Vec<f64>),
}

impl Value {
    /// Type of the value
    pub fn vartype(&self) -> NcType {
        match self {
            Self::Schar(_) | Self::Schars(_) => NcType::Byte,
            Self::Str(_) => NcType::Char,
            Self::Short(_) | Self::Shorts(_) => NcType::Short,
            Self::Int(_) | Self::Ints(_) => NcType::Int,
            Self::Float(_) | Self::Floats(_) => NcType::Float,
            Self::Double(_) | Self::Doubles(_) => NcType::Double,
        }
    }

    /// Number of elements, strings count their characters
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::Schar(_) | Self::Short(_) | Self::Int(_) | Self::Float(_) | Self::Double(_) => 1,
            Self::Schars(x) => x.len(),
            Self::Str(x) => x.chars().count(),
            Self::Shorts(x) => x.len(),
            Self::Ints(x) => x.len(),
            Self::Floats(x) => x.len(),
            Self::Doubles(x) => x.len(),
        }
    }
}

fn join<T: std::fmt::Display>(f: &mut std::fmt::Formatter<'_>, xs: &[T]) -> std::fmt::Result {
    for (i, x) in xs.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{x}")?;
    }
    Ok(())
}

/// Arrays are written comma separated, strings as they are
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schar(x) => write!(f, "{x}"),
            Self::Schars(x) => join(f, x),
            Self::Str(x) => f.write_str(x),
            Self::Short(x) => write!(f, "{x}"),
            Self::Shorts(x) => join(f, x),
            Self::Int(x) => write!(f, "{x}"),
            Self::Ints(x) => join(f, x),
            Self::Float(x) => write!(f, "{x}"),
            Self::Floats(x) => join(f, x),
            Self::Double(x) => write!(f, "{x}"),
            Self::Doubles(x) => join(f, x),
        }
    }
}

/// Flat buffer of elements of a single type
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Values {
    /// Empty buffer for a type
    pub fn empty(vartype: NcType, capacity: usize) -> Self {
        match vartype {
            NcType::Byte => Self::Byte(Vec::with_capacity(capacity)),
            NcType::Char => Self::Char(Vec::with_capacity(capacity)),
            NcType::Short => Self::Short(Vec::with_capacity(capacity)),
            NcType::Int => Self::Int(Vec::with_capacity(capacity)),
            NcType::Float => Self::Float(Vec::with_capacity(capacity)),
            NcType::Double => Self::Double(Vec::with_capacity(capacity)),
        }
    }

    /// Type of the elements
    pub fn vartype(&self) -> NcType {
        match self {
            Self::Byte(_) => NcType::Byte,
            Self::Char(_) => NcType::Char,
            Self::Short(_) => NcType::Short,
            Self::Int(_) => NcType::Int,
            Self::Float(_) => NcType::Float,
            Self::Double(_) => NcType::Double,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(x) => x.len(),
            Self::Char(x) => x.len(),
            Self::Short(x) => x.len(),
            Self::Int(x) => x.len(),
            Self::Float(x) => x.len(),
            Self::Double(x) => x.len(),
        }
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves all elements of `other` to the end of `self`
    pub fn append(&mut self, other: Self) -> error::Result<()> {
        match (self, other) {
            (Self::Byte(a), Self::Byte(b)) => a.extend(b),
            (Self::Char(a), Self::Char(b)) => a.extend(b),
            (Self::Short(a), Self::Short(b)) => a.extend(b),
            (Self::Int(a), Self::Int(b)) => a.extend(b),
            (Self::Float(a), Self::Float(b)) => a.extend(b),
            (Self::Double(a), Self::Double(b)) => a.extend(b),
            _ => return Err(error::Error::TypeMismatch),
        }
        Ok(())
    }

    /// Elements `start..start + len` as a single value
    ///
    /// # Panics
    ///
    /// The range must be within the buffer
    pub fn value_at(&self, start: usize, len: usize) -> Value {
        let range = start..start + len;
        match self {
            Self::Byte(x) => scalar_or_array(&x[range], Value::Schar, Value::Schars),
            Self::Char(x) => {
                Value::Str(String::from_utf8_lossy(trim_null(&x[range])).into_owned())
            }
            Self::Short(x) => scalar_or_array(&x[range], Value::Short, Value::Shorts),
            Self::Int(x) => scalar_or_array(&x[range], Value::Int, Value::Ints),
            Self::Float(x) => scalar_or_array(&x[range], Value::Float, Value::Floats),
            Self::Double(x) => scalar_or_array(&x[range], Value::Double, Value::Doubles),
        }
    }

    /// All elements as a single value
    pub fn into_value(self) -> Value {
        match self {
            Self::Char(x) => Value::Str(String::from_utf8_lossy(trim_null(&x)).into_owned()),
            Self::Byte(mut x) if x.len() == 1 => Value::Schar(x.remove(0)),
            Self::Byte(x) => Value::Schars(x),
            Self::Short(mut x) if x.len() == 1 => Value::Short(x.remove(0)),
            Self::Short(x) => Value::Shorts(x),
            Self::Int(mut x) if x.len() == 1 => Value::Int(x.remove(0)),
            Self::Int(x) => Value::Ints(x),
            Self::Float(mut x) if x.len() == 1 => Value::Float(x.remove(0)),
            Self::Float(x) => Value::Floats(x),
            Self::Double(mut x) if x.len() == 1 => Value::Double(x.remove(0)),
            Self::Double(x) => Value::Doubles(x),
        }
    }
}

fn scalar_or_array<T: Copy>(xs: &[T], one: fn(T) -> Value, many: fn(Vec<T>) -> Value) -> Value {
    match xs {
        [x] => one(*x),
        xs => many(xs.to_vec()),
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types which correspond to one of the netcdf types,
/// `u8` is used for characters
///
/// This trait is sealed and can not be implemented for
/// types outside this crate
pub trait NcGet: sealed::Sealed + Copy
where
    Self: Sized,
{
    /// Constant corresponding to a netcdf type
    const NCTYPE: NcType;

    /// Take the elements out of a buffer of the same type
    fn from_values(values: Values) -> error::Result<Vec<Self>>;

    /// Borrow the elements of a buffer of the same type
    fn as_slice(values: &Values) -> error::Result<&[Self]>;
}

macro_rules! impl_nc_get {
    ($sized_type: ty, $variant: ident) => {
        impl sealed::Sealed for $sized_type {}
        impl NcGet for $sized_type {
            const NCTYPE: NcType = NcType::$variant;

            fn from_values(values: Values) -> error::Result<Vec<Self>> {
                match values {
                    Values::$variant(x) => Ok(x),
                    _ => Err(error::Error::TypeMismatch),
                }
            }

            fn as_slice(values: &Values) -> error::Result<&[Self]> {
                match values {
                    Values::$variant(x) => Ok(x),
                    _ => Err(error::Error::TypeMismatch),
                }
            }
        }
    };
}

impl_nc_get!(i8, Byte);
impl_nc_get!(u8, Char);
impl_nc_get!(i16, Short);
impl_nc_get!(i32, Int);
impl_nc_get!(f32, Float);
impl_nc_get!(f64, Double);

// Boring implementations
impl From<i8> for Value {
    fn from(x: i8) -> Self {
        Self::Schar(x)
    }
}
impl From<Vec<i8>> for Value {
    fn from(x: Vec<i8>) -> Self {
        Self::Schars(x)
    }
}
impl From<i16> for Value {
    fn from(x: i16) -> Self {
        Self::Short(x)
    }
}
impl From<Vec<i16>> for Value {
    fn from(x: Vec<i16>) -> Self {
        Self::Shorts(x)
    }
}
impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Self::Int(x)
    }
}
impl From<Vec<i32>> for Value {
    fn from(x: Vec<i32>) -> Self {
        Self::Ints(x)
    }
}
impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(x)
    }
}
impl From<Vec<f32>> for Value {
    fn from(x: Vec<f32>) -> Self {
        Self::Floats(x)
    }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Double(x)
    }
}
impl From<Vec<f64>> for Value {
    fn from(x: Vec<f64>) -> Self {
        Self::Doubles(x)
    }
}
impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Self::Str(x.to_string())
    }
}
impl From<String> for Value {
    fn from(x: String) -> Self {
        Self::Str(x)
    }
}

impl TryFrom<Value> for i32 {
    type Error = error::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Schar(x) => Ok(x.into()),
            Value::Short(x) => Ok(x.into()),
            Value::Int(x) => Ok(x),
            _ => Err("Conversion not supported".into()),
        }
    }
}
impl TryFrom<Value> for i64 {
    type Error = error::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Schar(x) => Ok(x.into()),
            Value::Short(x) => Ok(x.into()),
            Value::Int(x) => Ok(x.into()),
            _ => Err("Conversion not supported".into()),
        }
    }
}
impl TryFrom<Value> for f32 {
    type Error = error::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Schar(x) => Ok(x.into()),
            Value::Short(x) => Ok(x.into()),
            Value::Int(x) => Ok(x as _),
            Value::Float(x) => Ok(x),
            Value::Double(x) => Ok(x as _),
            _ => Err("Conversion not supported".into()),
        }
    }
}
impl TryFrom<Value> for f64 {
    type Error = error::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Schar(x) => Ok(x.into()),
            Value::Short(x) => Ok(x.into()),
            Value::Int(x) => Ok(x.into()),
            Value::Float(x) => Ok(x.into()),
            Value::Double(x) => Ok(x),
            _ => Err("Conversion not supported".into()),
        }
    }
}
impl TryFrom<Value> for String {
    type Error = error::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(s) => Ok(s),
            _ => Err("Conversion not supported".into()),
        }
    }
}
