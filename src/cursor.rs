//! Big endian reads over a borrowed byte buffer

use byteorder::{BigEndian, ByteOrder};

use crate::error;

/// A read position into a netcdf buffer
///
/// All multi-byte values in a netcdf v3 file are stored big endian.
/// Reads advance the position by the width of the type read, and a
/// read which would go past the end of the buffer fails without
/// moving the position.
#[derive(Debug, Clone)]
pub struct ByteCursor<'buf> {
    buf: &'buf [u8],
    pos: usize,
}

impl<'buf> ByteCursor<'buf> {
    /// Wrap a buffer, starting at position zero
    pub fn new(buf: &'buf [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of the underlying buffer
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Move to an absolute position, which may be the end of the buffer
    pub fn seek(&mut self, pos: usize) -> error::Result<()> {
        if pos > self.buf.len() {
            return Err(error::Error::OutOfBounds {
                wanted: pos,
                available: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Move forward `n` bytes
    pub fn skip(&mut self, n: usize) -> error::Result<()> {
        let pos = self.end_of(n)?;
        self.pos = pos;
        Ok(())
    }

    fn end_of(&self, n: usize) -> error::Result<usize> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.buf.len() => Ok(end),
            _ => Err(error::Error::OutOfBounds {
                wanted: self.pos.saturating_add(n),
                available: self.buf.len(),
            }),
        }
    }

    /// Borrow the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> error::Result<&'buf [u8]> {
        let end = self.end_of(n)?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read `n` bytes as characters
    pub fn read_chars(&mut self, n: usize) -> error::Result<String> {
        let bytes = self.read_bytes(n)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    #[allow(missing_docs)]
    pub fn read_u8(&mut self) -> error::Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }
    #[allow(missing_docs)]
    pub fn read_i8(&mut self) -> error::Result<i8> {
        Ok(i8::from_be_bytes([self.read_u8()?]))
    }
    #[allow(missing_docs)]
    pub fn read_u16(&mut self) -> error::Result<u16> {
        self.read_bytes(2).map(BigEndian::read_u16)
    }
    #[allow(missing_docs)]
    pub fn read_i16(&mut self) -> error::Result<i16> {
        self.read_bytes(2).map(BigEndian::read_i16)
    }
    #[allow(missing_docs)]
    pub fn read_u32(&mut self) -> error::Result<u32> {
        self.read_bytes(4).map(BigEndian::read_u32)
    }
    #[allow(missing_docs)]
    pub fn read_i32(&mut self) -> error::Result<i32> {
        self.read_bytes(4).map(BigEndian::read_i32)
    }
    #[allow(missing_docs)]
    pub fn read_u64(&mut self) -> error::Result<u64> {
        self.read_bytes(8).map(BigEndian::read_u64)
    }
    #[allow(missing_docs)]
    pub fn read_i64(&mut self) -> error::Result<i64> {
        self.read_bytes(8).map(BigEndian::read_i64)
    }
    #[allow(missing_docs)]
    pub fn read_f32(&mut self) -> error::Result<f32> {
        self.read_bytes(4).map(BigEndian::read_f32)
    }
    #[allow(missing_docs)]
    pub fn read_f64(&mut self) -> error::Result<f64> {
        self.read_bytes(8).map(BigEndian::read_f64)
    }
}
