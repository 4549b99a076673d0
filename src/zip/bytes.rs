//! Bounds-checked little-endian reads over a byte slice.
//!
//! All higher-level readers go through [`SliceReader`]; no offset arithmetic
//! on the buffer happens anywhere else. A read that would pass the end of
//! the slice fails with [`ZipError::Truncated`] instead of reading.

use byteorder::{ByteOrder, LittleEndian};

use super::error::ZipError;

/// A cursor over an immutable byte slice with little-endian extraction.
pub struct SliceReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Create a reader positioned at `pos` within `buf`.
    pub fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    /// Current byte offset into the underlying buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn advance(&mut self, n: usize) -> Result<&'a [u8], ZipError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(ZipError::Truncated(self.pos))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read a little-endian u16 and advance by two bytes.
    pub fn read_u16(&mut self) -> Result<u16, ZipError> {
        Ok(LittleEndian::read_u16(self.advance(2)?))
    }

    /// Read a little-endian u32 and advance by four bytes.
    pub fn read_u32(&mut self) -> Result<u32, ZipError> {
        Ok(LittleEndian::read_u32(self.advance(4)?))
    }

    /// Take the next `n` bytes as a span borrowing from the buffer.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], ZipError> {
        self.advance(n)
    }
}
