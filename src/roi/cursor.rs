//! Sequential field reader over an ROI byte buffer.
//!
//! The format mixes encodings: shorts and floats are big-endian, ints are
//! little-endian, bytes are unsigned. Each read advances the cursor; a read
//! past the end fails with [`DecodeError::TruncatedHeader`].

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::DecodeError;

/// Signed shorts below this are re-read as unsigned.
///
/// Counts and coordinates may legitimately exceed `i16::MAX`; the format has
/// no other way to tell them apart from genuinely negative values.
pub const SHORT_REREAD_THRESHOLD: i32 = -5000;

pub(crate) struct FieldCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> FieldCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(bytes),
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.inner.position() as usize
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Fails unless `n` more bytes are available.
    pub(crate) fn require(&self, n: usize) -> Result<(), DecodeError> {
        let needed = self.position() + n;
        if needed > self.len() {
            return Err(DecodeError::TruncatedHeader {
                needed,
                available: self.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.require(n)?;
        self.inner.set_position((self.position() + n) as u64);
        Ok(())
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.require(1)?;
        self.inner.read_u8().map_err(|_| self.truncated(1))
    }

    /// Reads a big-endian short, applying the unsigned re-read rule.
    pub(crate) fn read_short(&mut self) -> Result<i32, DecodeError> {
        self.require(2)?;
        let raw = self
            .inner
            .read_i16::<BigEndian>()
            .map_err(|_| self.truncated(2))? as i32;
        if raw >= SHORT_REREAD_THRESHOLD {
            return Ok(raw);
        }

        self.inner.set_position((self.position() - 2) as u64);
        let unsigned = self
            .inner
            .read_u16::<BigEndian>()
            .map_err(|_| self.truncated(2))?;
        Ok(unsigned as i32)
    }

    /// Reads a little-endian signed 32-bit integer.
    pub(crate) fn read_int(&mut self) -> Result<i32, DecodeError> {
        self.require(4)?;
        self.inner
            .read_i32::<LittleEndian>()
            .map_err(|_| self.truncated(4))
    }

    /// Reads a big-endian 32-bit float.
    pub(crate) fn read_float(&mut self) -> Result<f32, DecodeError> {
        self.require(4)?;
        self.inner
            .read_f32::<BigEndian>()
            .map_err(|_| self.truncated(4))
    }

    fn truncated(&self, n: usize) -> DecodeError {
        DecodeError::TruncatedHeader {
            needed: self.position() + n,
            available: self.len(),
        }
    }
}
