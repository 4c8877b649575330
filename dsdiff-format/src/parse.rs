//! Sans-IO parsing primitives for DSDIFF chunks.
//!
//! The free functions work on byte slices without any I/O traits and return
//! `(value, bytes_consumed)` on success, leaving buffer management to the
//! caller. [`FieldReader`] walks the payload of a single atom and never reads
//! past the end of it.

use std::convert::TryFrom;

use byteorder::{BigEndian, ByteOrder};

use crate::header::FourCc;
use crate::text::TextEncoding;

/// Error type for parsing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Need more bytes to complete parsing. Contains minimum additional bytes needed.
    #[error("need {0} more bytes")]
    NeedMoreBytes(usize),

    /// The leading bytes are not the `FRM8` container magic.
    #[error("not a DSDIFF stream (found {})", found_str(.0))]
    Rejected(Option<FourCc>),
}

fn found_str(found: &Option<FourCc>) -> String {
    match found {
        Some(id) => format!("`{}`", id),
        None => "fewer than 4 bytes".into(),
    }
}

pub type ParseResult<T> = Result<(T, usize), ParseError>;

#[inline]
fn need(data: &[u8], len: usize) -> Result<(), ParseError> {
    if data.len() < len {
        return Err(ParseError::NeedMoreBytes(len - data.len()));
    }
    Ok(())
}

/// Parse a big-endian u64.
#[inline]
pub fn parse_u64_be(data: &[u8]) -> ParseResult<u64> {
    need(data, 8)?;
    Ok((BigEndian::read_u64(data), 8))
}

/// Parse a four character code.
#[inline]
pub fn parse_fourcc(data: &[u8]) -> ParseResult<FourCc> {
    need(data, 4)?;
    Ok((FourCc([data[0], data[1], data[2], data[3]]), 4))
}

/// A field inside an atom pointed past the end of the atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("field of {needed} bytes overruns chunk ({available} bytes left)")]
pub struct FieldOverrun {
    pub needed: usize,
    pub available: usize,
}

/// Bounded big-endian reader over the payload of one atom.
///
/// Reads that would cross the end of the payload fail with [`FieldOverrun`]
/// and leave the reader clamped at the end, so nothing is ever read from the
/// following chunk.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> FieldReader<'a> {
        FieldReader { data, pos: 0 }
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], FieldOverrun> {
        let available = self.remaining();
        if len > available {
            self.pos = self.data.len();
            return Err(FieldOverrun {
                needed: len,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), FieldOverrun> {
        self.take(len).map(|_| ())
    }

    /// Skip the alignment byte that follows an odd-length text, if present.
    pub fn skip_pad(&mut self, len: usize) {
        if len % 2 == 1 && !self.is_empty() {
            self.pos += 1;
        }
    }

    pub fn u8(&mut self) -> Result<u8, FieldOverrun> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, FieldOverrun> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn u32(&mut self) -> Result<u32, FieldOverrun> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn fourcc(&mut self) -> Result<FourCc, FieldOverrun> {
        let b = self.take(4)?;
        Ok(FourCc([b[0], b[1], b[2], b[3]]))
    }

    /// Read `len` bytes of text in the configured encoding.
    pub fn text(&mut self, len: u64, encoding: TextEncoding) -> Result<String, FieldOverrun> {
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        self.take(len).map(|bytes| encoding.decode(bytes))
    }
}
