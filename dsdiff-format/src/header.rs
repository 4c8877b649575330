use std::fmt;

use crate::parse::{parse_fourcc, parse_u64_be, ParseResult};

/// A four character chunk identifier.
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    #[inline(always)]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The identifier as text with surrounding spaces removed, e.g. `"LS"` for `LS  `.
    pub fn to_trimmed_string(self) -> String {
        self.to_string().trim().to_string()
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc(\"{}\")", self)
    }
}

/// The outer container magic. Its header is followed by the form type, which
/// takes over as the chunk identifier.
pub const MAGIC: FourCc = FourCc(*b"FRM8");

/// Identifier plus 64-bit size.
pub const HEADER_LEN: u64 = 12;

/// Header of the magic wrapper, including the form type.
pub const WRAPPED_HEADER_LEN: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: FourCc,
    /// Payload size as found in the stream, or as clamped to the end of it.
    pub declared_size: u64,
    /// `declared_size` is odd, so one alignment byte follows the payload.
    pub padded: bool,
    /// The chunk was introduced by the container magic.
    pub wrapped: bool,
}

impl ChunkHeader {
    /// Decode a chunk header from the start of `data`.
    pub fn parse(data: &[u8]) -> ParseResult<ChunkHeader> {
        let (id, mut consumed) = parse_fourcc(data)?;
        let (declared_size, n) = parse_u64_be(&data[consumed..])?;
        consumed += n;

        let (id, wrapped) = if id == MAGIC {
            let (form_type, n) = parse_fourcc(&data[consumed..])?;
            consumed += n;
            (form_type, true)
        } else {
            (id, false)
        };

        Ok((
            ChunkHeader {
                id,
                declared_size,
                padded: declared_size % 2 == 1,
                wrapped,
            },
            consumed,
        ))
    }

    #[inline(always)]
    pub fn header_len(&self) -> u64 {
        if self.wrapped {
            WRAPPED_HEADER_LEN
        } else {
            HEADER_LEN
        }
    }

    /// Bytes the chunk occupies after its size field, alignment byte included.
    #[inline(always)]
    pub fn span(&self) -> u64 {
        self.declared_size + self.padded as u64
    }

    /// Shrink the declared size so that the payload starting at `payload_start`
    /// ends no later than `limit`. Returns `true` if the size was clamped.
    pub fn clamp_to(&mut self, payload_start: u64, limit: u64) -> bool {
        if payload_start.saturating_add(self.declared_size) <= limit {
            return false;
        }
        self.declared_size = limit.saturating_sub(payload_start);
        self.padded = self.declared_size % 2 == 1;
        true
    }
}

/// A chunk being visited, positioned in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub header: ChunkHeader,
    /// Absolute offset of the chunk identifier.
    pub offset: u64,
    /// Absolute offset of the first payload byte handed to a decoder.
    pub payload_start: u64,
    /// Exclusive end of the payload.
    pub bound: u64,
    /// Where the next sibling starts.
    pub next: u64,
    /// The payload had to be cut short to stay inside the parent.
    pub clamped_by_parent: bool,
}

impl Element {
    pub fn new(header: ChunkHeader, offset: u64, parent_bound: u64) -> Element {
        let size_end = offset + HEADER_LEN;
        let end = size_end.saturating_add(header.declared_size);
        let bound = end.min(parent_bound);
        let payload_start = (offset + header.header_len()).min(bound);
        let next = end.saturating_add(header.padded as u64).min(parent_bound);

        Element {
            header,
            offset,
            payload_start,
            bound,
            next,
            clamped_by_parent: end > parent_bound,
        }
    }

    #[inline(always)]
    pub fn payload_len(&self) -> u64 {
        self.bound - self.payload_start
    }
}
