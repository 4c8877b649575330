//! Metadata decoder for DSDIFF (`.dff`) audio files.
//!
//! A DSDIFF file is a tree of chunks rooted in an `FRM8` container. The
//! [`Decoder`] walks that tree without owning any input, handing each known
//! chunk to a decoder in [`atoms`] which writes what it finds into a
//! [`MetadataSink`]. [`decode_slice`], [`decode_reader`] and [`DsdiffFile`]
//! drive the decoder over the usual kinds of input.

pub mod atoms;
mod error;
mod file;
pub mod finalize;
mod header;
pub mod metadata;
pub mod parse;
pub mod schema;
mod text;
mod walker;

pub use error::DecodeError;
#[cfg(feature = "reader")]
pub use file::reader::DsdiffFile;
pub use file::{decode_reader, decode_reader_into, decode_slice, decode_slice_into};
pub use header::{ChunkHeader, Element, FourCc};
pub use metadata::{AudioStreamInfo, GeneralInfo, Metadata, MetadataSink, StreamKind};
pub use text::{DecodeOptions, ParseEncodingError, TextEncoding};
pub use walker::{Decoder, Status};
