//! Decoders for leaf chunks.
//!
//! Each decoder reads its fields from the chunk's own payload and then writes
//! what it found into a [`MetadataSink`]. Decoding and filling are separate so
//! that an atom whose fields overrun the chunk fills nothing.

mod comments;
mod master_info;
mod properties;

pub use self::comments::{Comment, CommentKind, Comments};
pub use self::master_info::{Artist, Marker, Title};
pub use self::properties::{
    AbsoluteStartTime, Channels, CompressionType, LoudspeakerConfig, SampleRate,
};

use crate::header::Element;
use crate::metadata::{keys, MetadataSink, StreamKind};
use crate::parse::{FieldOverrun, FieldReader};
use crate::schema::{Atom, Opaque};
use crate::text::TextEncoding;

pub trait DecodeAtom: Sized {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Self, FieldOverrun>;

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S);
}

/// `FVER`: four version components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatVersion(pub [u8; 4]);

impl DecodeAtom for FormatVersion {
    fn decode(reader: &mut FieldReader<'_>, _: TextEncoding) -> Result<Self, FieldOverrun> {
        Ok(FormatVersion([
            reader.u8()?,
            reader.u8()?,
            reader.u8()?,
            reader.u8()?,
        ]))
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        let [a, b, c, d] = self.0;
        sink.fill(
            StreamKind::General,
            keys::FORMAT_VERSION,
            format!("Version {}.{}.{}.{}", a, b, c, d),
        );
    }
}

fn apply<A: DecodeAtom, S: MetadataSink + ?Sized>(
    reader: &mut FieldReader<'_>,
    encoding: TextEncoding,
    sink: &mut S,
) -> Result<(), FieldOverrun> {
    let value = A::decode(reader, encoding)?;
    value.fill(sink);
    Ok(())
}

/// Decode the payload of `atom` and fill `sink` with its fields.
pub(crate) fn decode_atom<S: MetadataSink + ?Sized>(
    atom: Atom,
    payload: &[u8],
    encoding: TextEncoding,
    sink: &mut S,
) {
    let mut reader = FieldReader::new(payload);
    let result = match atom {
        Atom::Comments => apply::<Comments, S>(&mut reader, encoding, sink),
        Atom::Artist => apply::<Artist, S>(&mut reader, encoding, sink),
        Atom::Title => apply::<Title, S>(&mut reader, encoding, sink),
        Atom::Marker => apply::<Marker, S>(&mut reader, encoding, sink),
        Atom::FormatVersion => apply::<FormatVersion, S>(&mut reader, encoding, sink),
        Atom::AbsoluteStartTime => apply::<AbsoluteStartTime, S>(&mut reader, encoding, sink),
        Atom::Channels => apply::<Channels, S>(&mut reader, encoding, sink),
        Atom::CompressionType => apply::<CompressionType, S>(&mut reader, encoding, sink),
        Atom::SampleRate => apply::<SampleRate, S>(&mut reader, encoding, sink),
        Atom::LoudspeakerConfig => apply::<LoudspeakerConfig, S>(&mut reader, encoding, sink),
    };

    if let Err(e) = result {
        tracing::warn!(?atom, error = %e, "chunk truncated, fields dropped");
    }
}

/// Record what is known about a chunk whose payload is skipped.
pub(crate) fn fill_opaque<S: MetadataSink + ?Sized>(opaque: Opaque, element: &Element, sink: &mut S) {
    match opaque {
        Opaque::DsdSoundData => {
            sink.fill(
                StreamKind::Audio,
                keys::STREAM_SIZE,
                element.payload_len().to_string(),
            );
        }
        // Compressed size says nothing about the decoded stream.
        Opaque::DstSoundData | Opaque::EditedMasterId => {}
    }
}
