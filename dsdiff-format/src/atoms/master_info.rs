use super::DecodeAtom;
use crate::metadata::{keys, MetadataSink, StreamKind};
use crate::parse::{FieldOverrun, FieldReader};
use crate::text::TextEncoding;

fn counted_text(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<String, FieldOverrun> {
    let count = reader.u32()?;
    let text = reader.text(count as u64, encoding)?;
    reader.skip_pad(count as usize);
    Ok(text)
}

/// `DIAR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist(pub String);

impl DecodeAtom for Artist {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Self, FieldOverrun> {
        counted_text(reader, encoding).map(Artist)
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        sink.fill(StreamKind::General, keys::PERFORMER, self.0);
    }
}

/// `DITI`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(pub String);

impl DecodeAtom for Title {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Self, FieldOverrun> {
        counted_text(reader, encoding).map(Title)
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        sink.fill(StreamKind::General, keys::TITLE, self.0);
    }
}

/// `MARK`. Decoded so the chunk is validated, but nothing is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub samples: u32,
    pub offset: u32,
    pub mark_type: u16,
    pub mark_channel: u16,
    pub track_flags: u16,
    pub text: String,
}

impl DecodeAtom for Marker {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Self, FieldOverrun> {
        let hours = reader.u16()?;
        let minutes = reader.u8()?;
        let seconds = reader.u8()?;
        let samples = reader.u32()?;
        let offset = reader.u32()?;
        let mark_type = reader.u16()?;
        let mark_channel = reader.u16()?;
        let track_flags = reader.u16()?;
        let count = reader.u32()?;
        let text = reader.text(count as u64, encoding)?;

        Ok(Marker {
            hours,
            minutes,
            seconds,
            samples,
            offset,
            mark_type,
            mark_channel,
            track_flags,
            text,
        })
    }

    fn fill<S: MetadataSink + ?Sized>(self, _sink: &mut S) {
        tracing::debug!(
            hours = self.hours,
            minutes = self.minutes,
            seconds = self.seconds,
            samples = self.samples,
            mark_type = self.mark_type,
            text = %self.text,
            "marker"
        );
    }
}
