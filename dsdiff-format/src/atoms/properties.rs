use super::DecodeAtom;
use crate::header::FourCc;
use crate::metadata::{fill_if_changed, keys, MetadataSink, StreamKind};
use crate::parse::{FieldOverrun, FieldReader};
use crate::text::TextEncoding;

const CHANNEL_NAMES: &[(FourCc, &str)] = &[
    (FourCc(*b"C   "), "C"),
    (FourCc(*b"MLFT"), "L"),
    (FourCc(*b"SLFT"), "L"),
    (FourCc(*b"MRGT"), "R"),
    (FourCc(*b"SRGT"), "R"),
    (FourCc(*b"LS  "), "Ls"),
    (FourCc(*b"RS  "), "Rs"),
    (FourCc(*b"LFE "), "LFE"),
];

/// Position description and channel layout per loudspeaker configuration.
/// Entries 1 and 2 are reserved.
const LOUDSPEAKER_CONFIGS: [(&str, &str); 5] = [
    ("Front: L R", "L R"),
    ("", ""),
    ("", ""),
    ("Front: L C R, Side: L R", "L R C Ls Rs"),
    ("Front: L C R, Side: L R, LFE", "L R C Ls Rs LFE"),
];

const LOUDSPEAKER_UNDEFINED: u16 = 0xFFFF;

const COMPRESSION_DSD: FourCc = FourCc(*b"DSD ");
const COMPRESSION_DST: FourCc = FourCc(*b"DST ");

/// `FS  `
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRate(pub u32);

impl DecodeAtom for SampleRate {
    fn decode(reader: &mut FieldReader<'_>, _: TextEncoding) -> Result<Self, FieldOverrun> {
        reader.u32().map(SampleRate)
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        sink.fill(StreamKind::Audio, keys::SAMPLING_RATE, self.0.to_string());
    }
}

/// `CHNL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels {
    pub count: u16,
    pub ids: Vec<FourCc>,
}

impl Channels {
    pub fn channel_name(id: FourCc) -> String {
        CHANNEL_NAMES
            .iter()
            .find(|(code, _)| *code == id)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| id.to_trimmed_string())
    }

    pub fn layout(&self) -> String {
        self.ids
            .iter()
            .map(|&id| Channels::channel_name(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl DecodeAtom for Channels {
    fn decode(reader: &mut FieldReader<'_>, _: TextEncoding) -> Result<Self, FieldOverrun> {
        let count = reader.u16()?;
        let mut ids = Vec::with_capacity(count as usize);
        while !reader.is_empty() {
            ids.push(reader.fourcc()?);
        }
        Ok(Channels { count, ids })
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        sink.fill(StreamKind::Audio, keys::CHANNELS, self.count.to_string());
        fill_if_changed(sink, StreamKind::Audio, keys::CHANNEL_LAYOUT, self.layout());
    }
}

/// `CMPR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionType {
    pub id: FourCc,
    pub name: String,
}

impl CompressionType {
    pub fn format(&self) -> String {
        match self.id {
            COMPRESSION_DSD => "DSD".into(),
            COMPRESSION_DST => "DST".into(),
            other => other.to_string(),
        }
    }
}

impl DecodeAtom for CompressionType {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Self, FieldOverrun> {
        let id = reader.fourcc()?;
        let count = reader.u8()?;
        let name = reader.text(count as u64, encoding)?;
        Ok(CompressionType { id, name })
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        sink.fill(StreamKind::Audio, keys::FORMAT, self.format());
    }
}

/// `ABSS`: time code of the first sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteStartTime {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub samples: u32,
}

impl AbsoluteStartTime {
    /// `HH:MM:SS:samples`, the sample count padded to the ten digits a `u32` can take.
    pub fn timecode(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:010}",
            self.hours, self.minutes, self.seconds, self.samples
        )
    }
}

impl DecodeAtom for AbsoluteStartTime {
    fn decode(reader: &mut FieldReader<'_>, _: TextEncoding) -> Result<Self, FieldOverrun> {
        Ok(AbsoluteStartTime {
            hours: reader.u16()?,
            minutes: reader.u8()?,
            seconds: reader.u8()?,
            samples: reader.u32()?,
        })
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        sink.fill(StreamKind::Audio, keys::TIMECODE_FIRST_FRAME, self.timecode());
    }
}

/// `LSCO`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoudspeakerConfig(pub u16);

impl LoudspeakerConfig {
    /// Position description and channel layout, if the configuration says anything.
    pub fn describe(self) -> Option<(String, String)> {
        match self.0 {
            LOUDSPEAKER_UNDEFINED => None,
            index => match LOUDSPEAKER_CONFIGS.get(index as usize) {
                Some(("", _)) => None,
                Some((positions, layout)) => Some((positions.to_string(), layout.to_string())),
                None => Some((index.to_string(), index.to_string())),
            },
        }
    }
}

impl DecodeAtom for LoudspeakerConfig {
    fn decode(reader: &mut FieldReader<'_>, _: TextEncoding) -> Result<Self, FieldOverrun> {
        reader.u16().map(LoudspeakerConfig)
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        if let Some((positions, layout)) = self.describe() {
            sink.fill(StreamKind::Audio, keys::CHANNEL_POSITIONS, positions);
            fill_if_changed(sink, StreamKind::Audio, keys::CHANNEL_LAYOUT, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn decode<A: DecodeAtom>(data: &[u8]) -> A {
        A::decode(&mut FieldReader::new(data), TextEncoding::Utf8).unwrap()
    }

    #[test]
    fn channel_codes_map_to_names() {
        let channels: Channels = decode(b"\0\x06MLFTSRGTC   LFE LS  RS  ");
        assert_eq!(channels.count, 6);
        assert_eq!(channels.layout(), "L R C LFE Ls Rs");

        let channels: Channels = decode(b"\0\x02c001MRGT");
        assert_eq!(channels.layout(), "c001 R");

        assert_eq!(Channels::channel_name(FourCc(*b" X  ")), "X");
    }

    #[test]
    fn trailing_partial_code_overruns() {
        let result = Channels::decode(&mut FieldReader::new(b"\0\x01MLFTSR"), TextEncoding::Utf8);
        assert!(result.is_err());
    }

    #[test]
    fn channels_fill_count_and_layout() {
        let mut meta = Metadata::new();
        decode::<Channels>(b"\0\x02SLFTSRGT").fill(&mut meta);
        assert_eq!(meta.get(StreamKind::Audio, keys::CHANNELS), Some("2"));
        assert_eq!(meta.get(StreamKind::Audio, keys::CHANNEL_LAYOUT), Some("L R"));
    }

    #[test]
    fn compression_formats() {
        let cmpr: CompressionType = decode(b"DSD \x0enot compressed\0");
        assert_eq!(cmpr.format(), "DSD");
        assert_eq!(cmpr.name, "not compressed");

        let cmpr: CompressionType = decode(b"DST \x0eDST Encoded\0\0\0");
        assert_eq!(cmpr.format(), "DST");

        let cmpr: CompressionType = decode(b"ABCD\0");
        assert_eq!(cmpr.format(), "ABCD");
    }

    #[test]
    fn sample_rate() {
        let mut meta = Metadata::new();
        decode::<SampleRate>(&2822400u32.to_be_bytes()).fill(&mut meta);
        assert_eq!(meta.audio().sampling_rate, Some(2822400));
    }

    #[test]
    fn start_time_has_a_fixed_width() {
        let abss: AbsoluteStartTime = decode(&[0, 1, 2, 3, 0, 0, 0, 5]);
        assert_eq!(abss.timecode(), "01:02:03:0000000005");

        let abss: AbsoluteStartTime = decode(&[0, 0, 0, 0, 0, 0, 0x01, 0x00]);
        assert_eq!(abss.timecode(), "00:00:00:0000000256");

        let abss: AbsoluteStartTime = decode(&[0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(abss.timecode(), "00:00:00:4294967295");
        let zero: AbsoluteStartTime = decode(&[0; 8]);
        assert_eq!(zero.timecode().len(), abss.timecode().len());
    }

    #[test]
    fn loudspeaker_table() {
        assert_eq!(
            LoudspeakerConfig(0).describe(),
            Some(("Front: L R".to_string(), "L R".to_string()))
        );
        assert_eq!(LoudspeakerConfig(1).describe(), None);
        assert_eq!(LoudspeakerConfig(2).describe(), None);
        assert_eq!(
            LoudspeakerConfig(4).describe().unwrap().1,
            "L R C Ls Rs LFE"
        );
        assert_eq!(
            LoudspeakerConfig(65).describe(),
            Some(("65".to_string(), "65".to_string()))
        );
        assert_eq!(LoudspeakerConfig(0xFFFF).describe(), None);
    }

    #[test]
    fn loudspeaker_fills_positions() {
        let mut meta = Metadata::new();
        LoudspeakerConfig(3).fill(&mut meta);
        let audio = meta.audio();
        assert_eq!(
            audio.channel_positions.as_deref(),
            Some("Front: L C R, Side: L R")
        );
        assert_eq!(audio.channel_layout.as_deref(), Some("L R C Ls Rs"));

        let mut meta = Metadata::new();
        LoudspeakerConfig(0xFFFF).fill(&mut meta);
        assert_eq!(meta, Metadata::new());
    }
}
