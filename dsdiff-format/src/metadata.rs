//! Keyed property store the decoder writes into.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::header::Element;

/// Well known property names.
pub mod keys {
    pub const FORMAT: &str = "Format";
    pub const FORMAT_VERSION: &str = "Format_Version";
    pub const TITLE: &str = "Title";
    pub const PERFORMER: &str = "Performer";
    pub const COMMENT: &str = "Comment";
    pub const ORIGINAL_SOURCE_FORM: &str = "OriginalSourceForm";
    pub const ENCODED_BY: &str = "Encoded_By";
    pub const ENCODED_APPLICATION: &str = "Encoded_Application";
    pub const TIME_ZONE: &str = "Time zone";
    pub const REVISION: &str = "Revision";
    pub const IS_TRUNCATED: &str = "IsTruncated";

    pub const FORMAT_COMMERCIAL: &str = "Format_Commercial_IfAny";
    pub const SAMPLING_RATE: &str = "SamplingRate";
    pub const CHANNELS: &str = "Channel(s)";
    pub const CHANNEL_LAYOUT: &str = "ChannelLayout";
    pub const CHANNEL_POSITIONS: &str = "ChannelPositions";
    pub const STREAM_SIZE: &str = "StreamSize";
    pub const DURATION: &str = "Duration";
    pub const TIMECODE_FIRST_FRAME: &str = "TimeCode_FirstFrame";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StreamKind {
    /// Asset level properties.
    General,
    Audio,
}

/// Destination for decoded properties, scoped per stream kind.
pub trait MetadataSink {
    /// Set `key`, replacing any previous value.
    fn fill(&mut self, stream: StreamKind, key: &str, value: String);

    /// Add another value for a multi-valued `key`.
    fn append(&mut self, stream: StreamKind, key: &str, value: String);

    /// The current value of `key`.
    fn retrieve(&self, stream: StreamKind, key: &str) -> Option<&str>;

    /// Called for every chunk the decoder visits, before its payload is handled.
    fn on_chunk(&mut self, _level: usize, _element: &Element, _name: Option<&'static str>) {}
}

/// Set `key` only if `value` differs from what is stored. Returns `true` if it was written.
pub fn fill_if_changed<S: MetadataSink + ?Sized>(
    sink: &mut S,
    stream: StreamKind,
    key: &str,
    value: String,
) -> bool {
    if sink.retrieve(stream, key) == Some(value.as_str()) {
        return false;
    }
    sink.fill(stream, key, value);
    true
}

pub type Fields = BTreeMap<String, Vec<String>>;

/// In-memory [`MetadataSink`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    general: Fields,
    audio: Fields,
}

impl Metadata {
    pub fn new() -> Metadata {
        Metadata::default()
    }

    #[inline(always)]
    pub fn stream(&self, stream: StreamKind) -> &Fields {
        match stream {
            StreamKind::General => &self.general,
            StreamKind::Audio => &self.audio,
        }
    }

    #[inline(always)]
    fn stream_mut(&mut self, stream: StreamKind) -> &mut Fields {
        match stream {
            StreamKind::General => &mut self.general,
            StreamKind::Audio => &mut self.audio,
        }
    }

    pub fn get(&self, stream: StreamKind, key: &str) -> Option<&str> {
        self.get_all(stream, key).last().map(String::as_str)
    }

    pub fn get_all(&self, stream: StreamKind, key: &str) -> &[String] {
        self.stream(stream)
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_truncated(&self) -> bool {
        self.get(StreamKind::General, keys::IS_TRUNCATED) == Some("Yes")
    }

    pub fn general(&self) -> GeneralInfo {
        let get = |key| self.get(StreamKind::General, key).map(str::to_string);

        GeneralInfo {
            format: get(keys::FORMAT),
            format_version: get(keys::FORMAT_VERSION),
            title: get(keys::TITLE),
            performer: get(keys::PERFORMER),
            comments: self.get_all(StreamKind::General, keys::COMMENT).to_vec(),
            original_source_form: get(keys::ORIGINAL_SOURCE_FORM),
            encoded_by: get(keys::ENCODED_BY),
            encoding_application: get(keys::ENCODED_APPLICATION),
            time_zone: get(keys::TIME_ZONE),
            revision: get(keys::REVISION),
            is_truncated: self.is_truncated(),
        }
    }

    fn parsed<T: FromStr>(&self, stream: StreamKind, key: &str) -> Option<T> {
        self.get(stream, key)?.parse().ok()
    }

    pub fn audio(&self) -> AudioStreamInfo {
        let get = |key| self.get(StreamKind::Audio, key).map(str::to_string);

        AudioStreamInfo {
            format: get(keys::FORMAT),
            format_commercial: get(keys::FORMAT_COMMERCIAL),
            sampling_rate: self.parsed(StreamKind::Audio, keys::SAMPLING_RATE),
            channel_count: self.parsed(StreamKind::Audio, keys::CHANNELS),
            channel_layout: get(keys::CHANNEL_LAYOUT),
            channel_positions: get(keys::CHANNEL_POSITIONS),
            stream_size: self.parsed(StreamKind::Audio, keys::STREAM_SIZE),
            duration: self.parsed(StreamKind::Audio, keys::DURATION),
            timecode_first_frame: get(keys::TIMECODE_FIRST_FRAME),
        }
    }
}

impl MetadataSink for Metadata {
    fn fill(&mut self, stream: StreamKind, key: &str, value: String) {
        self.stream_mut(stream).insert(key.to_string(), vec![value]);
    }

    fn append(&mut self, stream: StreamKind, key: &str, value: String) {
        self.stream_mut(stream)
            .entry(key.to_string())
            .or_insert_with(Vec::new)
            .push(value);
    }

    fn retrieve(&self, stream: StreamKind, key: &str) -> Option<&str> {
        self.get(stream, key)
    }
}

/// Asset level view of [`Metadata`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneralInfo {
    pub format: Option<String>,
    pub format_version: Option<String>,
    pub title: Option<String>,
    pub performer: Option<String>,
    pub comments: Vec<String>,
    pub original_source_form: Option<String>,
    pub encoded_by: Option<String>,
    pub encoding_application: Option<String>,
    pub time_zone: Option<String>,
    pub revision: Option<String>,
    pub is_truncated: bool,
}

/// Audio stream view of [`Metadata`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioStreamInfo {
    pub format: Option<String>,
    pub format_commercial: Option<String>,
    pub sampling_rate: Option<u32>,
    pub channel_count: Option<u16>,
    pub channel_layout: Option<String>,
    pub channel_positions: Option<String>,
    /// Bytes of sound data.
    pub stream_size: Option<u64>,
    /// Seconds.
    pub duration: Option<f64>,
    pub timecode_first_frame: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_and_append_accumulates() {
        let mut meta = Metadata::new();
        meta.fill(StreamKind::General, keys::TITLE, "One".into());
        meta.fill(StreamKind::General, keys::TITLE, "Two".into());
        meta.append(StreamKind::General, keys::COMMENT, "a".into());
        meta.append(StreamKind::General, keys::COMMENT, "b".into());

        assert_eq!(meta.get(StreamKind::General, keys::TITLE), Some("Two"));
        assert_eq!(meta.get_all(StreamKind::General, keys::COMMENT), ["a", "b"]);
        assert_eq!(meta.general().comments, vec!["a", "b"]);
        assert_eq!(meta.get(StreamKind::Audio, keys::TITLE), None);
    }

    #[test]
    fn change_gate_skips_equal_values() {
        let mut meta = Metadata::new();
        assert!(fill_if_changed(
            &mut meta,
            StreamKind::Audio,
            keys::CHANNEL_LAYOUT,
            "L R".into()
        ));
        assert!(!fill_if_changed(
            &mut meta,
            StreamKind::Audio,
            keys::CHANNEL_LAYOUT,
            "L R".into()
        ));
        assert!(fill_if_changed(
            &mut meta,
            StreamKind::Audio,
            keys::CHANNEL_LAYOUT,
            "L R C Ls Rs".into()
        ));
    }

    #[test]
    fn typed_audio_view() {
        let mut meta = Metadata::new();
        meta.fill(StreamKind::Audio, keys::SAMPLING_RATE, "2822400".into());
        meta.fill(StreamKind::Audio, keys::CHANNELS, "2".into());
        meta.fill(StreamKind::Audio, keys::DURATION, "1.500".into());

        let audio = meta.audio();
        assert_eq!(audio.sampling_rate, Some(2822400));
        assert_eq!(audio.channel_count, Some(2));
        assert_eq!(audio.duration, Some(1.5));
        assert_eq!(audio.stream_size, None);
    }

    #[test]
    fn out_of_range_numbers_are_not_wrapped() {
        let mut meta = Metadata::new();
        meta.fill(StreamKind::Audio, keys::SAMPLING_RATE, "4294967297".into());
        meta.fill(StreamKind::Audio, keys::CHANNELS, "65538".into());
        meta.fill(StreamKind::Audio, keys::STREAM_SIZE, "lots".into());

        let audio = meta.audio();
        assert_eq!(audio.sampling_rate, None);
        assert_eq!(audio.channel_count, None);
        assert_eq!(audio.stream_size, None);
    }
}
