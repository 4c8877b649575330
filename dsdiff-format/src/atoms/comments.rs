use super::DecodeAtom;
use crate::metadata::{keys, MetadataSink, StreamKind};
use crate::parse::{FieldOverrun, FieldReader};
use crate::text::TextEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    General,
    Channel,
    SoundSource,
    FileHistory,
    Unknown(u16),
}

impl From<u16> for CommentKind {
    fn from(value: u16) -> Self {
        match value {
            0 => CommentKind::General,
            1 => CommentKind::Channel,
            2 => CommentKind::SoundSource,
            3 => CommentKind::FileHistory,
            other => CommentKind::Unknown(other),
        }
    }
}

const SOUND_SOURCES: [&str; 3] = ["DSD recording, ", "Analogue recording, ", "PCM recording, "];

const FILE_HISTORY_KEYS: [&str; 5] = [
    keys::COMMENT,
    keys::ENCODED_BY,
    keys::ENCODED_APPLICATION,
    keys::TIME_ZONE,
    keys::REVISION,
];

/// One entry of a `COMT` chunk. The time stamp is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub reference: u16,
    pub text: String,
}

impl Comment {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Comment, FieldOverrun> {
        // year:2, month, day, hour, minutes
        reader.skip(6)?;
        let kind = CommentKind::from(reader.u16()?);
        let reference = reader.u16()?;
        let count = reader.u32()?;
        let text = reader.text(count as u64, encoding)?;
        reader.skip_pad(count as usize);

        Ok(Comment {
            kind,
            reference,
            text,
        })
    }

    /// Where the comment ends up: key, value and whether it adds to existing values.
    pub fn route(&self) -> Option<(&'static str, String, bool)> {
        let text = &self.text;
        let r = self.reference;

        let routed = match self.kind {
            CommentKind::General if r == 0 => (keys::COMMENT, text.clone(), true),
            CommentKind::General => return None,
            CommentKind::Channel if r == 0 => (keys::COMMENT, text.clone(), true),
            CommentKind::Channel => (keys::COMMENT, format!("Channel {}: {}", r, text), true),
            CommentKind::SoundSource => {
                let value = match SOUND_SOURCES.get(r as usize) {
                    Some(prefix) => format!("{}{}", prefix, text),
                    None => format!("{}, {}", r, text),
                };
                (keys::ORIGINAL_SOURCE_FORM, value, false)
            }
            CommentKind::FileHistory => match FILE_HISTORY_KEYS.get(r as usize) {
                Some(&key) => (key, text.clone(), key == keys::COMMENT),
                None => (keys::COMMENT, format!("{}, {}", r, text), true),
            },
            CommentKind::Unknown(ty) => (
                keys::ORIGINAL_SOURCE_FORM,
                format!("{}, {}, {}", ty, r, text),
                false,
            ),
        };

        Some(routed)
    }
}

/// `COMT`: a counted list of comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    pub entries: Vec<Comment>,
    /// Set when the chunk ended inside a comment; earlier comments are kept.
    pub overrun: Option<FieldOverrun>,
}

impl DecodeAtom for Comments {
    fn decode(reader: &mut FieldReader<'_>, encoding: TextEncoding) -> Result<Self, FieldOverrun> {
        let count = reader.u16()?;
        let mut comments = Comments::default();

        for _ in 0..count {
            match Comment::decode(reader, encoding) {
                Ok(comment) => comments.entries.push(comment),
                Err(e) => {
                    comments.overrun = Some(e);
                    break;
                }
            }
        }

        Ok(comments)
    }

    fn fill<S: MetadataSink + ?Sized>(self, sink: &mut S) {
        if let Some(e) = self.overrun {
            tracing::warn!(
                decoded = self.entries.len(),
                error = %e,
                "comment list truncated"
            );
        }

        for comment in self.entries.iter() {
            match comment.route() {
                Some((key, value, true)) => sink.append(StreamKind::General, key, value),
                Some((key, value, false)) => sink.fill(StreamKind::General, key, value),
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn comment(ty: u16, r: u16, text: &str) -> Vec<u8> {
        let mut out = vec![0x07, 0xE4, 12, 31, 23, 59];
        out.extend_from_slice(&ty.to_be_bytes());
        out.extend_from_slice(&r.to_be_bytes());
        out.extend_from_slice(&(text.len() as u32).to_be_bytes());
        out.extend_from_slice(text.as_bytes());
        if text.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn comments(list: &[(u16, u16, &str)]) -> Vec<u8> {
        let mut out = (list.len() as u16).to_be_bytes().to_vec();
        for &(ty, r, text) in list {
            out.extend(comment(ty, r, text));
        }
        out
    }

    fn decode_into(data: &[u8]) -> Metadata {
        let mut meta = Metadata::new();
        let mut reader = FieldReader::new(data);
        Comments::decode(&mut reader, TextEncoding::Utf8)
            .unwrap()
            .fill(&mut meta);
        meta
    }

    #[test]
    fn routes_by_type_and_reference() {
        let meta = decode_into(&comments(&[
            (0, 0, "general"),
            (0, 5, "ignored"),
            (1, 0, "all channels"),
            (1, 2, "right"),
            (2, 1, "tape"),
            (3, 1, "engineer"),
            (3, 2, "app"),
            (3, 3, "UTC+1"),
            (3, 4, "r2"),
        ]));

        let general = meta.general();
        assert_eq!(
            general.comments,
            vec!["general", "all channels", "Channel 2: right"]
        );
        assert_eq!(
            general.original_source_form.as_deref(),
            Some("Analogue recording, tape")
        );
        assert_eq!(general.encoded_by.as_deref(), Some("engineer"));
        assert_eq!(general.encoding_application.as_deref(), Some("app"));
        assert_eq!(general.time_zone.as_deref(), Some("UTC+1"));
        assert_eq!(general.revision.as_deref(), Some("r2"));
    }

    #[test]
    fn unknown_references_fall_back_to_numbers() {
        let meta = decode_into(&comments(&[(2, 7, "x"), (3, 9, "y")]));
        assert_eq!(
            meta.get(StreamKind::General, keys::ORIGINAL_SOURCE_FORM),
            Some("7, x")
        );
        assert_eq!(meta.get(StreamKind::General, keys::COMMENT), Some("9, y"));
    }

    #[test]
    fn unknown_type_is_caught() {
        let meta = decode_into(&comments(&[(2, 0, "first"), (9, 4, "other")]));
        assert_eq!(
            meta.get(StreamKind::General, keys::ORIGINAL_SOURCE_FORM),
            Some("9, 4, other")
        );
    }

    #[test]
    fn truncated_list_keeps_complete_comments() {
        let mut data = comments(&[(0, 0, "kept"), (0, 0, "lost text")]);
        data.truncate(data.len() - 3);

        let mut reader = FieldReader::new(&data);
        let decoded = Comments::decode(&mut reader, TextEncoding::Utf8).unwrap();
        assert_eq!(decoded.entries.len(), 1);
        assert!(decoded.overrun.is_some());

        let meta = decode_into(&data);
        assert_eq!(meta.general().comments, vec!["kept"]);
    }

    #[test]
    fn odd_text_is_followed_by_pad() {
        let meta = decode_into(&comments(&[(0, 0, "odd"), (0, 0, "even")]));
        assert_eq!(meta.general().comments, vec!["odd", "even"]);
    }
}
