use std::fmt;
use std::str::FromStr;

/// Encoding used for the free text stored in comments, artist and title chunks.
///
/// DSDIFF leaves the character set of these strings to the writer, so it is
/// chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with invalid sequences replaced.
    Utf8,
    /// ISO-8859-1.
    Latin1,
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf8
    }
}

impl TextEncoding {
    pub const fn available_variants() -> &'static [&'static str] {
        &["utf8", "latin1"]
    }

    /// Decode `bytes`, dropping trailing NUL terminators.
    pub fn decode(self, bytes: &[u8]) -> String {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let bytes = &bytes[..end];

        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Latin1 => "latin1",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown text encoding: {0}")]
pub struct ParseEncodingError(String);

impl FromStr for TextEncoding {
    type Err = ParseEncodingError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let encoding = match src.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => TextEncoding::Utf8,
            "latin1" | "latin-1" | "iso-8859-1" => TextEncoding::Latin1,
            _ => return Err(ParseEncodingError(src.to_string())),
        };

        Ok(encoding)
    }
}

/// Options controlling how a stream is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub text_encoding: TextEncoding,
}

impl DecodeOptions {
    pub fn with_text_encoding(text_encoding: TextEncoding) -> DecodeOptions {
        DecodeOptions { text_encoding }
    }
}
