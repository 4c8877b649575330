use std::io::{Read, Seek, SeekFrom};

use crate::metadata::{Metadata, MetadataSink};
use crate::text::DecodeOptions;
use crate::walker::{Decoder, Status};
use crate::DecodeError;

#[cfg(feature = "reader")]
pub mod reader;

/// Bytes requested from a reader at a time. Large enough for every chunk
/// preceding the sound data in ordinary files.
const READ_WINDOW: usize = 64 * 1024;

/// Decode a stream that is entirely in memory.
pub fn decode_slice(data: &[u8], options: DecodeOptions) -> Result<Metadata, DecodeError> {
    decode_slice_into(data, options, Metadata::new())
}

/// Decode a stream that is entirely in memory into `sink`.
pub fn decode_slice_into<S: MetadataSink>(
    data: &[u8],
    options: DecodeOptions,
    sink: S,
) -> Result<S, DecodeError> {
    let mut decoder = Decoder::with_sink(data.len() as u64, options, sink);
    if let Status::Incomplete { .. } = decoder.parse(data)? {
        decoder.finish()?;
    }
    Ok(decoder.into_sink())
}

/// Decode a stream from `reader`, seeking over chunks whose payload is not needed.
pub fn decode_reader<R: Read + Seek>(
    reader: R,
    options: DecodeOptions,
) -> Result<Metadata, DecodeError> {
    decode_reader_into(reader, options, Metadata::new())
}

pub fn decode_reader_into<R: Read + Seek, S: MetadataSink>(
    mut reader: R,
    options: DecodeOptions,
    sink: S,
) -> Result<S, DecodeError> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    let mut decoder = Decoder::with_sink(file_size, options, sink);
    let mut buf = Vec::with_capacity(READ_WINDOW);
    let mut want = READ_WINDOW;

    loop {
        let position = decoder.position();
        let window = (want as u64).min(file_size.saturating_sub(position));

        reader.seek(SeekFrom::Start(position))?;
        buf.clear();
        (&mut reader).take(window).read_to_end(&mut buf)?;

        match decoder.parse(&buf)? {
            Status::Finished => break,
            Status::Incomplete { needed } => {
                if decoder.position() == position && (buf.len() as u64) < window {
                    tracing::warn!(
                        position = format_args!("{:#x}", position),
                        read = buf.len(),
                        "reader ended before its reported size"
                    );
                    decoder.finish()?;
                    break;
                }
                want = needed.max(READ_WINDOW);
            }
        }
    }

    Ok(decoder.into_sink())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{keys, StreamKind};

    #[test]
    fn short_input_is_rejected() {
        match decode_slice(b"FR", DecodeOptions::default()) {
            Err(DecodeError::NotDsdiff { found: None }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(decode_slice(&[], DecodeOptions::default()).is_err());
    }

    #[test]
    fn magic_only() {
        let meta = decode_slice(b"FRM8", DecodeOptions::default()).unwrap();
        assert_eq!(meta.get(StreamKind::General, keys::FORMAT), Some("DSDIFF"));
    }
}
