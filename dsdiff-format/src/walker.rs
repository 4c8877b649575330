use std::convert::TryFrom;

use crate::atoms;
use crate::finalize::finalize;
use crate::header::{ChunkHeader, Element, HEADER_LEN, MAGIC};
use crate::metadata::{keys, Metadata, MetadataSink, StreamKind};
use crate::parse::{parse_fourcc, ParseError};
use crate::schema::{self, ChunkKind, Container, Entry};
use crate::text::DecodeOptions;

/// Outcome of [`Decoder::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// At least `needed` bytes starting at [`Decoder::position`] are required to go on.
    Incomplete { needed: usize },
    /// The stream has been walked and the finalizer has run.
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    container: Container,
    bound: u64,
    /// Position after the container, alignment byte included.
    next: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Magic,
    Walking,
    Finished,
}

/// Resumable DSDIFF chunk walker.
///
/// The decoder owns no input. Each call to [`parse`](Decoder::parse) is given
/// the bytes available from [`position`](Decoder::position) onwards and
/// consumes as much as it can; when it stops with [`Status::Incomplete`] the
/// caller supplies bytes from the new position and calls again. Payloads of
/// sound data chunks are skipped, so their bytes never need to be supplied.
#[derive(Debug)]
pub struct Decoder<S = Metadata> {
    options: DecodeOptions,
    file_size: u64,
    position: u64,
    frames: Vec<Frame>,
    state: State,
    truncated: bool,
    sink: S,
}

impl Decoder<Metadata> {
    pub fn new(file_size: u64, options: DecodeOptions) -> Decoder<Metadata> {
        Decoder::with_sink(file_size, options, Metadata::new())
    }
}

impl<S: MetadataSink> Decoder<S> {
    pub fn with_sink(file_size: u64, options: DecodeOptions, sink: S) -> Decoder<S> {
        Decoder {
            options,
            file_size,
            position: 0,
            frames: Vec::new(),
            state: State::Magic,
            truncated: false,
            sink,
        }
    }

    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline(always)]
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of containers currently open.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline(always)]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    #[inline(always)]
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    #[inline(always)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Walk as far as `data` allows. `data` must start at [`position`](Decoder::position).
    pub fn parse(&mut self, data: &[u8]) -> Result<Status, ParseError> {
        let base = self.position;

        loop {
            let avail = usize::try_from(self.position - base)
                .ok()
                .and_then(|offset| data.get(offset..))
                .unwrap_or(&[]);

            let needed = match self.state {
                State::Finished => return Ok(Status::Finished),
                State::Magic => self.accept(avail)?,
                State::Walking => self.step(avail),
            };

            if let Some(needed) = needed {
                return Ok(Status::Incomplete { needed });
            }
        }
    }

    /// Stop walking and derive the stream values from what was found so far.
    ///
    /// Used when the input ends before the decoder finished on its own.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        match self.state {
            State::Magic => Err(ParseError::Rejected(None)),
            State::Walking => {
                tracing::warn!(
                    position = format_args!("{:#x}", self.position),
                    depth = self.frames.len(),
                    "input ended before the last chunk"
                );
                self.frames.clear();
                self.complete();
                Ok(())
            }
            State::Finished => Ok(()),
        }
    }

    fn accept(&mut self, avail: &[u8]) -> Result<Option<usize>, ParseError> {
        if self.file_size < 4 {
            return Err(ParseError::Rejected(None));
        }

        let id = match parse_fourcc(avail) {
            Ok((id, _)) => id,
            Err(ParseError::NeedMoreBytes(n)) => return Ok(Some(avail.len() + n)),
            Err(e) => return Err(e),
        };

        if id != MAGIC {
            return Err(ParseError::Rejected(Some(id)));
        }

        tracing::debug!(file_size = self.file_size, "accepted DSDIFF stream");
        self.sink
            .fill(StreamKind::General, keys::FORMAT, "DSDIFF".into());
        self.frames.push(Frame {
            container: Container::Root,
            bound: self.file_size,
            next: self.file_size,
        });
        self.state = State::Walking;
        Ok(None)
    }

    fn complete(&mut self) {
        finalize(&mut self.sink);
        self.state = State::Finished;
    }

    fn leave(&mut self) {
        if let Some(frame) = self.frames.pop() {
            tracing::trace!(
                container = ?frame.container,
                end = format_args!("{:#x}", frame.next),
                "leaving container"
            );
            self.position = frame.next;
        }
    }

    /// Handle one chunk of the innermost open container.
    ///
    /// Returns the number of bytes needed from the current position when
    /// `avail` is too short. Nothing is committed in that case, so the step is
    /// simply retried with more input.
    fn step(&mut self, avail: &[u8]) -> Option<usize> {
        let frame = match self.frames.last().copied() {
            Some(frame) => frame,
            None => {
                self.complete();
                return None;
            }
        };

        if self.position >= frame.bound {
            self.leave();
            return None;
        }

        let level = self.frames.len();
        let room = frame.bound - self.position;

        let mut header = match ChunkHeader::parse(avail) {
            Ok((header, _)) if header.header_len() <= room => header,
            Err(ParseError::NeedMoreBytes(n)) if (avail.len() + n) as u64 <= room => {
                return Some(avail.len() + n);
            }
            _ => {
                tracing::warn!(
                    position = format_args!("{:#x}", self.position),
                    room,
                    level,
                    "no room for a chunk header, closing container"
                );
                self.position = frame.bound;
                self.leave();
                return None;
            }
        };

        if header.clamp_to(self.position + HEADER_LEN, self.file_size) {
            tracing::warn!(
                id = %header.id,
                level,
                size = header.declared_size,
                "chunk overruns end of stream, clamped"
            );
            if level <= 2 && !self.truncated {
                self.truncated = true;
                self.sink
                    .fill(StreamKind::General, keys::IS_TRUNCATED, "Yes".into());
            }
        }

        let element = Element::new(header, self.position, frame.bound);
        if element.clamped_by_parent {
            tracing::warn!(
                id = %header.id,
                level,
                bound = format_args!("{:#x}", frame.bound),
                "chunk overruns its container, clamped"
            );
        }

        let entry = schema::lookup(frame.container, header.id);
        let needed = self.required(entry, &element);
        if avail.len() < needed {
            return Some(needed);
        }

        self.sink.on_chunk(level, &element, entry.map(|e| e.name));
        tracing::debug!(
            start = format_args!("{:#x}", element.offset),
            end = format_args!("{:#x}", element.bound),
            bytes = element.bound - element.offset,
            id = %header.id,
            name = entry.map_or("Unknown", |e| e.name),
            "visiting chunk"
        );

        let start = (element.payload_start - self.position) as usize;
        let end = usize::try_from(element.bound - self.position).unwrap_or(usize::MAX);

        match entry.map(|e| e.kind) {
            Some(ChunkKind::Form(container)) | Some(ChunkKind::List(container)) => {
                return self.enter(container, &element, &avail[start..end.min(avail.len())]);
            }
            Some(ChunkKind::Atom(atom)) => {
                atoms::decode_atom(
                    atom,
                    &avail[start..end],
                    self.options.text_encoding,
                    &mut self.sink,
                );
            }
            Some(ChunkKind::OpaqueAtom(opaque)) => {
                atoms::fill_opaque(opaque, &element, &mut self.sink);
            }
            None => {
                tracing::trace!(id = %header.id, container = ?frame.container, "skipping unknown chunk");
            }
        }

        self.position = element.next;
        None
    }

    /// Bytes from the current position that must be present to handle `element`.
    fn required(&self, entry: Option<&Entry>, element: &Element) -> usize {
        let end = match entry.map(|e| e.kind) {
            Some(ChunkKind::Atom(_)) => element.bound,
            Some(ChunkKind::Form(c)) | Some(ChunkKind::List(c)) if c.subtype().is_some() => {
                (element.payload_start + 4).min(element.bound)
            }
            _ => return 0,
        };
        usize::try_from(end - self.position).unwrap_or(usize::MAX)
    }

    fn enter(&mut self, container: Container, element: &Element, payload: &[u8]) -> Option<usize> {
        let mut children_start = element.payload_start;

        if let Some(expected) = container.subtype() {
            match parse_fourcc(payload) {
                Ok((tag, n)) if tag == expected => children_start += n as u64,
                Ok((tag, _)) => {
                    tracing::warn!(
                        id = %element.header.id,
                        %tag,
                        "skipping list of unexpected type"
                    );
                    self.position = element.next;
                    return None;
                }
                Err(_) => {
                    tracing::warn!(id = %element.header.id, "list too short for its type");
                    self.position = element.next;
                    return None;
                }
            }
        }

        self.frames.push(Frame {
            container,
            bound: element.bound,
            next: element.next,
        });
        self.position = children_start;
        None
    }
}
