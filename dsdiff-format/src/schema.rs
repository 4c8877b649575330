//! Chunk dispatch table.
//!
//! Identifiers are only meaningful inside their container (`DSD ` is the form
//! type at the top level but the sound data chunk inside the form), so lookups
//! are keyed by the container being walked.

use crate::header::FourCc;

pub mod ids {
    use crate::header::FourCc;

    pub const DSD: FourCc = FourCc(*b"DSD ");
    pub const DST: FourCc = FourCc(*b"DST ");
    pub const COMT: FourCc = FourCc(*b"COMT");
    pub const DIIN: FourCc = FourCc(*b"DIIN");
    pub const DIAR: FourCc = FourCc(*b"DIAR");
    pub const DITI: FourCc = FourCc(*b"DITI");
    pub const EMID: FourCc = FourCc(*b"EMID");
    pub const MARK: FourCc = FourCc(*b"MARK");
    pub const FVER: FourCc = FourCc(*b"FVER");
    pub const PROP: FourCc = FourCc(*b"PROP");
    pub const ABSS: FourCc = FourCc(*b"ABSS");
    pub const CHNL: FourCc = FourCc(*b"CHNL");
    pub const CMPR: FourCc = FourCc(*b"CMPR");
    pub const FS: FourCc = FourCc(*b"FS  ");
    pub const LSCO: FourCc = FourCc(*b"LSCO");

    /// Property list sub-type for sound properties.
    pub const SND: FourCc = FourCc(*b"SND ");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The stream itself.
    Root,
    /// The `DSD ` form.
    Form,
    /// Edited master information.
    EditedMasterInfo,
    /// Sound properties.
    Properties,
}

impl Container {
    /// Tag that must open the payload for the children to be walked.
    pub fn subtype(self) -> Option<FourCc> {
        match self {
            Container::Properties => Some(ids::SND),
            _ => None,
        }
    }

    fn entries(self) -> &'static [Entry] {
        match self {
            Container::Root => ROOT,
            Container::Form => FORM,
            Container::EditedMasterInfo => EDITED_MASTER_INFO,
            Container::Properties => PROPERTIES,
        }
    }
}

/// Leaf chunks decoded field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atom {
    Comments,
    Artist,
    Title,
    Marker,
    FormatVersion,
    AbsoluteStartTime,
    Channels,
    CompressionType,
    SampleRate,
    LoudspeakerConfig,
}

/// Leaf chunks whose payload is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opaque {
    EditedMasterId,
    DsdSoundData,
    DstSoundData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Form(Container),
    List(Container),
    Atom(Atom),
    OpaqueAtom(Opaque),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub id: FourCc,
    pub name: &'static str,
    pub kind: ChunkKind,
}

const fn entry(id: FourCc, name: &'static str, kind: ChunkKind) -> Entry {
    Entry { id, name, kind }
}

const ROOT: &[Entry] = &[entry(ids::DSD, "Form DSD", ChunkKind::Form(Container::Form))];

const FORM: &[Entry] = &[
    entry(ids::COMT, "Comments", ChunkKind::Atom(Atom::Comments)),
    entry(
        ids::DIIN,
        "Edited Master Information",
        ChunkKind::List(Container::EditedMasterInfo),
    ),
    entry(
        ids::DSD,
        "DSD Sound Data",
        ChunkKind::OpaqueAtom(Opaque::DsdSoundData),
    ),
    entry(
        ids::DST,
        "DST Sound Data",
        ChunkKind::OpaqueAtom(Opaque::DstSoundData),
    ),
    entry(ids::FVER, "Format", ChunkKind::Atom(Atom::FormatVersion)),
    entry(ids::PROP, "Property", ChunkKind::List(Container::Properties)),
];

const EDITED_MASTER_INFO: &[Entry] = &[
    entry(ids::DIAR, "Artist", ChunkKind::Atom(Atom::Artist)),
    entry(ids::DITI, "Title", ChunkKind::Atom(Atom::Title)),
    entry(
        ids::EMID,
        "Edited Master ID",
        ChunkKind::OpaqueAtom(Opaque::EditedMasterId),
    ),
    entry(ids::MARK, "Marker", ChunkKind::Atom(Atom::Marker)),
];

const PROPERTIES: &[Entry] = &[
    entry(
        ids::ABSS,
        "Absolute Start Time",
        ChunkKind::Atom(Atom::AbsoluteStartTime),
    ),
    entry(ids::CHNL, "Channels", ChunkKind::Atom(Atom::Channels)),
    entry(
        ids::CMPR,
        "Compression Type",
        ChunkKind::Atom(Atom::CompressionType),
    ),
    entry(ids::FS, "Sample Rate", ChunkKind::Atom(Atom::SampleRate)),
    entry(
        ids::LSCO,
        "Loudspeaker Configuration",
        ChunkKind::Atom(Atom::LoudspeakerConfig),
    ),
];

/// Find how a chunk with identifier `id` is handled inside `container`.
pub fn lookup(container: Container, id: FourCc) -> Option<&'static Entry> {
    container.entries().iter().find(|e| e.id == id)
}
