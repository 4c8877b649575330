use std::fs::File;
use std::io::BufReader;

use dsdiff_format::{
    decode_reader_into, DecodeError, DecodeOptions, Element, FourCc, Metadata, MetadataSink,
    StreamKind,
};

use crate::cli::TreeArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

struct Row {
    level: usize,
    id: FourCc,
    offset: u64,
    size: u64,
    name: Option<&'static str>,
}

/// Keeps the decoded metadata and records every chunk visited.
#[derive(Default)]
struct ChunkTree {
    metadata: Metadata,
    rows: Vec<Row>,
}

impl MetadataSink for ChunkTree {
    fn fill(&mut self, stream: StreamKind, key: &str, value: String) {
        self.metadata.fill(stream, key, value);
    }

    fn append(&mut self, stream: StreamKind, key: &str, value: String) {
        self.metadata.append(stream, key, value);
    }

    fn retrieve(&self, stream: StreamKind, key: &str) -> Option<&str> {
        self.metadata.retrieve(stream, key)
    }

    fn on_chunk(&mut self, level: usize, element: &Element, name: Option<&'static str>) {
        self.rows.push(Row {
            level,
            id: element.header.id,
            offset: element.offset,
            size: element.header.declared_size,
            name,
        });
    }
}

pub fn run(args: TreeArgs) -> Result<()> {
    let open_error = |source: DecodeError| Error::OpenFile {
        path: args.path.clone(),
        source,
    };

    let file = File::open(&args.path).map_err(|e| open_error(e.into()))?;
    let tree = decode_reader_into(
        BufReader::new(file),
        DecodeOptions::default(),
        ChunkTree::default(),
    )
    .map_err(open_error)?;

    println!("Offset        Size          Chunk");
    println!("------------  ------------  --------");
    for row in tree.rows.iter() {
        println!(
            "{:>12}  {:>12}  {}{} {}",
            format!("{:#x}", row.offset),
            format_size(row.size),
            "  ".repeat(row.level.saturating_sub(1)),
            row.id,
            row.name.unwrap_or("(unknown)"),
        );
    }

    if tree.metadata.is_truncated() {
        println!("\nFile is truncated.");
    }

    Ok(())
}
