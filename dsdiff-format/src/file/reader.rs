use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use super::decode_slice;
use crate::metadata::Metadata;
use crate::text::DecodeOptions;
use crate::DecodeError;

/// A decoded `.dff` file.
#[derive(Debug)]
pub struct DsdiffFile {
    path: PathBuf,
    len: u64,
    metadata: Metadata,
}

impl DsdiffFile {
    /// Memory map the file at `path` and decode its chunks.
    pub fn open<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<DsdiffFile, DecodeError> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len();

        let metadata = if len == 0 {
            decode_slice(&[], options)?
        } else {
            // The map is only read while the file stays open in this scope.
            let mmap = unsafe { Mmap::map(&file)? };
            decode_slice(&mmap, options)?
        };

        tracing::debug!(path = %path.as_ref().display(), len, "decoded file");

        Ok(DsdiffFile {
            path: path.as_ref().to_path_buf(),
            len,
            metadata,
        })
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline(always)]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }
}
