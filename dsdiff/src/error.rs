use std::path::PathBuf;

use dsdiff_format::DecodeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read `{}`", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Cannot walk directory `{}`", .path.display())]
    WalkDir {
        path: PathBuf,
        #[source]
        source: jwalk::Error,
    },

    #[error("Cannot write JSON report")]
    WriteJson(#[from] serde_json::Error),

    #[error("No .dff files found")]
    NoFiles,

    #[error("{failed} of {total} files could not be read")]
    SomeFailed { failed: usize, total: usize },
}
