use std::error::Error as _;

pub fn format_size(bytes: u64) -> String {
    use humansize::{file_size_opts as options, FileSize};
    bytes
        .file_size(options::BINARY)
        .unwrap_or_else(|_| format!("{} B", bytes))
}

/// The error and its causes on one line.
pub fn error_chain(error: &crate::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}
