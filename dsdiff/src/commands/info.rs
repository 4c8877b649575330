use std::path::{Path, PathBuf};

use dsdiff_format::metadata::keys;
use dsdiff_format::{DecodeOptions, DsdiffFile, StreamKind};
use jwalk::WalkDir;
use rayon::prelude::*;

use crate::cli::InfoArgs;
use crate::error::{Error, Result};
use crate::util::{error_chain, format_size};

const STREAMS: [StreamKind; 2] = [StreamKind::General, StreamKind::Audio];

fn is_dff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("dff"))
}

fn collect_files(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths.iter() {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path).sort(true).skip_hidden(false);
        let walker = if recursive { walker } else { walker.max_depth(1) };

        for entry in walker {
            let entry = entry.map_err(|source| Error::WalkDir {
                path: path.clone(),
                source,
            })?;
            let entry_path = entry.path();
            if entry.file_type().is_file() && is_dff(&entry_path) {
                files.push(entry_path);
            }
        }
    }

    Ok(files)
}

fn render(key: &str, value: &str) -> String {
    match (key, value.parse::<u64>()) {
        (keys::STREAM_SIZE, Ok(bytes)) => format!("{} ({} bytes)", format_size(bytes), bytes),
        (keys::DURATION, _) => format!("{} s", value),
        _ => value.to_string(),
    }
}

fn print_report(file: &DsdiffFile) {
    println!("{} ({})", file.path().display(), format_size(file.len()));

    let meta = file.metadata();
    for &kind in STREAMS.iter() {
        let fields = meta.stream(kind);
        if fields.is_empty() {
            continue;
        }

        println!("  {:?}", kind);
        for (key, values) in fields.iter() {
            for value in values.iter() {
                println!("    {:<24}: {}", key, render(key, value));
            }
        }
    }
    println!();
}

fn print_json(files: &[PathBuf], results: &[Result<DsdiffFile>]) -> Result<()> {
    let report = files
        .iter()
        .zip(results.iter())
        .map(|(path, result)| match result {
            Ok(file) => serde_json::json!({
                "path": path,
                "size": file.len(),
                "general": file.metadata().general(),
                "audio": file.metadata().audio(),
            }),
            Err(e) => serde_json::json!({
                "path": path,
                "error": error_chain(e),
            }),
        })
        .collect::<Vec<_>>();

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report)?;
    println!();
    Ok(())
}

pub fn run(args: InfoArgs) -> Result<()> {
    let options = DecodeOptions::with_text_encoding(args.encoding);
    let files = collect_files(&args.paths, args.recursive)?;

    if files.is_empty() {
        return Err(Error::NoFiles);
    }

    tracing::debug!(count = files.len(), encoding = %args.encoding, "decoding files");

    let results = files
        .par_iter()
        .map(|path| {
            DsdiffFile::open(path, options).map_err(|source| Error::OpenFile {
                path: path.clone(),
                source,
            })
        })
        .collect::<Vec<_>>();

    if args.json {
        print_json(&files, &results)?;
    } else {
        for result in results.iter() {
            match result {
                Ok(file) => print_report(file),
                Err(e) => eprintln!("{}", error_chain(e)),
            }
        }
    }

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        return Err(Error::SomeFailed {
            failed,
            total: results.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_extension_case_insensitively() {
        assert!(is_dff(Path::new("a/b/track.dff")));
        assert!(is_dff(Path::new("TRACK.DFF")));
        assert!(!is_dff(Path::new("track.dsf")));
        assert!(!is_dff(Path::new("dff")));
    }

    #[test]
    fn renders_sizes_and_durations() {
        assert_eq!(render(keys::STREAM_SIZE, "2048"), "2 KiB (2048 bytes)");
        assert_eq!(render(keys::DURATION, "1.500"), "1.500 s");
        assert_eq!(render(keys::TITLE, "2048"), "2048");
    }
}
