//! Plain-text content files, handled as sequences of lines.

use crate::error::StorageError;
use std::path::Path;

#[cfg(windows)]
pub const PLATFORM_EOL: &str = "\r\n";
#[cfg(not(windows))]
pub const PLATFORM_EOL: &str = "\n";

/// Split text into lines, accepting `\n`, `\r\n` and a bare `\r`.
///
/// A terminating line break ends the last line rather than starting a new
/// empty one, so `"a\nb\n"` is two lines. Empty input is zero lines.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(i) => {
                lines.push(rest[..i].to_string());
                let eol = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + eol..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}

/// Join lines with `eol` after every line.
pub fn join_lines<S: AsRef<str>>(lines: &[S], eol: &str) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + eol.len()).sum());
    for line in lines {
        out.push_str(line.as_ref());
        out.push_str(eol);
    }
    out
}

/// Read a file as lines.
///
/// Text is UTF-8 unless a byte-order mark says otherwise; the mark itself is
/// dropped. Invalid sequences are replaced rather than rejected.
pub fn read_lines(path: &Path) -> Result<Vec<String>, StorageError> {
    let bytes = std::fs::read(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "file has invalid byte sequences, replaced them"
        );
    }
    let lines = split_lines(&text);
    tracing::info!(path = %path.display(), lines = lines.len(), "read content file");
    Ok(lines)
}

/// Write lines using the platform line ending, replacing the file.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), StorageError> {
    std::fs::write(path, join_lines(lines, PLATFORM_EOL)).map_err(|source| {
        StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!(path = %path.display(), lines = lines.len(), "wrote content file");
    Ok(())
}
