use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::chapter::ChapterRecord;
use crate::parse::{RewriteOutcome, parse_chapter, rewrite_chapter};

/// Error type for chapter file I/O
#[derive(Debug, thiserror::Error)]
pub enum ChapterError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("not a chapter file in the scanned directory: {0}")]
    UnknownPath(PathBuf),
    #[error("{0} has no valid @time: marker")]
    NoDates(PathBuf),
}

/// Read and extract one chapter file. `Ok(None)` means the file holds no
/// valid `@time:` date and has no place on the timeline.
pub fn read_chapter(path: &Path, default_plot: &str) -> Result<Option<ChapterRecord>, ChapterError> {
    let source = read_source(path)?;
    Ok(parse_chapter(&source, path, default_plot))
}

/// Rewrite the front-matter of the chapter file at `path` from `record`.
///
/// The whole file is read, the new text computed in memory, then swapped in
/// atomically. If the file has no `%%~date:` anchor line the front-matter
/// is dropped without replacement; this is reported through the outcome,
/// not as an error.
pub fn write_chapter(path: &Path, record: &ChapterRecord) -> Result<RewriteOutcome, ChapterError> {
    let source = read_source(path)?;
    let (content, outcome) = rewrite_chapter(&source, record);
    if !outcome.anchor_found {
        tracing::warn!(path = %path.display(), "no %%~date: anchor line, front-matter dropped");
    }
    atomic_write(path, content.as_bytes()).map_err(|e| ChapterError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "chapter written");
    Ok(outcome)
}

/// Whether the chapter text at `path` contains an anchor line.
pub fn has_anchor(path: &Path) -> Result<bool, ChapterError> {
    let source = read_source(path)?;
    Ok(source.lines().any(crate::parse::marker::is_anchor))
}

/// Write `content` to `path` atomically using a temp file + rename.
/// An existing file keeps its permissions.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn read_source(path: &Path) -> Result<String, ChapterError> {
    fs::read_to_string(path).map_err(|e| ChapterError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
