use std::fs;
use std::path::{Path, PathBuf};

use crate::io::chapter_io::{self, ChapterError};
use crate::model::chapter::ChapterRecord;
use crate::model::config::TimelineConfig;
use crate::parse::RewriteOutcome;

/// Error type for directory-level operations
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("could not list {path}: {source}")]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Chapter(#[from] ChapterError),
}

/// Per-record result of a batch write-back.
#[derive(Debug)]
pub struct SaveReport {
    pub results: Vec<(PathBuf, Result<RewriteOutcome, ChapterError>)>,
}

impl SaveReport {
    pub fn written(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ChapterError)> {
        self.results
            .iter()
            .filter_map(|(p, r)| r.as_ref().err().map(|e| (p.as_path(), e)))
    }

    /// Records written to a file without an anchor line (front-matter dropped).
    pub fn missing_anchor(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().filter_map(|(p, r)| match r {
            Ok(outcome) if !outcome.anchor_found => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }
}

/// List chapter files (by extension) directly inside `dir`, sorted by path.
pub fn list_chapter_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError::ListError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ListError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Scan `dir` and return the records of every dated chapter, sorted by
/// `(plot, start_date, end_date)`. Files without a valid `@time:` marker are
/// left out silently; files that cannot be read as UTF-8 text are left out
/// with a warning. Nothing is cached: every call rereads the directory.
pub fn scan_directory(dir: &Path, config: &TimelineConfig) -> Result<Vec<ChapterRecord>, ScanError> {
    let mut records = Vec::new();
    for path in list_chapter_files(dir, &config.scan.extension)? {
        match chapter_io::read_chapter(&path, &config.timeline.default_plot) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => tracing::debug!(path = %path.display(), "no valid @time: marker, skipped"),
            Err(e) => tracing::warn!(error = %e, "unreadable chapter file, skipped"),
        }
    }
    sort_records(&mut records);
    Ok(records)
}

/// Sort by plot, then start date, then end date. Path breaks remaining ties.
pub fn sort_records(records: &mut [ChapterRecord]) {
    records.sort_by(|a, b| {
        (&a.plot, a.start_date, a.end_date, &a.source_path).cmp(&(
            &b.plot,
            b.start_date,
            b.end_date,
            &b.source_path,
        ))
    });
}

/// Write every record back to its chapter file.
///
/// The directory is listed again first; a record whose `source_path` is not
/// one of its chapter files gets an `UnknownPath` error. Failures are
/// collected per record and never stop the remaining writes.
pub fn save_records(
    dir: &Path,
    config: &TimelineConfig,
    records: &[ChapterRecord],
) -> Result<SaveReport, ScanError> {
    let known: Vec<PathBuf> = list_chapter_files(dir, &config.scan.extension)?
        .iter()
        .map(|p| normalize(p))
        .collect();

    let mut results = Vec::with_capacity(records.len());
    for record in records {
        let path = record.source_path.clone();
        let result = if known.contains(&normalize(&path)) {
            chapter_io::write_chapter(&path, record)
        } else {
            Err(ChapterError::UnknownPath(path.clone()))
        };
        if let Err(ref e) = result {
            tracing::warn!(path = %path.display(), error = %e, "chapter not saved");
        }
        results.push((path, result));
    }
    Ok(SaveReport { results })
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chapter(name: &str, plot: &str, times: &[&str]) -> String {
        let mut s = format!("%%~name: {}\n%%~date: x\n@plot: {}\n", name, plot);
        for t in times {
            s.push_str(&format!("@time: {}\n", t));
        }
        s.push_str(&format!("# {}\n\nBody.\n", name));
        s
    }

    fn write_fixture(dir: &Path) {
        fs::write(dir.join("one.nwd"), chapter("One", "b", &["2024-01-05"])).unwrap();
        fs::write(dir.join("two.nwd"), chapter("Two", "a", &["2024-02-01", "2024-02-03"])).unwrap();
        fs::write(dir.join("three.nwd"), chapter("Three", "a", &["2024-01-10"])).unwrap();
        fs::write(dir.join("undated.nwd"), "%%~name: Undated\n@plot: a\n").unwrap();
        fs::write(dir.join("notes.txt"), chapter("Notes", "a", &["2023-01-01"])).unwrap();
        fs::create_dir(dir.join("sub.nwd")).unwrap();
    }

    #[test]
    fn test_list_chapter_files_filters_extension() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        let files = list_chapter_files(tmp.path(), "nwd").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["one.nwd", "three.nwd", "two.nwd", "undated.nwd"]);
    }

    #[test]
    fn test_scan_sorts_and_drops_undated() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        let records = scan_directory(tmp.path(), &TimelineConfig::default()).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.chapter_name.as_str()).collect();
        assert_eq!(names, vec!["Three", "Two", "One"]);
        assert_eq!(records[0].start_date, date(2024, 1, 10));
        assert_eq!(records[2].plot, "b");
    }

    #[test]
    fn test_scan_custom_extension() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        let mut config = TimelineConfig::default();
        config.scan.extension = "txt".into();
        let records = scan_directory(tmp.path(), &config).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chapter_name, "Notes");
    }

    #[test]
    fn test_scan_skips_unreadable_file() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        fs::write(tmp.path().join("binary.nwd"), [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let records = scan_directory(tmp.path(), &TimelineConfig::default()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.chapter_name.as_str()).collect();
        assert_eq!(names, vec!["Three", "Two", "One"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = scan_directory(&tmp.path().join("gone"), &TimelineConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::ListError { .. }));
    }

    #[test]
    fn test_save_records_continues_past_unknown_path() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        let config = TimelineConfig::default();
        let mut records = scan_directory(tmp.path(), &config).unwrap();

        let mut stray = records[0].clone();
        stray.source_path = tmp.path().join("deleted.nwd");
        records.insert(0, stray);
        records[1].plot = "c".into();
        records[3].synopsis = "Edited.".into();

        let report = save_records(tmp.path(), &config, &records).unwrap();
        assert_eq!(report.results.len(), 4);
        assert_eq!(report.written(), 3);
        assert!(!report.is_ok());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].1, ChapterError::UnknownPath(_)));
        assert_eq!(report.missing_anchor().count(), 0);

        let rescanned = scan_directory(tmp.path(), &config).unwrap();
        let plots: Vec<&str> = rescanned.iter().map(|r| r.plot.as_str()).collect();
        assert_eq!(plots, vec!["a", "b", "c"]);
        assert!(rescanned.iter().any(|r| r.synopsis == "Edited."));
    }

    #[test]
    fn test_save_reports_missing_anchor() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bare.nwd");
        fs::write(&path, "@time: 2024-01-01\n# Bare\ntext\n").unwrap();
        let config = TimelineConfig::default();
        let records = scan_directory(tmp.path(), &config).unwrap();

        let report = save_records(tmp.path(), &config, &records).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.missing_anchor().count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# \ntext\n");
        assert!(scan_directory(tmp.path(), &config).unwrap().is_empty());
    }
}
