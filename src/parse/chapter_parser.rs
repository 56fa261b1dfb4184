use std::path::Path;

use chrono::{Days, NaiveDate};

use crate::model::chapter::{ChapterRecord, DATE_FORMAT};
use crate::parse::marker::{self, Marker};

/// Parse a `YYYY-MM-DD` marker value (surrounding whitespace allowed).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Extract a chapter record from the source text of a chapter file.
///
/// Returns `None` when no `@time:` line holds a valid date: without a date
/// range the chapter cannot be placed on the timeline, so its other markers
/// are discarded too. Unparseable `@time:` values are skipped line by line.
///
/// With a single date the chapter spans one day (`end = start + 1`); with
/// several, the earliest and latest win regardless of their order in the file.
pub fn parse_chapter(source: &str, source_path: &Path, default_plot: &str) -> Option<ChapterRecord> {
    let mut chapter_name = String::new();
    let mut plot = default_plot.to_string();
    let mut point_of_view = String::new();
    let mut characters = String::new();
    let mut synopsis = String::new();
    let mut times: Vec<NaiveDate> = Vec::new();

    for line in source.lines() {
        let Some(m) = marker::classify(line) else {
            continue;
        };
        match m {
            Marker::Name(v) => chapter_name = v.trim().to_string(),
            Marker::Plot(v) => {
                let v = v.trim();
                if !v.is_empty() {
                    plot = v.to_string();
                }
            }
            Marker::Pov(v) => point_of_view = v.trim().to_string(),
            Marker::Char(v) => characters = v.trim().to_string(),
            Marker::Synopsis(v) => synopsis = v.trim().to_string(),
            Marker::Time(v) => match parse_date(v) {
                Some(date) => times.push(date),
                None => tracing::trace!(path = %source_path.display(), value = v.trim(), "skipping unparseable @time"),
            },
        }
    }

    let (start_date, end_date) = date_range(&times)?;

    Some(ChapterRecord {
        chapter_name,
        source_path: source_path.to_path_buf(),
        plot,
        point_of_view,
        characters,
        synopsis,
        start_date,
        end_date,
    })
}

/// Reconcile collected `@time:` values into a `(start, end)` range.
fn date_range(times: &[NaiveDate]) -> Option<(NaiveDate, NaiveDate)> {
    let start = *times.iter().min()?;
    let end = if times.len() == 1 {
        start.checked_add_days(Days::new(1)).unwrap_or(start)
    } else {
        *times.iter().max()?
    };
    Some((start, end))
}
