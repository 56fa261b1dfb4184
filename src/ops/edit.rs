use chrono::NaiveDate;

use crate::model::chapter::{ChapterRecord, DATE_FORMAT};
use crate::parse::parse_date;

/// Error type for edits coming from free-text fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("invalid {field} date '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
    #[error("start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// A set of field changes for one chapter, as typed by the user.
/// `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct ChapterEdit {
    pub name: Option<String>,
    pub plot: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub pov: Option<String>,
    pub characters: Option<String>,
    pub synopsis: Option<String>,
}

impl ChapterEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.plot.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.pov.is_none()
            && self.characters.is_none()
            && self.synopsis.is_none()
    }
}

/// Validate `edit` and apply it to `record`.
///
/// Dates must parse as `YYYY-MM-DD` and the resulting start must fall
/// strictly before the end. Nothing is changed when validation fails. An
/// empty plot falls back to `default_plot`.
pub fn apply_edit(
    record: &mut ChapterRecord,
    edit: &ChapterEdit,
    default_plot: &str,
) -> Result<(), EditError> {
    let start = match &edit.start {
        Some(s) => date_field("start", s)?,
        None => record.start_date,
    };
    let end = match &edit.end {
        Some(s) => date_field("end", s)?,
        None => record.end_date,
    };
    if start >= end {
        return Err(EditError::InvalidRange { start, end });
    }

    record.start_date = start;
    record.end_date = end;
    if let Some(name) = &edit.name {
        record.chapter_name = name.trim().to_string();
    }
    if let Some(plot) = &edit.plot {
        record.plot = normalize_plot(plot, default_plot);
    }
    if let Some(pov) = &edit.pov {
        record.point_of_view = pov.trim().to_string();
    }
    if let Some(characters) = &edit.characters {
        record.characters = characters.trim().to_string();
    }
    if let Some(synopsis) = &edit.synopsis {
        record.synopsis = synopsis.trim().to_string();
    }
    Ok(())
}

/// Shift a chapter by `days` (negative moves it earlier), keeping its length.
pub fn shift_dates(record: &mut ChapterRecord, days: i64) {
    let delta = chrono::Duration::days(days);
    if let (Some(start), Some(end)) = (
        record.start_date.checked_add_signed(delta),
        record.end_date.checked_add_signed(delta),
    ) {
        record.start_date = start;
        record.end_date = end;
    }
}

/// Move the end date by `days`, refusing to let it reach the start date.
pub fn resize_end(record: &mut ChapterRecord, days: i64) -> Result<(), EditError> {
    let end = record
        .end_date
        .checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(record.end_date);
    if end <= record.start_date {
        return Err(EditError::InvalidRange {
            start: record.start_date,
            end,
        });
    }
    record.end_date = end;
    Ok(())
}

/// Trim each comma-separated thread, dropping empty ones.
pub fn normalize_plot(plot: &str, default_plot: &str) -> String {
    let threads: Vec<&str> = plot
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if threads.is_empty() {
        default_plot.to_string()
    } else {
        threads.join(", ")
    }
}

fn date_field(field: &'static str, value: &str) -> Result<NaiveDate, EditError> {
    parse_date(value).ok_or_else(|| EditError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Format a date the way `@time:` markers and date fields expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
