use std::path::Path;

use serde::Serialize;

use crate::model::chapter::ChapterRecord;
use crate::ops::edit::format_date;
use crate::util::unicode::{pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ThreadJson {
    pub plot: String,
    pub chapters: usize,
}

#[derive(Serialize)]
pub struct CheckJson {
    pub undated: Vec<String>,
    pub missing_anchor: Vec<String>,
    pub unreadable: Vec<String>,
}

#[derive(Serialize)]
pub struct SaveResultJson {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

const PLOT_COL: usize = 16;
const NAME_COL: usize = 28;

/// One line per record: `plot  start  end  name  (file)`.
pub fn format_record_line(record: &ChapterRecord) -> String {
    format!(
        "{}  {}  {}  {}  ({})",
        pad_to_width(&truncate_to_width(&record.plot, PLOT_COL), PLOT_COL),
        format_date(record.start_date),
        format_date(record.end_date),
        pad_to_width(&truncate_to_width(&record.chapter_name, NAME_COL), NAME_COL),
        file_label(&record.source_path),
    )
}

/// Multi-line detail view of a single record.
pub fn format_record_detail(record: &ChapterRecord) -> String {
    let mut lines = vec![
        format!("name:     {}", record.chapter_name),
        format!("file:     {}", record.source_path.display()),
        format!("plot:     {}", record.plot),
        format!(
            "dates:    {} .. {} ({} days)",
            format_date(record.start_date),
            format_date(record.end_date),
            record.duration_days()
        ),
    ];
    if !record.point_of_view.is_empty() {
        lines.push(format!("pov:      {}", record.point_of_view));
    }
    if !record.characters.is_empty() {
        lines.push(format!("char:     {}", record.characters));
    }
    if !record.synopsis.is_empty() {
        lines.push(format!("synopsis: {}", record.synopsis));
    }
    lines.join("\n")
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
