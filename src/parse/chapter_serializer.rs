use crate::model::chapter::{ChapterRecord, DATE_FORMAT};
use crate::parse::marker;

/// What a rewrite did besides regenerating the front-matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// A `%%~date:` line was found and the metadata block inserted after it.
    /// When false the file lost its front-matter lines and gained nothing.
    pub anchor_found: bool,
    /// The first heading was replaced with the chapter name.
    pub heading_renamed: bool,
}

/// Regenerate a chapter's front-matter from `record`.
///
/// Every `@plot:`, `@pov:`, `@char:`, `@time:` and `% Synopsis:` line is
/// dropped, and one block of those markers is inserted right after the
/// first `%%~date:` line. The first `# `/`## `/`### ` heading is renamed to
/// the chapter name. All other lines come through verbatim, including the
/// line ending style and whether the file ends with a newline.
///
/// Without an anchor line nothing is inserted: the metadata is lost.
pub fn rewrite_chapter(source: &str, record: &ChapterRecord) -> (String, RewriteOutcome) {
    let eol = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let mut outcome = RewriteOutcome {
        anchor_found: false,
        heading_renamed: false,
    };
    let mut out: Vec<String> = Vec::new();

    for line in source.lines() {
        if marker::is_front_matter(line) {
            continue;
        }

        if !outcome.heading_renamed
            && let Some(prefix) = marker::heading_prefix(line)
        {
            out.push(format!("{}{}", prefix, single_line(&record.chapter_name)));
            outcome.heading_renamed = true;
            continue;
        }

        out.push(line.to_string());

        if !outcome.anchor_found && marker::is_anchor(line) {
            out.extend(metadata_block(record));
            outcome.anchor_found = true;
        }
    }

    let mut content = out.join(eol);
    if source.ends_with('\n') {
        content.push_str(eol);
    }
    (content, outcome)
}

/// The six regenerated marker lines, in write order.
pub fn metadata_block(record: &ChapterRecord) -> Vec<String> {
    vec![
        format!("{} {}", marker::PLOT, single_line(&record.plot)),
        format!("{} {}", marker::TIME, record.start_date.format(DATE_FORMAT)),
        format!("{} {}", marker::TIME, record.end_date.format(DATE_FORMAT)),
        format!("{} {}", marker::POV, single_line(&record.point_of_view)),
        format!("{} {}", marker::CHAR, single_line(&record.characters)),
        format!("{} {}", marker::SYNOPSIS, single_line(&record.synopsis)),
    ]
}

/// Collapse line breaks so a value can't spill into the body as extra lines.
fn single_line(value: &str) -> String {
    value.lines().map(str::trim).collect::<Vec<_>>().join(" ").trim().to_string()
}
