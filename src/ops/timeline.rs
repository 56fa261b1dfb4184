use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::chapter::ChapterRecord;
use crate::ops::edit::format_date;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

/// Widest plot label shown in the text timeline before truncation.
const MAX_LABEL_WIDTH: usize = 24;

/// Widest bar area the text timeline renders; larger widths are clamped.
pub const MAX_BAR_WIDTH: usize = 1000;

/// Bar glyphs, alternated so neighbouring chapters in a lane stay distinct.
const GLYPHS: [char; 2] = ['#', '='];

/// Group records into lanes, keyed by plot, in order of first appearance.
///
/// With `split_threads`, a chapter whose plot is `"a, b"` appears in both
/// lane `a` and lane `b`; otherwise the full plot string is the lane key.
pub fn group_by_plot(
    records: &[ChapterRecord],
    split_threads: bool,
) -> IndexMap<String, Vec<&ChapterRecord>> {
    let mut lanes: IndexMap<String, Vec<&ChapterRecord>> = IndexMap::new();
    for record in records {
        if split_threads {
            for thread in record.plots() {
                lanes.entry(thread.to_string()).or_default().push(record);
            }
        } else {
            lanes.entry(record.plot.clone()).or_default().push(record);
        }
    }
    lanes
}

/// Keep chapters lying entirely inside the window: `start >= from` and `end <= to`.
pub fn filter_window(
    records: &[ChapterRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<ChapterRecord> {
    records
        .iter()
        .filter(|r| from.is_none_or(|f| r.start_date >= f))
        .filter(|r| to.is_none_or(|t| r.end_date <= t))
        .cloned()
        .collect()
}

/// Earliest start and latest end over all records.
pub fn date_span(records: &[ChapterRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let start = records.iter().map(|r| r.start_date).min()?;
    let end = records.iter().map(|r| r.end_date).max()?;
    Some((start, end))
}

/// Number of chapters per story thread, counting each comma-separated plot.
pub fn thread_counts(records: &[ChapterRecord]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        for thread in record.plots() {
            *counts.entry(thread.to_string()).or_default() += 1;
        }
    }
    counts.sort_keys();
    counts
}

/// Stack a lane's chapters into rows so no two chapters in a row overlap in
/// time. A chapter goes into the first row whose last chapter ends on or
/// before its start date.
pub fn stack_lane<'a>(chapters: &[&'a ChapterRecord]) -> Vec<Vec<&'a ChapterRecord>> {
    let mut sorted = chapters.to_vec();
    sorted.sort_by_key(|r| r.start_date);

    let mut rows: Vec<Vec<&'a ChapterRecord>> = Vec::new();
    for record in sorted {
        let free = rows
            .iter_mut()
            .find(|row| row.last().is_some_and(|last| last.end_date <= record.start_date));
        match free {
            Some(row) => row.push(record),
            None => rows.push(vec![record]),
        }
    }
    rows
}

/// Cell range `[from, to)` covered by `record` on a bar of `width` cells
/// spanning `span`. Every chapter gets at least one cell.
pub fn bar_cells(record: &ChapterRecord, span: (NaiveDate, NaiveDate), width: usize) -> (usize, usize) {
    if width == 0 {
        return (0, 0);
    }
    let total = (span.1 - span.0).num_days().max(1);
    let offset = |date: NaiveDate| -> i64 { (date - span.0).num_days().clamp(0, total) };
    let w = width as i64;

    let from = (offset(record.start_date) * w / total).min(w - 1);
    let to = ((offset(record.end_date) * w + total - 1) / total).clamp(from + 1, w);
    (from as usize, to as usize)
}

/// Render records as a text Gantt chart: a header with the date span, then
/// one line per lane with a bar area `width` cells wide.
pub fn render_timeline(records: &[ChapterRecord], width: usize, split_threads: bool) -> String {
    let Some(span) = date_span(records) else {
        return "no dated chapters".to_string();
    };
    let lanes = group_by_plot(records, split_threads);
    let width = width.min(MAX_BAR_WIDTH);

    let label_width = lanes
        .keys()
        .map(|k| display_width(k))
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    let mut out = vec![format!(
        "{} .. {} ({} days)",
        format_date(span.0),
        format_date(span.1),
        (span.1 - span.0).num_days()
    )];

    for (plot, chapters) in &lanes {
        let label = pad_to_width(&truncate_to_width(plot, label_width), label_width);
        for (row_idx, row) in stack_lane(chapters).iter().enumerate() {
            let mut cells = vec![' '; width];
            for (i, record) in row.iter().enumerate() {
                let (from, to) = bar_cells(record, span, width);
                for cell in &mut cells[from..to] {
                    *cell = GLYPHS[i % GLYPHS.len()];
                }
            }
            // overlapping chapters continue on unlabelled rows
            let label = if row_idx == 0 {
                label.clone()
            } else {
                " ".repeat(label_width)
            };
            out.push(format!("{} |{}|", label, cells.into_iter().collect::<String>()));
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn rec(name: &str, plot: &str, start: NaiveDate, end: NaiveDate) -> ChapterRecord {
        ChapterRecord {
            chapter_name: name.into(),
            source_path: PathBuf::from(format!("{}.nwd", name)),
            plot: plot.into(),
            point_of_view: String::new(),
            characters: String::new(),
            synopsis: String::new(),
            start_date: start,
            end_date: end,
        }
    }

    fn sample() -> Vec<ChapterRecord> {
        vec![
            rec("one", "a", date(3, 1), date(3, 3)),
            rec("two", "a", date(3, 3), date(3, 5)),
            rec("three", "b", date(3, 1), date(3, 5)),
            rec("four", "a, b", date(3, 2), date(3, 3)),
        ]
    }

    #[test]
    fn test_group_by_plot_keeps_first_seen_order() {
        let records = sample();
        let lanes = group_by_plot(&records, false);
        let keys: Vec<&str> = lanes.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "a, b"]);
        assert_eq!(lanes["a"].len(), 2);
    }

    #[test]
    fn test_group_by_plot_split_threads() {
        let records = sample();
        let lanes = group_by_plot(&records, true);
        let keys: Vec<&str> = lanes.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(lanes["a"].len(), 3);
        assert_eq!(lanes["b"].len(), 2);
    }

    #[test]
    fn test_filter_window() {
        let records = sample();
        let names = |rs: Vec<ChapterRecord>| -> Vec<String> {
            rs.into_iter().map(|r| r.chapter_name).collect()
        };
        assert_eq!(
            names(filter_window(&records, Some(date(3, 2)), None)),
            vec!["two", "four"]
        );
        assert_eq!(
            names(filter_window(&records, None, Some(date(3, 3)))),
            vec!["one", "four"]
        );
        assert_eq!(filter_window(&records, None, None).len(), 4);
    }

    #[test]
    fn test_date_span_and_counts() {
        let records = sample();
        assert_eq!(date_span(&records), Some((date(3, 1), date(3, 5))));
        assert_eq!(date_span(&[]), None);

        let counts = thread_counts(&records);
        assert_eq!(counts.get("a"), Some(&3));
        assert_eq!(counts.get("b"), Some(&2));
    }

    #[test]
    fn test_bar_cells() {
        let span = (date(3, 1), date(3, 11));
        let r = rec("x", "a", date(3, 1), date(3, 6));
        assert_eq!(bar_cells(&r, span, 20), (0, 10));
        let r = rec("x", "a", date(3, 10), date(3, 11));
        assert_eq!(bar_cells(&r, span, 20), (18, 20));
        // narrower than a day still gets one cell
        assert_eq!(bar_cells(&r, span, 5), (4, 5));
    }

    #[test]
    fn test_render_timeline() {
        let records = sample()[..3].to_vec();
        let out = render_timeline(&records, 4, false);
        let expected = "\
2024-03-01 .. 2024-03-05 (4 days)
a |##==|
b |####|";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_stack_lane_moves_overlaps_to_new_row() {
        let long = rec("long", "a", date(3, 1), date(3, 20));
        let short = rec("short", "a", date(3, 5), date(3, 8));
        let after = rec("after", "a", date(3, 20), date(3, 22));
        let rows = stack_lane(&[&after, &long, &short]);
        let names: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.iter().map(|r| r.chapter_name.as_str()).collect())
            .collect();
        assert_eq!(names, vec![vec!["long", "after"], vec!["short"]]);
    }

    #[test]
    fn test_render_timeline_overlap_gets_own_row() {
        let records = vec![
            rec("long", "a", date(3, 1), date(3, 20)),
            rec("short", "a", date(3, 5), date(3, 8)),
        ];
        let out = render_timeline(&records, 19, false);
        let expected = "\
2024-03-01 .. 2024-03-20 (19 days)
a |###################|
  |    ###            |";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_timeline_clamps_width() {
        let records = sample()[..1].to_vec();
        let out = render_timeline(&records, usize::MAX, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1].len(), MAX_BAR_WIDTH + "a ||".len());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_timeline(&[], 10, false), "no dated chapters");
    }
}
