use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::file_label;
use crate::ops::edit::format_date;
use crate::ops::timeline;
use crate::tui::app::App;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

const MAX_LABEL_WIDTH: usize = 20;

/// Render the one-line header: directory, chapter count, span and window.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        format!(" {} ", file_label(&app.dir)),
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    let visible = app.visible_records();
    let mut info = format!("{} chapters", visible.len());
    if let Some((start, end)) = timeline::date_span(&visible) {
        info.push_str(&format!("  {} .. {}", format_date(start), format_date(end)));
    }
    if app.window != (None, None) {
        let from = app.window.0.map(format_date).unwrap_or_else(|| "…".into());
        let to = app.window.1.map(format_date).unwrap_or_else(|| "…".into());
        info.push_str(&format!("  window {} .. {}", from, to));
    }
    if app.split_threads {
        info.push_str("  [threads]");
    }
    spans.push(Span::styled(info, Style::default().fg(app.theme.dim).bg(bg)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render each plot lane with a bar per chapter. Chapters that overlap in
/// time are stacked onto extra rows under the lane label.
pub fn render_lanes(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let records = app.visible_records();
    let Some(span) = timeline::date_span(&records) else {
        let msg = Paragraph::new(Span::styled(
            " no dated chapters",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(msg, area);
        return;
    };

    let lanes = timeline::group_by_plot(&records, app.split_threads);
    let width = area.width as usize;
    let label_width = lanes
        .keys()
        .map(|k| display_width(k))
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH)
        .min(width / 3);
    let bar_width = width.saturating_sub(label_width + 1);
    let selected = app.selected().map(|r| r.source_path.clone());

    let label_style = Style::default().fg(app.theme.text).bg(bg);
    let mut lines = Vec::new();
    for (plot, chapters) in &lanes {
        for (row_idx, row) in timeline::stack_lane(chapters).iter().enumerate() {
            let label = if row_idx == 0 {
                pad_to_width(&truncate_to_width(plot, label_width), label_width)
            } else {
                " ".repeat(label_width)
            };
            let mut spans = vec![Span::styled(format!("{} ", label), label_style)];

            let mut col = 0;
            for (i, record) in row.iter().enumerate() {
                let (from, to) = timeline::bar_cells(record, span, bar_width);
                // Chapters sharing a boundary day can round onto the same cell
                let from = from.max(col);
                let to = to.max(from + 1).min(bar_width);
                if from >= to {
                    continue;
                }
                if from > col {
                    spans.push(Span::styled(" ".repeat(from - col), Style::default().bg(bg)));
                }
                let is_selected = selected.as_ref() == Some(&record.source_path);
                let fill = if is_selected {
                    app.theme.selection_bg
                } else {
                    app.theme.bars[i % app.theme.bars.len()]
                };
                let cells = to - from;
                spans.push(Span::styled(
                    pad_to_width(&truncate_to_width(&record.chapter_name, cells), cells),
                    Style::default()
                        .fg(app.theme.background)
                        .bg(fill)
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ));
                col = to;
            }
            lines.push(Line::from(spans));
        }
    }
    lines.truncate(area.height as usize);

    frame.render_widget(Paragraph::new(lines), area);
}
