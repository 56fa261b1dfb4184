use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::cli::output::file_label;
use crate::ops::edit::format_date;
use crate::tui::app::App;

/// Rows taken by the panel, border included.
pub const HEIGHT: u16 = 5;

/// Render the selected chapter's metadata below the lanes.
pub fn render_detail_panel(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let Some(record) = app.selected() else {
        let msg = Paragraph::new(Span::styled("no chapter selected", label)).block(block);
        frame.render_widget(msg, area);
        return;
    };

    let mut title = vec![Span::styled(
        record.chapter_name.clone(),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    title.push(Span::styled(format!("  {}", file_label(&record.source_path)), label));
    if app.dirty.contains(&record.source_path) {
        title.push(Span::styled("  (edited)", Style::default().fg(app.theme.yellow).bg(bg)));
    }

    let lines = vec![
        Line::from(title),
        Line::from(vec![
            Span::styled("plot ", label),
            Span::styled(record.plot.clone(), value),
            Span::styled("  dates ", label),
            Span::styled(
                format!(
                    "{} .. {} ({}d)",
                    format_date(record.start_date),
                    format_date(record.end_date),
                    record.duration_days()
                ),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("pov ", label),
            Span::styled(record.point_of_view.clone(), value),
            Span::styled("  char ", label),
            Span::styled(record.characters.clone(), value),
        ]),
        Line::from(Span::styled(record.synopsis.clone(), value)),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
