use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, EDIT_FIELDS, EditForm, Mode};
use crate::util::unicode::display_width;

const KEY_HINTS: &str =
    "e edit  h/l move  H/L length  [ ] { } window  t threads  s save  r reload  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    if let Mode::Edit(form) = &app.mode {
        render_edit_prompt(frame, app, form, area);
        return;
    }

    let mut spans = match app.status {
        Some(ref msg) => vec![Span::styled(
            msg.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )],
        None => vec![Span::styled(KEY_HINTS, Style::default().fg(app.theme.dim).bg(bg))],
    };

    if !app.dirty.is_empty() {
        let badge = format!("{} unsaved", app.dirty.len());
        let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let badge_width = badge.chars().count();
        if content_width + badge_width < width {
            let padding = width - content_width - badge_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(badge, Style::default().fg(app.theme.yellow).bg(bg)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One field of the edit form as `label (n/7): value`, plus any error.
fn render_edit_prompt(frame: &mut Frame, app: &App, form: &EditForm, area: Rect) {
    let bg = app.theme.background;
    let prompt = format!("{} ({}/{}): ", form.label(), form.field + 1, EDIT_FIELDS.len());
    let cursor_x = display_width(&prompt) + display_width(form.input());

    let mut spans = vec![
        Span::styled(prompt, Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            form.input().to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ];
    if let Some(ref msg) = app.status {
        spans.push(Span::styled(
            format!("  {}", msg),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if cursor_x < area.width as usize {
        frame.set_cursor_position((area.x + cursor_x as u16, area.y));
    }
}
