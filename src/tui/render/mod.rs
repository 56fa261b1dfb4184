pub mod detail_panel;
pub mod status_row;
pub mod timeline_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Draw one frame: header, lanes, detail panel, status row.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header | lanes | detail panel | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(detail_panel::HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    timeline_view::render_header(frame, app, chunks[0]);
    timeline_view::render_lanes(frame, app, chunks[1]);
    detail_panel::render_detail_panel(frame, app, chunks[2]);
    status_row::render_status_row(frame, app, chunks[3]);
}
