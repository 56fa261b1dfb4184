use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::chapter::ChapterRecord;
use crate::model::config::TimelineConfig;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

pub fn chapter(dir: &Path, name: &str, plot: &str, start: NaiveDate, end: NaiveDate) -> ChapterRecord {
    ChapterRecord {
        chapter_name: name.into(),
        source_path: dir.join(format!("{}.nwd", name.to_lowercase())),
        plot: plot.into(),
        point_of_view: String::new(),
        characters: String::new(),
        synopsis: String::new(),
        start_date: start,
        end_date: end,
    }
}

/// An app over three chapters in two plots; nothing on disk.
pub fn sample_app() -> App {
    let dir = PathBuf::from("/tmp/plotline-test");
    let mut harbour = chapter(&dir, "Harbour", "heist", date(3, 1), date(3, 11));
    harbour.point_of_view = "Anna".into();
    harbour.synopsis = "They meet at the docks.".into();
    let records = vec![
        harbour,
        chapter(&dir, "Vault", "heist", date(3, 11), date(3, 21)),
        chapter(&dir, "Letters", "romance", date(3, 1), date(3, 21)),
    ];
    App::with_records(dir, TimelineConfig::default(), records)
}

pub fn empty_app() -> App {
    App::with_records(
        PathBuf::from("/tmp/plotline-test"),
        TimelineConfig::default(),
        Vec::new(),
    )
}
