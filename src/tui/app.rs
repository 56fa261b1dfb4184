use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::directory_io;
use crate::model::chapter::ChapterRecord;
use crate::model::config::TimelineConfig;
use crate::ops::edit::{self, ChapterEdit};
use crate::ops::timeline;

use super::input;
use super::render;
use super::theme::Theme;

/// Current input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Editing the fields of one chapter
    Edit(EditForm),
}

/// Labels of the edit form fields, in prompt order.
pub const EDIT_FIELDS: [&str; 7] = ["name", "plot", "start", "end", "pov", "char", "synopsis"];

/// Text buffers for the chapter edit form, prefilled from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    /// Index into `App::records`
    pub record: usize,
    /// Index into `EDIT_FIELDS` of the field being typed
    pub field: usize,
    pub values: [String; 7],
}

impl EditForm {
    pub fn new(record: usize, chapter: &ChapterRecord) -> Self {
        EditForm {
            record,
            field: 0,
            values: field_values(chapter),
        }
    }

    pub fn label(&self) -> &'static str {
        EDIT_FIELDS[self.field]
    }

    pub fn input(&self) -> &str {
        &self.values[self.field]
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.values[self.field]
    }

    pub fn is_last_field(&self) -> bool {
        self.field + 1 == EDIT_FIELDS.len()
    }

    /// Fields whose text differs from `chapter`; untouched fields stay `None`.
    pub fn changes(&self, chapter: &ChapterRecord) -> ChapterEdit {
        let current = field_values(chapter);
        let changed = |i: usize| (self.values[i] != current[i]).then(|| self.values[i].clone());
        ChapterEdit {
            name: changed(0),
            plot: changed(1),
            start: changed(2),
            end: changed(3),
            pov: changed(4),
            characters: changed(5),
            synopsis: changed(6),
        }
    }
}

fn field_values(chapter: &ChapterRecord) -> [String; 7] {
    [
        chapter.chapter_name.clone(),
        chapter.plot.clone(),
        edit::format_date(chapter.start_date),
        edit::format_date(chapter.end_date),
        chapter.point_of_view.clone(),
        chapter.characters.clone(),
        chapter.synopsis.clone(),
    ]
}

/// Main application state
pub struct App {
    pub dir: PathBuf,
    pub config: TimelineConfig,
    /// Records from the last scan, with in-memory edits applied
    pub records: Vec<ChapterRecord>,
    /// Index into `visible()`
    pub cursor: usize,
    /// Date window: chapters must start on/after `.0` and end on/before `.1`
    pub window: (Option<NaiveDate>, Option<NaiveDate>),
    pub split_threads: bool,
    /// Paths of records edited since the last save or reload
    pub dirty: HashSet<PathBuf>,
    /// One-line message for the status row
    pub status: Option<String>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
}

impl App {
    pub fn new(dir: PathBuf, config: TimelineConfig) -> Result<Self, directory_io::ScanError> {
        let records = directory_io::scan_directory(&dir, &config)?;
        Ok(Self::with_records(dir, config, records))
    }

    pub fn with_records(dir: PathBuf, config: TimelineConfig, records: Vec<ChapterRecord>) -> Self {
        let split_threads = config.timeline.split_threads;
        App {
            dir,
            config,
            records,
            cursor: 0,
            window: (None, None),
            split_threads,
            dirty: HashSet::new(),
            status: None,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    /// Indices of records inside the current date window, in display order.
    pub fn visible(&self) -> Vec<usize> {
        let (from, to) = self.window;
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| from.is_none_or(|f| r.start_date >= f))
            .filter(|(_, r)| to.is_none_or(|t| r.end_date <= t))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_records(&self) -> Vec<ChapterRecord> {
        self.visible()
            .into_iter()
            .map(|i| self.records[i].clone())
            .collect()
    }

    /// Index into `records` of the selected chapter.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible().get(self.cursor).copied()
    }

    pub fn selected(&self) -> Option<&ChapterRecord> {
        self.selected_index().map(|i| &self.records[i])
    }

    pub fn clamp_cursor(&mut self) {
        let n = self.visible().len();
        if self.cursor >= n {
            self.cursor = n.saturating_sub(1);
        }
    }

    /// Span of all records, ignoring the window.
    pub fn full_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        timeline::date_span(&self.records)
    }

    pub fn mark_dirty(&mut self, idx: usize) {
        self.dirty.insert(self.records[idx].source_path.clone());
    }

    /// Rescan the directory, discarding unsaved edits.
    pub fn reload(&mut self) {
        match directory_io::scan_directory(&self.dir, &self.config) {
            Ok(records) => {
                self.records = records;
                self.dirty.clear();
                self.clamp_cursor();
                self.status = Some(format!("reloaded {} chapters", self.records.len()));
            }
            Err(e) => self.status = Some(format!("reload failed: {}", e)),
        }
    }

    /// Write every edited record back to its chapter file.
    pub fn save(&mut self) {
        if self.dirty.is_empty() {
            self.status = Some("nothing to save".to_string());
            return;
        }
        let edited: Vec<ChapterRecord> = self
            .records
            .iter()
            .filter(|r| self.dirty.contains(&r.source_path))
            .cloned()
            .collect();

        match directory_io::save_records(&self.dir, &self.config, &edited) {
            Ok(report) => {
                for (path, result) in &report.results {
                    if result.is_ok() {
                        self.dirty.remove(path);
                    }
                }
                let no_anchor = report.missing_anchor().count();
                self.status = Some(if !report.is_ok() {
                    let first = report
                        .failures()
                        .next()
                        .map(|(_, e)| e.to_string())
                        .unwrap_or_default();
                    format!("saved {}, failed {}: {}", report.written(), edited.len() - report.written(), first)
                } else if no_anchor > 0 {
                    format!("saved {} ({} without anchor line lost their front-matter)", report.written(), no_anchor)
                } else {
                    format!("saved {}", report.written())
                });
            }
            Err(e) => self.status = Some(format!("save failed: {}", e)),
        }
    }
}

pub fn run(dir: PathBuf, config: TimelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(dir, config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
