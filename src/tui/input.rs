use chrono::Duration;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::edit::{self, EditError};

use super::app::{App, EditForm, Mode};

/// Days the window edges move per key press.
const WINDOW_STEP_DAYS: i64 = 7;

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    if matches!(app.mode, Mode::Edit(_)) {
        handle_edit_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.dirty.is_empty() {
                app.should_quit = true;
            } else {
                app.status = Some(format!(
                    "{} unsaved chapters: s to save, Q to quit without saving",
                    app.dirty.len()
                ));
            }
        }
        KeyCode::Char('Q') => app.should_quit = true,

        KeyCode::Down | KeyCode::Char('j') => {
            if app.cursor + 1 < app.visible().len() {
                app.cursor += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.cursor = app.visible().len().saturating_sub(1);
        }

        KeyCode::Left | KeyCode::Char('h') => shift_selected(app, -1),
        KeyCode::Right | KeyCode::Char('l') => shift_selected(app, 1),
        KeyCode::Char('H') => resize_selected(app, -1),
        KeyCode::Char('L') => resize_selected(app, 1),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(idx) = app.selected_index() {
                app.mode = Mode::Edit(EditForm::new(idx, &app.records[idx]));
            }
        }

        KeyCode::Char('[') => move_window_start(app, -WINDOW_STEP_DAYS),
        KeyCode::Char(']') => move_window_start(app, WINDOW_STEP_DAYS),
        KeyCode::Char('{') => move_window_end(app, -WINDOW_STEP_DAYS),
        KeyCode::Char('}') => move_window_end(app, WINDOW_STEP_DAYS),
        KeyCode::Char('0') => {
            app.window = (None, None);
            app.clamp_cursor();
        }

        KeyCode::Char('t') => app.split_threads = !app.split_threads,
        KeyCode::Char('s') => app.save(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}

/// Keys while the edit form is open: type into the current field, move
/// between fields, submit from the last one.
fn handle_edit_key(app: &mut App, key: KeyEvent) {
    let Mode::Edit(form) = &mut app.mode else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.status = Some("edit cancelled".to_string());
        }
        KeyCode::Enter if form.is_last_field() => submit_edit(app),
        KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
            if !form.is_last_field() {
                form.field += 1;
            }
        }
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.saturating_sub(1),
        KeyCode::Backspace => {
            form.input_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.input_mut().push(c);
        }
        _ => {}
    }
}

/// Validate the form and apply it in memory. The file is written on the
/// next save. On error the record is untouched and the form stays open on
/// the offending field.
fn submit_edit(app: &mut App) {
    let Mode::Edit(form) = &app.mode else {
        return;
    };
    let idx = form.record;
    let changes = form.changes(&app.records[idx]);
    if changes.is_empty() {
        app.mode = Mode::Navigate;
        app.status = Some("no changes".to_string());
        return;
    }

    match edit::apply_edit(
        &mut app.records[idx],
        &changes,
        &app.config.timeline.default_plot,
    ) {
        Ok(()) => {
            app.mode = Mode::Navigate;
            app.mark_dirty(idx);
            app.clamp_cursor();
            app.status = Some(format!("edited {}: s to save", app.records[idx].chapter_name));
        }
        Err(e) => {
            if let Mode::Edit(form) = &mut app.mode {
                form.field = match e {
                    EditError::InvalidDate { field: "end", .. } => 3,
                    _ => 2,
                };
            }
            app.status = Some(e.to_string());
        }
    }
}

fn shift_selected(app: &mut App, days: i64) {
    if let Some(idx) = app.selected_index() {
        edit::shift_dates(&mut app.records[idx], days);
        app.mark_dirty(idx);
    }
}

fn resize_selected(app: &mut App, days: i64) {
    if let Some(idx) = app.selected_index() {
        match edit::resize_end(&mut app.records[idx], days) {
            Ok(()) => app.mark_dirty(idx),
            Err(e) => app.status = Some(e.to_string()),
        }
    }
}

fn move_window_start(app: &mut App, days: i64) {
    let Some((span_start, _)) = app.full_span() else {
        return;
    };
    let current = app.window.0.unwrap_or(span_start);
    let Some(next) = current.checked_add_signed(Duration::days(days)) else {
        return;
    };
    if app.window.1.is_some_and(|end| next >= end) {
        return;
    }
    app.window.0 = if next <= span_start { None } else { Some(next) };
    app.clamp_cursor();
}

fn move_window_end(app: &mut App, days: i64) {
    let Some((_, span_end)) = app.full_span() else {
        return;
    };
    let current = app.window.1.unwrap_or(span_end);
    let Some(next) = current.checked_add_signed(Duration::days(days)) else {
        return;
    };
    if app.window.0.is_some_and(|start| next <= start) {
        return;
    }
    app.window.1 = if next >= span_end { None } else { Some(next) };
    app.clamp_cursor();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chapter::ChapterRecord;
    use crate::model::config::TimelineConfig;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(c));
        }
    }

    fn clear_field(app: &mut App) {
        let len = match &app.mode {
            Mode::Edit(form) => form.input().chars().count(),
            Mode::Navigate => 0,
        };
        for _ in 0..len {
            press(app, KeyCode::Backspace);
        }
    }

    fn edit_field(app: &App) -> Option<usize> {
        match &app.mode {
            Mode::Edit(form) => Some(form.field),
            Mode::Navigate => None,
        }
    }

    fn rec(dir: &Path, name: &str, start: NaiveDate, end: NaiveDate) -> ChapterRecord {
        ChapterRecord {
            chapter_name: name.into(),
            source_path: dir.join(format!("{}.nwd", name)),
            plot: "a".into(),
            point_of_view: String::new(),
            characters: String::new(),
            synopsis: String::new(),
            start_date: start,
            end_date: end,
        }
    }

    fn app() -> App {
        let dir = PathBuf::from("/tmp/plotline-test");
        let records = vec![
            rec(&dir, "one", date(1, 1), date(1, 5)),
            rec(&dir, "two", date(1, 20), date(2, 1)),
            rec(&dir, "three", date(3, 1), date(3, 2)),
        ];
        App::with_records(dir, TimelineConfig::default(), records)
    }

    #[test]
    fn test_cursor_movement_clamps() {
        let mut app = app();
        handle_key(&mut app, key('k'));
        assert_eq!(app.cursor, 0);
        handle_key(&mut app, key('G'));
        assert_eq!(app.cursor, 2);
        handle_key(&mut app, key('j'));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_shift_and_resize_mark_dirty() {
        let mut app = app();
        handle_key(&mut app, key('l'));
        assert_eq!(app.records[0].start_date, date(1, 2));
        assert_eq!(app.records[0].end_date, date(1, 6));
        assert_eq!(app.dirty.len(), 1);

        handle_key(&mut app, key('j'));
        handle_key(&mut app, key('j'));
        handle_key(&mut app, key('H'));
        assert_eq!(app.records[2].end_date, date(3, 2));
        assert!(app.status.is_some());
        assert_eq!(app.dirty.len(), 1);
    }

    #[test]
    fn test_quit_requires_save_when_dirty() {
        let mut app = app();
        handle_key(&mut app, key('h'));
        handle_key(&mut app, key('q'));
        assert!(!app.should_quit);
        assert!(app.status.as_deref().unwrap().contains("unsaved"));
        handle_key(&mut app, key('Q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_window_narrows_visible_chapters() {
        let mut app = app();
        handle_key(&mut app, key(']'));
        handle_key(&mut app, key(']'));
        assert_eq!(app.window.0, Some(date(1, 15)));
        assert_eq!(app.visible(), vec![1, 2]);

        handle_key(&mut app, key('{'));
        assert_eq!(app.window.1, Some(date(2, 24)));
        assert_eq!(app.visible(), vec![1]);

        handle_key(&mut app, key('0'));
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn test_edit_form_applies_changes() {
        let mut app = app();
        handle_key(&mut app, key('e'));
        assert_eq!(edit_field(&app), Some(0));

        clear_field(&mut app);
        type_text(&mut app, "First");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(edit_field(&app), Some(3));
        clear_field(&mut app);
        type_text(&mut app, "2024-01-09");
        for _ in 0..4 {
            press(&mut app, KeyCode::Enter);
        }

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.records[0].chapter_name, "First");
        assert_eq!(app.records[0].start_date, date(1, 1));
        assert_eq!(app.records[0].end_date, date(1, 9));
        assert_eq!(app.dirty.len(), 1);
        assert_eq!(app.status.as_deref(), Some("edited First: s to save"));
    }

    #[test]
    fn test_edit_form_rejects_bad_date() {
        let mut app = app();
        let before = app.records[0].clone();
        handle_key(&mut app, key('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        clear_field(&mut app);
        type_text(&mut app, "2024-13-01");
        for _ in 0..5 {
            press(&mut app, KeyCode::Enter);
        }

        assert_eq!(app.records[0], before);
        assert!(app.dirty.is_empty());
        assert_eq!(
            app.status.as_deref(),
            Some("invalid start date '2024-13-01': expected YYYY-MM-DD")
        );
        assert_eq!(edit_field(&app), Some(2));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.records[0], before);
    }

    #[test]
    fn test_edit_form_rejects_inverted_range() {
        let mut app = app();
        handle_key(&mut app, key('e'));
        for _ in 0..3 {
            press(&mut app, KeyCode::Tab);
        }
        clear_field(&mut app);
        type_text(&mut app, "2023-12-01");
        for _ in 0..4 {
            press(&mut app, KeyCode::Enter);
        }

        assert!(app.status.as_deref().unwrap().contains("must be before end date"));
        assert_eq!(edit_field(&app), Some(2));
        assert_eq!(app.records[0].end_date, date(1, 5));
    }

    #[test]
    fn test_edit_form_without_changes() {
        let mut app = app();
        handle_key(&mut app, key('e'));
        for _ in 0..7 {
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.status.as_deref(), Some("no changes"));
        assert!(app.dirty.is_empty());
    }

    #[test]
    fn test_save_writes_dirty_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("one.nwd");
        fs::write(&path, "%%~name: one\n%%~date: x\n@plot: a\n@time: 2024-01-01\n@time: 2024-01-05\n").unwrap();

        let mut app = App::new(tmp.path().to_path_buf(), TimelineConfig::default()).unwrap();
        handle_key(&mut app, key('s'));
        assert_eq!(app.status.as_deref(), Some("nothing to save"));

        handle_key(&mut app, key('l'));
        handle_key(&mut app, key('s'));
        assert!(app.dirty.is_empty());
        assert_eq!(app.status.as_deref(), Some("saved 1"));
        assert!(fs::read_to_string(&path).unwrap().contains("@time: 2024-01-02\n@time: 2024-01-06\n"));

        handle_key(&mut app, key('h'));
        handle_key(&mut app, key('r'));
        assert!(app.dirty.is_empty());
        assert_eq!(app.records[0].start_date, date(1, 2));
    }
}
