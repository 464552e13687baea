//! Application state for the loghaul dashboard

use loghaul_core::{Detail, FilterState, LogRecord, RecordSet, Severity, detail};
use ratatui::widgets::ListState;

/// Rows moved by one page key.
pub const PAGE_SIZE: usize = 10;

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the dashboard.
    Quit,
    /// Show only the n-th configured origin (zero-based).
    SelectOrigin(usize),
    /// Show every origin.
    ClearOrigin,
    /// Show only one level.
    SelectLevel(Severity),
    /// Show every level.
    ClearLevel,
    /// Selection up one row.
    Up,
    /// Selection down one row.
    Down,
    /// Selection up one page.
    PageUp,
    /// Selection down one page.
    PageDown,
    /// First visible record.
    First,
    /// Last visible record.
    Last,
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Is the app running
    pub running: bool,

    /// List widget state; `selected` is a position in the visible subset.
    pub list_state: ListState,

    records: RecordSet,
    filter: FilterState,
    origin_tags: Vec<String>,
    summary: String,
}

impl App {
    /// Wraps an acquired, already ordered record list.
    ///
    /// `origin_tags` gives the origin bound to each number key and `summary`
    /// the acquisition outcome shown in the footer.
    pub fn new(records: Vec<LogRecord>, origin_tags: Vec<String>, summary: impl Into<String>) -> Self {
        let mut app = Self {
            running: true,
            list_state: ListState::default(),
            records: RecordSet::new(records),
            filter: FilterState::new(),
            origin_tags,
            summary: summary.into(),
        };
        app.reset_selection();
        app
    }

    /// Applies one action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SelectOrigin(n) => {
                if let Some(tag) = self.origin_tags.get(n) {
                    self.filter.select_origin(tag.clone());
                    self.refilter();
                }
            }
            Action::ClearOrigin => {
                self.filter.clear_origin();
                self.refilter();
            }
            Action::SelectLevel(severity) => {
                self.filter.select_level(severity.as_str());
                self.refilter();
            }
            Action::ClearLevel => {
                self.filter.clear_level();
                self.refilter();
            }
            Action::Up => self.move_up(1),
            Action::Down => self.move_down(1),
            Action::PageUp => self.move_up(PAGE_SIZE),
            Action::PageDown => self.move_down(PAGE_SIZE),
            Action::First => self.select_position(0),
            Action::Last => self.select_position(self.records.visible_len().saturating_sub(1)),
        }
    }

    /// Current filter selections.
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Full and visible record sets.
    pub const fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Origin tags bound to the number keys.
    pub fn origin_tags(&self) -> &[String] {
        &self.origin_tags
    }

    /// Acquisition summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Selected position within the visible subset.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// The record under the selection.
    pub fn selected_record(&self) -> Option<&LogRecord> {
        self.selected().and_then(|pos| self.records.get_visible(pos))
    }

    /// Detail view of the selected record.
    pub fn selected_detail(&self) -> Option<Detail> {
        self.selected_record().map(detail::format)
    }

    fn refilter(&mut self) {
        self.records.apply(&self.filter);
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        *self.list_state.offset_mut() = 0;
        let first = (self.records.visible_len() > 0).then_some(0);
        self.list_state.select(first);
    }

    fn select_position(&mut self, position: usize) {
        if self.records.visible_len() > 0 {
            self.list_state.select(Some(position.min(self.records.visible_len() - 1)));
        }
    }

    fn move_up(&mut self, rows: usize) {
        if let Some(current) = self.selected() {
            self.select_position(current.saturating_sub(rows));
        }
    }

    fn move_down(&mut self, rows: usize) {
        if let Some(current) = self.selected() {
            self.select_position(current.saturating_add(rows));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loghaul_core::parse_line;
    use test_case::test_case;

    fn record(source: &str, level: &str, minute: u32) -> LogRecord {
        let line = format!(
            r#"{{"level":"{level}","timestamp":"2024-01-01 10:{minute:02}:00","message":"m{minute}"}}"#
        );
        parse_line(&line, source).expect("valid line")
    }

    fn app(count: u32) -> App {
        let records = (0..count)
            .rev()
            .map(|m| {
                let source = if m % 2 == 0 { "email" } else { "nextjs" };
                let level = if m % 3 == 0 { "error" } else { "info" };
                record(source, level, m)
            })
            .collect();
        App::new(records, vec!["email".into(), "nextjs".into()], "ok")
    }

    #[test]
    fn starts_on_first_record() {
        let app = app(3);
        assert!(app.running);
        assert_eq!(app.selected(), Some(0));
        assert_eq!(app.selected_record().map(LogRecord::message), Some("m2"));
    }

    #[test]
    fn empty_set_has_no_selection() {
        let mut app = App::new(Vec::new(), vec!["email".into()], "email: unavailable");
        assert_eq!(app.selected(), None);
        app.apply(Action::Down);
        app.apply(Action::Last);
        assert_eq!(app.selected(), None);
        assert!(app.selected_detail().is_none());
    }

    #[test_case(Action::Down, 1 ; "down")]
    #[test_case(Action::PageDown, 10 ; "page down")]
    #[test_case(Action::Last, 24 ; "last")]
    #[test_case(Action::Up, 0 ; "up clamps at top")]
    fn navigation(action: Action, expected: usize) {
        let mut app = app(25);
        app.apply(action);
        assert_eq!(app.selected(), Some(expected));
    }

    #[test]
    fn page_down_clamps_at_bottom() {
        let mut app = app(12);
        app.apply(Action::PageDown);
        app.apply(Action::PageDown);
        assert_eq!(app.selected(), Some(11));
        app.apply(Action::First);
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn filter_change_resets_selection() {
        let mut app = app(10);
        app.apply(Action::Last);
        app.apply(Action::SelectLevel(Severity::Error));

        assert_eq!(app.selected(), Some(0));
        assert_eq!(app.records().visible_len(), 4);
        assert!(app.records().visible().all(|r| r.level() == "error"));
    }

    #[test]
    fn origin_keys_follow_configured_order() {
        let mut app = app(6);
        app.apply(Action::SelectOrigin(1));
        assert_eq!(app.filter().origin(), Some("nextjs"));
        assert!(app.records().visible().all(|r| r.source() == "nextjs"));

        app.apply(Action::SelectOrigin(0));
        assert_eq!(app.filter().origin(), Some("email"));
        assert_eq!(app.records().visible_len(), 3);
    }

    #[test]
    fn unbound_origin_key_changes_nothing() {
        let mut app = app(6);
        app.apply(Action::Down);
        app.apply(Action::SelectOrigin(5));
        assert!(app.filter().is_unfiltered());
        assert_eq!(app.selected(), Some(1));
    }

    #[test]
    fn clearing_restores_full_view() {
        let mut app = app(6);
        app.apply(Action::SelectOrigin(0));
        app.apply(Action::SelectLevel(Severity::Error));
        app.apply(Action::ClearOrigin);
        app.apply(Action::ClearLevel);
        assert_eq!(app.records().visible_len(), 6);
    }

    #[test]
    fn filter_with_no_match_clears_selection() {
        let mut app = app(4);
        app.apply(Action::SelectLevel(Severity::Fatal));
        assert_eq!(app.selected(), None);
        assert!(app.selected_record().is_none());
    }

    #[test]
    fn detail_follows_selection() {
        let mut app = app(3);
        app.apply(Action::Down);
        let text = app.selected_detail().expect("selected").to_plain_text();
        assert!(text.contains("message  : m1"));
    }

    #[test]
    fn quit_stops_running() {
        let mut app = app(1);
        app.apply(Action::Quit);
        assert!(!app.running);
    }
}
