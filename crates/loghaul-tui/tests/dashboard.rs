//! Keyboard-driven dashboard flow over a parsed snapshot.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use loghaul_core::{LogRecord, parse_lines, sort_by_recency};
use loghaul_tui::app::App;
use loghaul_tui::events::handle_key;
use loghaul_tui::ui;
use ratatui::{Terminal, backend::TestBackend};

const EMAIL: [&str; 3] = [
    r#"{"level":"info","timestamp":"2024-01-01 10:00:00","message":"queued: 4 mails"}"#,
    r#"{"level":"error","timestamp":"2024-01-01 09:00:00","message":"smtp: timeout","attempt":3}"#,
    "not json",
];

const NEXTJS: [&str; 2] = [
    r#"{"level":"error","timestamp":"2024-01-01 11:00:00","message":"render failed: /home"}"#,
    r#"{"level":"warn","timestamp":"garbage","message":"slow"}"#,
];

fn snapshot() -> App {
    let mut records: Vec<LogRecord> = parse_lines(EMAIL, "email").records;
    records.extend(parse_lines(NEXTJS, "nextjs").records);
    sort_by_recency(&mut records);
    App::new(records, vec!["email".into(), "nextjs".into()], "email: 2 records | nextjs: 2 records")
}

fn press(app: &mut App, c: char) {
    handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
}

fn messages(app: &App) -> Vec<&str> {
    app.records().visible().map(LogRecord::message).collect()
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 24)).expect("terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_is_newest_first_with_unparsable_time_last() {
    let app = snapshot();
    assert_eq!(
        messages(&app),
        vec!["render failed: /home", "queued: 4 mails", "smtp: timeout", "slow"]
    );
}

#[test]
fn origin_and_level_keys_combine() {
    let mut app = snapshot();

    press(&mut app, 'e');
    assert_eq!(messages(&app), vec!["render failed: /home", "smtp: timeout"]);

    press(&mut app, '1');
    assert_eq!(messages(&app), vec!["smtp: timeout"]);

    press(&mut app, '2');
    assert_eq!(messages(&app), vec!["render failed: /home"]);

    press(&mut app, '0');
    press(&mut app, 'c');
    assert_eq!(app.records().visible_len(), 4);
}

#[test]
fn selection_resets_after_filtering() {
    let mut app = snapshot();
    press(&mut app, 'j');
    press(&mut app, 'j');
    assert_eq!(app.selected_record().map(LogRecord::message), Some("smtp: timeout"));

    press(&mut app, 'w');
    assert_eq!(app.selected(), Some(0));
    assert_eq!(app.selected_record().map(LogRecord::message), Some("slow"));

    press(&mut app, 'f');
    assert_eq!(app.selected(), None);
    assert!(screen(&mut app).contains(ui::NO_SELECTION));
}

#[test]
fn screen_shows_list_detail_and_summary() {
    let mut app = snapshot();
    press(&mut app, '1');
    press(&mut app, 'j');
    let text = screen(&mut app);

    assert!(text.contains("origin: email | level: all"));
    assert!(text.contains("2/4 shown"));
    assert!(text.contains("[email]  [error]    smtp"));
    assert!(text.contains("attempt  : 3"));
    assert!(text.contains("email: 2 records | nextjs: 2 records"));
}

#[test]
fn quit_key_stops_the_loop() {
    let mut app = snapshot();
    press(&mut app, 'q');
    assert!(!app.running);
}
