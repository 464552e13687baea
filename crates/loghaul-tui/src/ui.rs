//! UI rendering for the loghaul dashboard

use loghaul_core::display::{LEVEL_COLUMN, ORIGIN_COLUMN, level_label, origin_label};
use loghaul_core::{Detail, DetailLine, LogRecord, Severity};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::App;

/// Share of the body width given to the record list.
pub const LIST_PERCENT: u16 = 35;

/// Placeholder shown in the detail pane without a selection.
pub const NO_SELECTION: &str = "No log selected";

const HELP: &str = "1-9 origin  0 all origins  d/i/w/e/f level  c all levels  ↑↓ move  q quit";

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(4), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_body(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);
}

/// Emphasis color of a level label.
pub const fn level_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Green,
        Severity::Error => Color::Red,
        Severity::Fatal => Color::Yellow,
        _ => Color::Blue,
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let records = app.records();
    let line = Line::from(vec![
        Span::raw(app.filter().describe()),
        Span::styled(
            format!("   {}/{} shown", records.visible_len(), records.total_len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" loghaul ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(header, area);
}

fn draw_body(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LIST_PERCENT),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    draw_list(frame, app, chunks[0]);
    draw_separator(frame, chunks[1]);
    draw_detail(frame, app, chunks[2]);
}

fn draw_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem<'static>> = app.records().visible().map(list_item).collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Two-line list row: labels and message prefix, then the timestamp.
pub fn list_item(record: &LogRecord) -> ListItem<'static> {
    let level_style = Style::default().fg(level_color(Severity::classify(record.level())));
    let title = Line::from(vec![
        Span::raw(format!("{:<width$} ", origin_label(record), width = ORIGIN_COLUMN)),
        Span::styled(
            format!("{:<width$} ", level_label(record), width = LEVEL_COLUMN),
            level_style,
        ),
        Span::raw(record.message_prefix().to_string()),
    ]);
    let timestamp = Line::from(Span::styled(
        record.timestamp().to_string(),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
    ));
    ListItem::new(vec![title, timestamp])
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = (0..area.height).map(|_| Line::from("│")).collect();
    let separator = Paragraph::new(lines).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(separator, area);
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let lines = app
        .selected_detail()
        .map_or_else(|| vec![Line::from(NO_SELECTION)], |d| detail_lines(&d));

    let detail = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

/// Styled lines of a rendered detail; the level value carries its color.
pub fn detail_lines(detail: &Detail) -> Vec<Line<'static>> {
    detail
        .lines
        .iter()
        .map(|line| match line {
            DetailLine::Field {
                key,
                value,
                severity: Some(severity),
            } => Line::from(vec![
                Span::raw(format!("{}: ", detail.pad_key(key))),
                Span::styled(
                    value.clone(),
                    Style::default()
                        .fg(level_color(*severity))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            DetailLine::Rule(_) => Line::styled(
                detail.render_line(line),
                Style::default().fg(Color::DarkGray),
            ),
            other => Line::from(detail.render_line(other)),
        })
        .collect()
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
        Line::from(app.summary().to_string()),
    ];
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use loghaul_core::parse_line;
    use ratatui::{Terminal, backend::TestBackend};
    use test_case::test_case;

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test_case(Severity::Info, Color::Green)]
    #[test_case(Severity::Error, Color::Red)]
    #[test_case(Severity::Fatal, Color::Yellow)]
    #[test_case(Severity::Warn, Color::Blue)]
    #[test_case(Severity::Debug, Color::Blue)]
    #[test_case(Severity::Other, Color::Blue)]
    fn level_colors(severity: Severity, expected: Color) {
        assert_eq!(level_color(severity), expected);
    }

    #[test]
    fn level_value_is_colored() {
        let record = parse_line(r#"{"level":"error","timestamp":"t","message":"m"}"#, "email")
            .expect("valid");
        let lines = detail_lines(&loghaul_core::detail::format(&record));
        assert_eq!(lines[0].spans[1].content, "error");
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::Red));
    }

    #[test]
    fn empty_dashboard_shows_placeholder() {
        let mut app = App::new(Vec::new(), vec!["email".into()], "email: unavailable (refused)");
        let screen = render(&mut app);
        assert!(screen.contains(NO_SELECTION));
        assert!(screen.contains("0/0 shown"));
        assert!(screen.contains("email: unavailable (refused)"));
    }

    #[test]
    fn selection_renders_in_list_and_detail() {
        let record = parse_line(
            r#"{"level":"info","timestamp":"2024-01-01 10:00:00","message":"sent: 3 mails"}"#,
            "email",
        )
        .expect("valid");
        let mut app = App::new(vec![record], vec!["email".into()], "email: 1 record");
        let screen = render(&mut app);

        assert!(screen.contains("[email]  [info]     sent"));
        assert!(screen.contains("message  : sent: 3 mails"));
        assert!(screen.contains("origin: all | level: all"));
        assert!(!screen.contains(NO_SELECTION));
    }
}
