//! Terminal frontend for the selection state machine.
//!
//! Maps crossterm key events to `SelectEvent`s and paints the machine's
//! visible window. The terminal is restored on every exit path; ratatui's
//! init hooks also restore it on panic.

use chrono::{Local, TimeZone};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use dirjump_core::{path_utils, Candidate, Config, SelectEvent, SelectionState, Shortcut, Transition, View};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table, TableState};
use ratatui::{DefaultTerminal, Frame};

const TABLE_HEADER_LENGTH: u16 = 1;

/// Run the interactive session to completion. `Some(path)` on confirm,
/// `None` on cancel.
pub fn run(
    state: &mut SelectionState,
    config: &Config,
    shortcuts: &[Shortcut],
) -> std::io::Result<Option<String>> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, state, config, shortcuts);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut SelectionState,
    config: &Config,
    shortcuts: &[Shortcut],
) -> std::io::Result<Option<String>> {
    let home = dirs::home_dir().map(|p| p.to_string_lossy().to_string());
    let palette = Palette::from_config(config);

    loop {
        terminal.draw(|frame| draw(frame, state, &palette, shortcuts, home.as_deref()))?;

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let Some(select_event) = map_key(key.code, key.modifiers) else {
                    tracing::debug!(code = ?key.code, "Unmapped key");
                    continue;
                };
                match state.apply(select_event) {
                    Transition::Continue => {}
                    Transition::Confirmed(path) => return Ok(Some(path)),
                    Transition::Cancelled => return Ok(None),
                }
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "Resize");
            }
            _ => {}
        }
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<SelectEvent> {
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    match code {
        KeyCode::Enter => Some(SelectEvent::Confirm),
        KeyCode::Esc => Some(SelectEvent::Cancel),
        KeyCode::Tab | KeyCode::BackTab => Some(SelectEvent::ToggleView),
        KeyCode::Home => Some(SelectEvent::Home),
        KeyCode::Backspace => Some(SelectEvent::Backspace),
        KeyCode::Down if shift => Some(SelectEvent::JumpDown),
        KeyCode::Up if shift => Some(SelectEvent::JumpUp),
        KeyCode::Down => Some(SelectEvent::Down),
        KeyCode::Up => Some(SelectEvent::Up),
        KeyCode::PageDown => Some(SelectEvent::PageDown),
        KeyCode::PageUp => Some(SelectEvent::PageUp),
        KeyCode::Char(c) => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'a' => Some(SelectEvent::TogglePathMode),
                    'q' => Some(SelectEvent::Cancel),
                    _ => None,
                }
            } else {
                Some(SelectEvent::Char(c))
            }
        }
        _ => None,
    }
}

struct Palette {
    date: Color,
    path: Color,
    highlight: Color,
    shortcut_name: Color,
}

impl Palette {
    fn from_config(config: &Config) -> Self {
        Palette {
            date: parse_color(&config.colors.date),
            path: parse_color(&config.colors.path),
            highlight: parse_color(&config.colors.highlight),
            shortcut_name: parse_color(&config.colors.shortcut_name),
        }
    }
}

fn parse_color(name: &str) -> Color {
    name.parse::<Color>().unwrap_or_else(|_| {
        tracing::warn!(name, "Unknown color in config, using terminal default");
        Color::Reset
    })
}

fn draw(
    frame: &mut Frame,
    state: &mut SelectionState,
    palette: &Palette,
    shortcuts: &[Shortcut],
    home: Option<&str>,
) {
    let vertical = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).spacing(0);
    let [main, input] = vertical.areas(frame.area());

    state.set_page_height(main.height.saturating_sub(TABLE_HEADER_LENGTH).max(1) as usize);
    render_table(frame, main, state, palette, shortcuts, home);

    let horizontal =
        Layout::horizontal([Constraint::Percentage(90), Constraint::Percentage(10)]).spacing(0);
    let [left, right] = horizontal.areas(input);

    let query_line = Paragraph::new(format!("> {}", state.query()))
        .style(Style::default().fg(palette.path));
    frame.render_widget(query_line, left);

    let badge = if state.candidates().is_empty() {
        Paragraph::new("no entry")
            .style(Style::default().fg(Color::Black))
            .bg(Color::Red)
            .alignment(Alignment::Center)
    } else {
        Paragraph::new("").alignment(Alignment::Center)
    };
    frame.render_widget(badge, right);
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    state: &SelectionState,
    palette: &Palette,
    shortcuts: &[Shortcut],
    home: Option<&str>,
) {
    let (window, cursor_in_window) = state.visible_window();

    let column_names = match state.view() {
        View::History => ["date", "path"],
        View::Shortcuts => ["shortcut", "path"],
    };

    let full_path = state.full_path_mode();
    let rows: Vec<Row> = window
        .iter()
        .map(|candidate| match state.view() {
            View::History => history_row(candidate, palette, shortcuts, home, full_path),
            View::Shortcuts => shortcut_row(candidate, palette),
        })
        .collect();

    let widths = [Constraint::Length(20), Constraint::Fill(1)];
    let table = Table::new(rows, widths)
        .header(
            Row::new(column_names.to_vec()).style(
                Style::new()
                    .fg(Color::White)
                    .bg(Color::Rgb(0, 0x33, 0x66))
                    .bold(),
            ),
        )
        .column_spacing(1)
        .row_highlight_style(Style::new().black().bg(palette.highlight).bold())
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(cursor_in_window);
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn history_row(
    candidate: &Candidate,
    palette: &Palette,
    shortcuts: &[Shortcut],
    home: Option<&str>,
    full_path: bool,
) -> Row<'static> {
    let display = if full_path {
        candidate.path.clone()
    } else {
        path_utils::compress_with_shortcuts(&candidate.path, shortcuts, home)
    };
    Row::new(vec![
        Line::from(Span::from(format_date(candidate.last_visited)).fg(palette.date)),
        Line::from(Span::from(display).fg(palette.path)),
    ])
}

fn shortcut_row(candidate: &Candidate, palette: &Palette) -> Row<'static> {
    Row::new(vec![
        Line::from(Span::from(candidate.match_text.clone()).fg(palette.shortcut_name)),
        Line::from(Span::from(candidate.path.clone()).fg(palette.path)),
    ])
}

fn format_date(unix_secs: u64) -> String {
    match Local.timestamp_opt(unix_secs as i64, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => String::from("-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_mapping_covers_the_spec_bindings() {
        let none = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let ctrl = KeyModifiers::CONTROL;

        assert_eq!(map_key(KeyCode::Enter, none), Some(SelectEvent::Confirm));
        assert_eq!(map_key(KeyCode::Esc, none), Some(SelectEvent::Cancel));
        assert_eq!(map_key(KeyCode::Tab, none), Some(SelectEvent::ToggleView));
        assert_eq!(map_key(KeyCode::Home, none), Some(SelectEvent::Home));
        assert_eq!(map_key(KeyCode::Down, none), Some(SelectEvent::Down));
        assert_eq!(map_key(KeyCode::Up, shift), Some(SelectEvent::JumpUp));
        assert_eq!(map_key(KeyCode::Down, shift), Some(SelectEvent::JumpDown));
        assert_eq!(map_key(KeyCode::PageUp, none), Some(SelectEvent::PageUp));
        assert_eq!(
            map_key(KeyCode::Char('a'), ctrl),
            Some(SelectEvent::TogglePathMode)
        );
        assert_eq!(map_key(KeyCode::Char('q'), ctrl), Some(SelectEvent::Cancel));
        assert_eq!(
            map_key(KeyCode::Char('x'), none),
            Some(SelectEvent::Char('x'))
        );
        assert_eq!(map_key(KeyCode::Char('z'), ctrl), None);
        assert_eq!(map_key(KeyCode::F(5), none), None);
    }
}
