//! Logs view - engine and server logs.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{Action, LogBuffer, Theme};

/// Lines kept on screen.
const VISIBLE_LINES: usize = 200;

/// Render the log output, newest first.
pub fn render(frame: &mut Frame, area: Rect, logs: &LogBuffer, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📝 Logs (Live) [c] clear")
        .border_style(theme.border());

    let lines = logs.recent(VISIBLE_LINES);
    if lines.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No logs yet.", theme.muted())),
        ];
        frame.render_widget(Paragraph::new(text).block(block).centered(), area);
        return;
    }

    let items: Vec<ListItem> = lines
        .iter()
        .rev()
        .map(|line| {
            let style = if line.contains("ERROR") {
                theme.error()
            } else if line.contains("WARN") {
                theme.warning()
            } else if line.contains("INFO") {
                theme.success()
            } else if line.contains("DEBUG") {
                theme.muted()
            } else {
                theme.info()
            };
            ListItem::new(Line::from(Span::styled(line.clone(), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Handle keyboard events for the logs view.
pub fn handle_event(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::ClearLogs),
        _ => None,
    }
}
