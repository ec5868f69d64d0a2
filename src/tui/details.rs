//! Details view - market data and risk calculation notes.

use crate::types::{DetailKind, DetailReport};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{Action, Theme};

/// Render a detail report.
pub fn render(frame: &mut Frame, area: Rect, report: &DetailReport, theme: &Theme) {
    let mut lines = Vec::new();

    for section in &report.sections {
        lines.push(Line::from(Span::styled(section.heading.clone(), theme.header())));
        for entry in &section.entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", entry.label), theme.muted()),
                Span::raw(entry.value.clone()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("[m]", theme.info()),
        Span::raw(" Market  "),
        Span::styled("[r]", theme.info()),
        Span::raw(" Risk"),
    ]));

    let block = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("ℹ {}", report.title))
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

/// Handle keyboard events for the details view.
pub fn handle_event(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('m') => Some(Action::ShowDetails(DetailKind::Market)),
        KeyCode::Char('r') => Some(Action::ShowDetails(DetailKind::Risk)),
        _ => None,
    }
}
