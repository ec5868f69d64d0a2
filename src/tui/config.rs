//! Config view - balance, refresh cadence and symbol selection.

use crate::types::{
    available_symbols, ConfigUpdate, Configuration, RefreshRate, MAX_SELECTED_SYMBOLS,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{Action, Theme};

/// Balance change per `+`/`-` press.
pub const BALANCE_STEP: f64 = 1_000.0;

/// Toggle key for the catalog entry at `index`: `a`, `b`, ...
fn toggle_key(index: usize) -> char {
    (b'a' + index as u8) as char
}

fn catalog_index(c: char) -> Option<usize> {
    let index = (c as u32).checked_sub('a' as u32)? as usize;
    (index < available_symbols().count()).then_some(index)
}

/// Render the config view.
pub fn render(frame: &mut Frame, area: Rect, config: &Configuration, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let rates: Vec<Span> = RefreshRate::all()
        .iter()
        .flat_map(|rate| {
            let style = if *rate == config.refresh_rate_ms {
                theme.tab_active()
            } else {
                theme.tab_inactive()
            };
            [Span::styled(format!(" {} ", rate.label()), style), Span::raw(" ")]
        })
        .collect();

    let settings = vec![
        Line::from(vec![
            Span::styled("Account Balance: ", theme.muted()),
            Span::styled(format!("${:.2}", config.account_balance), theme.title()),
            Span::styled("  [+/-] adjust", theme.muted()),
        ]),
        Line::from(""),
        Line::from(
            std::iter::once(Span::styled("Refresh Rate: ", theme.muted()))
                .chain(rates)
                .chain(std::iter::once(Span::styled("[r] cycle", theme.muted())))
                .collect::<Vec<_>>(),
        ),
    ];

    let block = Paragraph::new(settings).block(
        Block::default()
            .borders(Borders::ALL)
            .title("⚙ Settings")
            .border_style(theme.border()),
    );
    frame.render_widget(block, chunks[0]);

    let items: Vec<ListItem> = available_symbols()
        .enumerate()
        .map(|(i, symbol)| {
            let selected = config.selected_symbols.iter().any(|s| s == symbol);
            let (mark, style) = if selected {
                ("[x]", theme.success())
            } else {
                ("[ ]", theme.muted())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", toggle_key(i)), theme.info()),
                Span::styled(mark, style),
                Span::raw(format!(" {}", symbol)),
            ]))
        })
        .collect();

    let title = format!(
        "📋 Symbols ({}/{} selected)",
        config.selected_symbols.len(),
        MAX_SELECTED_SYMBOLS
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border()),
    );
    frame.render_widget(list, chunks[1]);
}

/// Handle keyboard events for the config view.
pub fn handle_event(key: &KeyEvent, config: &Configuration) -> Option<Action> {
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::ApplyConfig(
            ConfigUpdate::balance(config.account_balance + BALANCE_STEP),
        )),
        KeyCode::Char('-') => Some(Action::ApplyConfig(ConfigUpdate::balance(
            config.account_balance - BALANCE_STEP,
        ))),
        KeyCode::Char('r') => Some(Action::ApplyConfig(ConfigUpdate::refresh_rate(
            config.refresh_rate_ms.next(),
        ))),
        KeyCode::Char(c) => {
            let symbol = available_symbols().nth(catalog_index(c)?)?;
            let checked = !config.selected_symbols.iter().any(|s| s == symbol);
            Some(Action::ToggleSymbol {
                symbol: symbol.to_string(),
                checked,
            })
        }
        _ => None,
    }
}
