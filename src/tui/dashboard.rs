//! Dashboard view - header, alerts, market, risk and positions.

use crate::types::{DashboardSnapshot, DetailKind, Position, PriceRecord, RiskSnapshot};
use chrono::{Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use super::{Action, Theme};

/// Render the dashboard view.
pub fn render(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Alerts
            Constraint::Min(0),    // Market / risk / positions
        ])
        .split(area);

    render_header(frame, chunks[0], snapshot, theme);
    render_alerts(frame, chunks[1], snapshot, theme);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    render_market(frame, body[0], &snapshot.prices, theme);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(body[1]);

    render_risk(frame, right[0], &snapshot.risk, theme);
    render_positions(frame, right[1], snapshot, theme);
}

fn clock(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

fn render_header(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let (status, style) = if snapshot.connected {
        ("● Connected", theme.success())
    } else {
        ("○ Connecting...", theme.warning())
    };

    let line = Line::from(vec![
        Span::styled("Risk Dashboard", theme.title()),
        Span::raw("  "),
        Span::styled(status, style),
        Span::raw("  "),
        Span::styled("Last update: ", theme.muted()),
        Span::raw(clock(snapshot.last_update)),
        Span::raw("  "),
        Span::styled("Balance: ", theme.muted()),
        Span::raw(format!("${:.2}", snapshot.config.account_balance)),
    ]);

    let block = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

fn render_alerts(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let title = format!("🔔 Alerts ({})", snapshot.alerts.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.border());

    if snapshot.alerts.is_empty() {
        let text = Paragraph::new(Line::from(Span::styled("No active alerts", theme.muted())))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .alerts
        .iter()
        .map(|alert| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<14}", alert.title()), theme.severity(alert.severity)),
                Span::styled(format!("{} ", clock(alert.timestamp)), theme.muted()),
                Span::raw(alert.message.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_market(frame: &mut Frame, area: Rect, prices: &[PriceRecord], theme: &Theme) {
    let header = Row::new(vec!["Symbol", "Price", "24h", "Volume"]).style(theme.header());

    let rows: Vec<Row> = prices
        .iter()
        .map(|record| {
            let arrow = if record.is_up() { "▲" } else { "▼" };
            Row::new(vec![
                Span::styled(record.symbol.clone(), theme.title()),
                Span::raw(format!("${}", record.display_price())),
                Span::styled(
                    format!("{} {:.2}%", arrow, record.change_24h.abs()),
                    theme.signed(record.change_24h),
                ),
                Span::raw(record.display_volume()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Min(8),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("💰 Market Data [m]")
            .border_style(theme.border()),
    );
    frame.render_widget(table, area);
}

fn render_risk(frame: &mut Frame, area: Rect, risk: &RiskSnapshot, theme: &Theme) {
    let level = risk.level();
    let leverage_style = if risk.leverage > crate::types::HIGH_LEVERAGE {
        theme.error()
    } else {
        theme.success()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Risk Level: ", theme.muted()),
            Span::styled(level.as_str(), theme.risk_level(level)),
        ]),
        Line::from(vec![
            Span::styled("Unrealized P&L: ", theme.muted()),
            Span::styled(format!("${:.2}", risk.unrealized_pnl), theme.signed(risk.unrealized_pnl)),
        ]),
        Line::from(vec![
            Span::styled("Leverage: ", theme.muted()),
            Span::styled(format!("{:.2}x ", risk.leverage), leverage_style),
            Span::styled(risk.leverage_label(), theme.muted()),
        ]),
        Line::from(vec![
            Span::styled("Margin Ratio: ", theme.muted()),
            Span::styled(
                format!("{:.1}%", risk.margin_ratio * 100.0),
                theme.risk_level(level),
            ),
        ]),
        Line::from(vec![
            Span::styled("VaR 1m / 5m: ", theme.muted()),
            Span::styled(format!("${:.0} / ${:.0}", risk.var_1min, risk.var_5min), theme.error()),
        ]),
        Line::from(vec![
            Span::styled("CVaR: ", theme.muted()),
            Span::styled(format!("${:.0}", risk.cvar), theme.error()),
        ]),
    ];
    if risk.liquidation_risk() {
        lines.push(Line::from(Span::styled("⚠ Liquidation risk", theme.error())));
    }

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("🛡 Risk Metrics [r]")
            .border_style(theme.border()),
    );
    frame.render_widget(block, area);
}

fn position_row<'a>(pos: &Position, theme: &Theme) -> Row<'a> {
    let side = pos.side();
    Row::new(vec![
        Span::raw(pos.symbol.clone()),
        Span::styled(
            format!("{:?}", side).to_uppercase(),
            theme.signed(pos.size),
        ),
        Span::raw(format!("{}", pos.size.abs())),
        Span::raw(format!("{:.2}", pos.mark_price)),
        Span::styled(format!("{:.2}", pos.unrealized_pnl), theme.signed(pos.unrealized_pnl)),
    ])
}

fn render_positions(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let account = &snapshot.account;
    let title = format!(
        "📈 Positions | Available ${:.0} | Total P&L ${:.2}",
        account.available_margin, account.total_unrealized_pnl
    );

    let header = Row::new(vec!["Symbol", "Side", "Size", "Mark", "P&L"]).style(theme.header());
    let rows: Vec<Row> = snapshot
        .positions
        .iter()
        .map(|pos| position_row(pos, theme))
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(8),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border()),
    );
    frame.render_widget(table, area);
}

/// Handle keyboard events for the dashboard.
pub fn handle_event(key: &KeyEvent, snapshot: &DashboardSnapshot) -> Option<Action> {
    match key.code {
        KeyCode::Char('x') => snapshot
            .alerts
            .first()
            .map(|alert| Action::DismissAlert(alert.id.clone())),
        KeyCode::Char('m') => Some(Action::ShowDetails(DetailKind::Market)),
        KeyCode::Char('r') => Some(Action::ShowDetails(DetailKind::Risk)),
        _ => None,
    }
}
