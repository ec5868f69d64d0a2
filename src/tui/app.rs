//! Main TUI application logic.

use super::{config, dashboard, details, events, logs, LogBuffer, Route, Theme};
use crate::types::{ConfigUpdate, DetailKind};
use crate::AppState;
use crossterm::{
    event::KeyCode,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tracing::info;

/// Something a key press asks the engine or the app to do.
#[derive(Debug, Clone)]
pub enum Action {
    DismissAlert(String),
    ShowDetails(DetailKind),
    ApplyConfig(ConfigUpdate),
    ToggleSymbol { symbol: String, checked: bool },
    ClearLogs,
}

/// Main TUI application.
pub struct App {
    current_route: Route,
    app_state: AppState,
    logs: Arc<LogBuffer>,
    theme: Theme,
    detail_kind: DetailKind,
    /// Feedback for the last action, shown in the status bar.
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(app_state: AppState, logs: Arc<LogBuffer>) -> Self {
        Self {
            current_route: Route::Dashboard,
            app_state,
            logs,
            theme: Theme::default(),
            detail_kind: DetailKind::Market,
            status: None,
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.current_route
    }

    pub fn detail_kind(&self) -> DetailKind {
        self.detail_kind
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Handle an event, returning the action it maps to.
    pub fn handle_event(&mut self, event: events::Event) -> Option<Action> {
        let events::Event::Key(key) = event else {
            return None;
        };

        if events::is_quit(&key) {
            self.should_quit = true;
            return None;
        }

        for route in Route::all() {
            if events::is_key(&key, KeyCode::Char(route.key())) {
                self.current_route = route;
                return None;
            }
        }

        match self.current_route {
            Route::Dashboard => dashboard::handle_event(&key, &self.app_state.engine.snapshot()),
            Route::Config => config::handle_event(&key, &self.app_state.engine.config()),
            Route::Details => details::handle_event(&key),
            Route::Logs => logs::handle_event(&key),
        }
    }

    /// Carry out an action against the engine.
    pub async fn perform(&mut self, action: Action) {
        let engine = &self.app_state.engine;
        self.status = match action {
            Action::DismissAlert(id) => {
                engine.dismiss_alert(&id);
                Some("Alert dismissed".to_string())
            }
            Action::ShowDetails(kind) => {
                self.detail_kind = kind;
                self.current_route = Route::Details;
                None
            }
            Action::ApplyConfig(update) => {
                let config = engine.apply_config(&update).await;
                Some(format!(
                    "Balance ${:.0}, refresh {}",
                    config.account_balance,
                    config.refresh_rate_ms.label()
                ))
            }
            Action::ToggleSymbol { symbol, checked } => {
                if engine.toggle_symbol(&symbol, checked).await {
                    let verb = if checked { "Added" } else { "Removed" };
                    Some(format!("{} {}", verb, symbol))
                } else {
                    Some(format!("Cannot add {}: selection is full", symbol))
                }
            }
            Action::ClearLogs => {
                self.logs.clear();
                None
            }
        };
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        let engine = &self.app_state.engine;
        match self.current_route {
            Route::Dashboard => {
                dashboard::render(frame, chunks[1], &engine.snapshot(), &self.theme)
            }
            Route::Config => config::render(frame, chunks[1], &engine.config(), &self.theme),
            Route::Details => details::render(
                frame,
                chunks[1],
                &engine.request_details(self.detail_kind),
                &self.theme,
            ),
            Route::Logs => logs::render(frame, chunks[1], &self.logs, &self.theme),
        }

        self.render_status_bar(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let routes = Route::all();
        let titles: Vec<Line> = routes
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", r.key()), self.theme.muted()),
                    Span::raw(r.name()),
                ])
            })
            .collect();

        let selected = routes
            .iter()
            .position(|r| *r == self.current_route)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Navigation"))
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Riskboard", self.theme.title()),
            Span::raw(" | "),
            Span::styled("q", self.theme.muted()),
            Span::raw(" or "),
            Span::styled("Ctrl+C", self.theme.muted()),
            Span::raw(" to quit | "),
            Span::styled("1-4", self.theme.muted()),
            Span::raw(" to switch views"),
        ];
        if let Some(status) = &self.status {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(status.clone(), self.theme.info()));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());
        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(Line::from(spans), inner);
    }
}

/// Run the TUI until the user quits.
pub async fn run_tui(app_state: AppState, logs: Arc<LogBuffer>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_state, logs);
    let mut event_handler = events::EventHandler::new(Duration::from_millis(250));

    loop {
        terminal.draw(|f| app.render(f))?;

        if let Some(event) = event_handler.next().await {
            if let Some(action) = app.handle_event(event) {
                app.perform(action).await;
            }
        }

        if app.should_quit() {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("Terminal UI closed");

    Ok(())
}
