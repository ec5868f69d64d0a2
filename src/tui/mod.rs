//! Terminal UI for watching the dashboard in real-time.

mod app;
mod config;
mod dashboard;
mod details;
mod events;
mod logs;
mod state;
mod theme;

pub use app::{run_tui, Action, App};
pub use events::Event;
pub use state::{LogBuffer, LogMakeWriter};
pub use theme::Theme;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Config,
    Details,
    Logs,
}

impl Route {
    /// Get all available routes.
    pub fn all() -> Vec<Self> {
        vec![Self::Dashboard, Self::Config, Self::Details, Self::Logs]
    }

    /// Get the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Config => "Config",
            Self::Details => "Details",
            Self::Logs => "Logs",
        }
    }

    /// Get the route shortcut key.
    pub fn key(&self) -> char {
        match self {
            Self::Dashboard => '1',
            Self::Config => '2',
            Self::Details => '3',
            Self::Logs => '4',
        }
    }
}
