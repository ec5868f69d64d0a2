//! Riskboard - synthetic trading-risk dashboard engine

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod tui;
pub mod types;
pub mod websocket;

use config::Config;
use services::DashboardEngine;
use std::sync::Arc;

/// Application state shared across handlers and the terminal UI.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<DashboardEngine>,
}

impl AppState {
    pub fn new(config: Arc<Config>, engine: Arc<DashboardEngine>) -> Self {
        Self { config, engine }
    }
}
