use super::{AccountSummary, Alert, Configuration, Position, PriceRecord, RiskLevel, RiskSnapshot};
use serde::{Deserialize, Serialize};

/// Everything a surface needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub config: Configuration,
    pub prices: Vec<PriceRecord>,
    pub positions: Vec<Position>,
    pub account: AccountSummary,
    pub risk: RiskSnapshot,
    pub risk_level: RiskLevel,
    pub alerts: Vec<Alert>,
    pub connected: bool,
    /// Header clock, milliseconds since epoch.
    pub last_update: i64,
}

/// Incremental change published by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardUpdate {
    Prices {
        data: Vec<PriceRecord>,
    },
    Positions {
        data: Vec<Position>,
        account: AccountSummary,
    },
    Risk {
        data: RiskSnapshot,
        level: RiskLevel,
    },
    Alerts {
        data: Vec<Alert>,
    },
    Config {
        data: Configuration,
    },
    Connection {
        connected: bool,
    },
    Heartbeat {
        timestamp: i64,
    },
}
