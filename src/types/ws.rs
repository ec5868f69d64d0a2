use super::{ConfigUpdate, DashboardSnapshot, DashboardUpdate, DetailKind, DetailReport};
use serde::{Deserialize, Serialize};

/// Incoming WebSocket message from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Partial configuration edit
    SetConfig {
        #[serde(flatten)]
        update: ConfigUpdate,
    },
    /// Check or uncheck one symbol in the selection
    ToggleSymbol {
        symbol: String,
        checked: bool,
    },
    DismissAlert {
        id: String,
    },
    RequestDetails {
        kind: DetailKind,
    },
}

/// Outgoing WebSocket message to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full state, sent once on connect
    Snapshot {
        data: Box<DashboardSnapshot>,
    },
    /// Engine change, forwarded as-is
    Update {
        data: DashboardUpdate,
    },
    Details {
        data: DetailReport,
    },
    AlertDismissed {
        id: String,
        removed: bool,
    },
    Error {
        error: String,
    },
}
