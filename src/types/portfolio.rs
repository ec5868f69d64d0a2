use serde::{Deserialize, Serialize};

/// Fraction of notional reserved as margin.
pub const MARGIN_RATE: f64 = 0.1;

/// Direction of a position, derived from the sign of its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

/// Synthetic open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    /// Signed size; positive is long.
    pub size: f64,
    pub entry_price: f64,
    pub mark_price: f64,
    #[serde(rename = "unrealizedPnL")]
    pub unrealized_pnl: f64,
    pub margin_used: f64,
}

impl Position {
    /// Open a position, deriving P&L and margin from the prices.
    pub fn open(symbol: impl Into<String>, size: f64, entry_price: f64, mark_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            size,
            entry_price,
            mark_price,
            unrealized_pnl: (mark_price - entry_price) * size,
            margin_used: (size * mark_price).abs() * MARGIN_RATE,
        }
    }

    /// Move the mark price; margin stays at its opening value.
    pub fn marked_to(&self, mark_price: f64) -> Self {
        Self {
            mark_price,
            unrealized_pnl: (mark_price - self.entry_price) * self.size,
            ..self.clone()
        }
    }

    pub fn side(&self) -> PositionSide {
        if self.size > 0.0 {
            PositionSide::Long
        } else {
            PositionSide::Short
        }
    }
}

/// Account-level figures shown next to the position list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub balance: f64,
    pub available_margin: f64,
    #[serde(rename = "totalUnrealizedPnL")]
    pub total_unrealized_pnl: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_open_derives_pnl_and_margin() {
        let pos = Position::open("ETHUSDT", -2.0, 2900.0, 2910.0);
        assert_eq!(pos.unrealized_pnl, -20.0);
        assert!((pos.margin_used - 582.0).abs() < 1e-9);
        assert_eq!(pos.side(), PositionSide::Short);
    }

    #[test]
    fn test_marked_to_keeps_margin() {
        let pos = Position::open("BTCUSDT", 0.5, 43000.0, 43000.0);
        let moved = pos.marked_to(43100.0);
        assert_eq!(moved.unrealized_pnl, 50.0);
        assert_eq!(moved.margin_used, pos.margin_used);
        assert_eq!(moved.entry_price, pos.entry_price);
    }

    #[test]
    fn test_position_serialization_field_names() {
        let pos = Position::open("SOLUSDT", 50.0, 126.0, 127.0);
        let json = serde_json::to_string(&pos).unwrap();
        assert!(json.contains("\"entryPrice\":126.0"));
        assert!(json.contains("\"unrealizedPnL\":50.0"));
        assert!(json.contains("\"marginUsed\""));
    }
}
