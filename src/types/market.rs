use serde::{Deserialize, Serialize};

/// Price used for symbols missing from the base table.
pub const FALLBACK_BASE_PRICE: f64 = 100.0;

/// Selectable trading pairs and their seed prices.
pub const SYMBOL_BASE_PRICES: [(&str, f64); 10] = [
    ("BTCUSDT", 43250.50),
    ("ETHUSDT", 2890.25),
    ("SOLUSDT", 125.80),
    ("ADAUSDT", 0.6520),
    ("BNBUSDT", 315.75),
    ("XRPUSDT", 0.5234),
    ("DOGEUSDT", 0.0823),
    ("AVAXUSDT", 36.42),
    ("MATICUSDT", 0.8945),
    ("LINKUSDT", 14.67),
];

/// Symbols offered by the configuration panel, in display order.
pub fn available_symbols() -> impl Iterator<Item = &'static str> {
    SYMBOL_BASE_PRICES.iter().map(|(symbol, _)| *symbol)
}

/// Seed price for a symbol, falling back to 100 for unknown symbols.
pub fn base_price(symbol: &str) -> f64 {
    SYMBOL_BASE_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, price)| *price)
        .unwrap_or(FALLBACK_BASE_PRICE)
}

/// Live market record for one selected symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub symbol: String,
    pub price: f64,
    /// Signed percentage.
    pub change_24h: f64,
    pub volume: f64,
    /// Milliseconds since epoch.
    pub last_update: i64,
}

impl PriceRecord {
    /// Price formatted with 2 decimals above 100, 4 otherwise.
    pub fn display_price(&self) -> String {
        if self.price > 100.0 {
            format!("{:.2}", self.price)
        } else {
            format!("{:.4}", self.price)
        }
    }

    /// Volume in thousands, e.g. `"734K"`.
    pub fn display_volume(&self) -> String {
        format!("{:.0}K", self.volume / 1000.0)
    }

    pub fn is_up(&self) -> bool {
        self.change_24h >= 0.0
    }
}
