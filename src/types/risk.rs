use serde::{Deserialize, Serialize};
use std::fmt;

/// Margin ratio above which liquidation is considered likely.
pub const LIQUIDATION_MARGIN_RATIO: f64 = 0.8;

/// Leverage above which the dashboard flags it as high.
pub const HIGH_LEVERAGE: f64 = 5.0;

/// Point-in-time risk figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSnapshot {
    #[serde(rename = "unrealizedPnL")]
    pub unrealized_pnl: f64,
    pub leverage: f64,
    pub margin_ratio: f64,
    pub var_1min: f64,
    pub var_5min: f64,
    pub cvar: f64,
}

impl RiskSnapshot {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::classify(self.margin_ratio)
    }

    pub fn leverage_label(&self) -> &'static str {
        if self.leverage > HIGH_LEVERAGE {
            "High leverage"
        } else {
            "Moderate"
        }
    }

    pub fn liquidation_risk(&self) -> bool {
        self.margin_ratio > LIQUIDATION_MARGIN_RATIO
    }
}

/// Coarse risk classification driven by margin ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `> 0.5` is high, `> 0.25` is medium, everything else low.
    pub fn classify(margin_ratio: f64) -> Self {
        if margin_ratio > 0.5 {
            Self::High
        } else if margin_ratio > 0.25 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
