//! Configuration state and the sanitising boundary in front of it.
//!
//! Malformed input is never rejected: balances that do not parse become 0,
//! numeric balances are clamped into the accepted range, refresh rates that
//! do not parse become 2000ms and numeric ones snap to the nearest choice.

use crate::types::{
    ConfigChange, ConfigUpdate, Configuration, RefreshRate, MAX_ACCOUNT_BALANCE,
    MAX_SELECTED_SYMBOLS, MIN_ACCOUNT_BALANCE, UNPARSEABLE_BALANCE,
};
use serde_json::Value;
use tracing::warn;

/// Parse a balance from raw text.
pub fn parse_balance(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => clamp_balance(value),
        _ => {
            warn!("Unparseable account balance {:?}, using {}", raw, UNPARSEABLE_BALANCE);
            UNPARSEABLE_BALANCE
        }
    }
}

/// Clamp a numeric balance into `[1000, 1000000]`.
pub fn clamp_balance(value: f64) -> f64 {
    if !value.is_finite() {
        return UNPARSEABLE_BALANCE;
    }
    let clamped = value.clamp(MIN_ACCOUNT_BALANCE, MAX_ACCOUNT_BALANCE);
    if clamped != value {
        warn!("Account balance {} out of range, clamped to {}", value, clamped);
    }
    clamped
}

/// Parse a refresh rate from raw text.
pub fn parse_refresh_rate(raw: &str) -> RefreshRate {
    match raw.trim().parse::<f64>() {
        Ok(ms) if ms.is_finite() => snap_refresh_rate(ms),
        _ => {
            warn!("Unparseable refresh rate {:?}, using default", raw);
            RefreshRate::default()
        }
    }
}

fn snap_refresh_rate(ms: f64) -> RefreshRate {
    let rounded = ms.max(0.0).round() as u64;
    RefreshRate::from_millis(rounded).unwrap_or_else(|| {
        let snapped = RefreshRate::nearest(rounded);
        warn!("Refresh rate {}ms not supported, using {}", ms, snapped);
        snapped
    })
}

fn balance_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(clamp_balance).unwrap_or(UNPARSEABLE_BALANCE),
        Value::String(s) => parse_balance(s),
        other => {
            warn!("Unparseable account balance {}, using {}", other, UNPARSEABLE_BALANCE);
            UNPARSEABLE_BALANCE
        }
    }
}

fn refresh_rate_from_value(value: &Value) -> RefreshRate {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .map(snap_refresh_rate)
            .unwrap_or_default(),
        Value::String(s) => parse_refresh_rate(s),
        other => {
            warn!("Unparseable refresh rate {}, using default", other);
            RefreshRate::default()
        }
    }
}

/// Normalise one symbol identifier. Empty input yields `None`.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

/// Dedupe, normalise and truncate a symbol list, preserving order.
pub fn sanitize_symbols<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::with_capacity(MAX_SELECTED_SYMBOLS);
    for symbol in raw.iter().filter_map(|s| normalize_symbol(s.as_ref())) {
        if symbols.contains(&symbol) {
            continue;
        }
        if symbols.len() == MAX_SELECTED_SYMBOLS {
            warn!("Symbol selection truncated to {} entries", MAX_SELECTED_SYMBOLS);
            break;
        }
        symbols.push(symbol);
    }
    symbols
}

/// Owner of the live configuration. Only explicit edits mutate it.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationState {
    current: Configuration,
}

impl ConfigurationState {
    /// Wrap a configuration, sanitising it on the way in.
    ///
    /// A zero balance is kept as the unparseable marker; anything else is
    /// clamped like an edit.
    pub fn new(config: Configuration) -> Self {
        let current = Configuration {
            account_balance: if config.account_balance == UNPARSEABLE_BALANCE {
                UNPARSEABLE_BALANCE
            } else {
                clamp_balance(config.account_balance)
            },
            selected_symbols: sanitize_symbols(&config.selected_symbols),
            refresh_rate_ms: config.refresh_rate_ms,
        };
        Self { current }
    }

    pub fn current(&self) -> &Configuration {
        &self.current
    }

    /// Apply a partial edit and report what changed.
    pub fn apply(&mut self, update: &ConfigUpdate) -> ConfigChange {
        let mut change = ConfigChange::default();

        if let Some(raw) = &update.account_balance {
            let balance = balance_from_value(raw);
            if balance != self.current.account_balance {
                self.current.account_balance = balance;
                change.balance = true;
            }
        }

        if let Some(raw) = &update.selected_symbols {
            let symbols = sanitize_symbols(raw);
            if symbols != self.current.selected_symbols {
                self.current.selected_symbols = symbols;
                change.symbols = true;
            }
        }

        if let Some(raw) = &update.refresh_rate_ms {
            let rate = refresh_rate_from_value(raw);
            if rate != self.current.refresh_rate_ms {
                self.current.refresh_rate_ms = rate;
                change.refresh_rate = true;
            }
        }

        change
    }

    /// Check or uncheck a symbol.
    ///
    /// Checking is rejected when the symbol is already selected or four are
    /// selected. Returns whether the selection changed.
    pub fn toggle_symbol(&mut self, symbol: &str, checked: bool) -> bool {
        let Some(symbol) = normalize_symbol(symbol) else {
            return false;
        };
        let symbols = &mut self.current.selected_symbols;

        if checked {
            if symbols.contains(&symbol) || symbols.len() >= MAX_SELECTED_SYMBOLS {
                return false;
            }
            symbols.push(symbol);
            true
        } else {
            let before = symbols.len();
            symbols.retain(|s| *s != symbol);
            symbols.len() != before
        }
    }
}
