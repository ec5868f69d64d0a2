use crate::services::configuration::{parse_balance, parse_refresh_rate, sanitize_symbols};
use crate::types::{Configuration, RefreshRate, DEFAULT_ACCOUNT_BALANCE, DEFAULT_SYMBOLS};
use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Starting account balance.
    pub account_balance: f64,
    /// Starting symbol selection.
    pub symbols: Vec<String>,
    /// Starting price refresh cadence.
    pub refresh_rate: RefreshRate,
    /// Seed for reproducible runs; entropy when unset.
    pub rng_seed: Option<u64>,
    /// Serve the HTTP/WebSocket API.
    pub api_enabled: bool,
    /// Run the terminal dashboard.
    pub tui_enabled: bool,
}

fn flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let symbols = lookup("SYMBOLS")
            .map(|s| sanitize_symbols(&s.split(',').collect::<Vec<_>>()))
            .unwrap_or_else(|| DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect());

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            account_balance: lookup("ACCOUNT_BALANCE")
                .map(|v| parse_balance(&v))
                .unwrap_or(DEFAULT_ACCOUNT_BALANCE),
            symbols,
            refresh_rate: lookup("REFRESH_RATE_MS")
                .map(|v| parse_refresh_rate(&v))
                .unwrap_or_default(),
            rng_seed: lookup("RNG_SEED").and_then(|v| v.trim().parse().ok()),
            api_enabled: flag(lookup("API_ENABLED"), true),
            tui_enabled: flag(lookup("TUI_ENABLED"), true),
        }
    }

    /// Engine configuration at startup.
    pub fn dashboard(&self) -> Configuration {
        Configuration {
            account_balance: self.account_balance,
            selected_symbols: self.symbols.clone(),
            refresh_rate_ms: self.refresh_rate,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_config_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3002);
        assert_eq!(config.account_balance, 25_000.0);
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT", "SOLUSDT", "ADAUSDT"]);
        assert_eq!(config.refresh_rate, RefreshRate::TwoSeconds);
        assert!(config.rng_seed.is_none());
        assert!(config.api_enabled);
        assert!(config.tui_enabled);
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn test_config_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("ACCOUNT_BALANCE", "50000"),
            ("SYMBOLS", "xrpusdt, dogeusdt"),
            ("REFRESH_RATE_MS", "5000"),
            ("RNG_SEED", "42"),
            ("API_ENABLED", "false"),
            ("TUI_ENABLED", "0"),
        ]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.account_balance, 50_000.0);
        assert_eq!(config.symbols, vec!["XRPUSDT", "DOGEUSDT"]);
        assert_eq!(config.refresh_rate, RefreshRate::FiveSeconds);
        assert_eq!(config.rng_seed, Some(42));
        assert!(!config.api_enabled);
        assert!(!config.tui_enabled);
    }

    #[test]
    fn test_config_sanitises_bad_values() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("ACCOUNT_BALANCE", "lots"),
            ("REFRESH_RATE_MS", "often"),
            ("RNG_SEED", "-1"),
        ]);

        assert_eq!(config.port, 3002);
        assert_eq!(config.account_balance, 0.0);
        assert_eq!(config.refresh_rate, RefreshRate::TwoSeconds);
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_dashboard_configuration() {
        let config = config_from(&[("ACCOUNT_BALANCE", "2000000")]);
        let dashboard = config.dashboard();
        assert_eq!(dashboard.account_balance, 1_000_000.0);
        assert_eq!(dashboard.selected_symbols.len(), 4);
    }
}
