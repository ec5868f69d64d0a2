//! Synthetic price feed.
//!
//! One record per selected symbol, seeded from the base-price table and
//! nudged on every refresh tick. Prices are not floored, so a very long run
//! can drift toward implausible values.

use super::random::RandomSource;
use crate::types::{base_price, PriceRecord};

/// Relative price draw, doubled on apply for a ±0.2% move per tick.
const PRICE_DRAW: f64 = 0.001;
/// Maximum change-percentage move per tick.
const CHANGE_STEP: f64 = 0.25;
/// Initial 24h change range (±5%).
const INITIAL_CHANGE_RANGE: f64 = 5.0;
const MIN_VOLUME: f64 = 200_000.0;
const MAX_VOLUME: f64 = 1_200_000.0;

/// Build a fresh record set for `symbols`.
pub fn initialize<S: AsRef<str>>(symbols: &[S], rng: &mut dyn RandomSource, now: i64) -> Vec<PriceRecord> {
    symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            PriceRecord {
                symbol: symbol.to_string(),
                price: base_price(symbol),
                change_24h: rng.symmetric(INITIAL_CHANGE_RANGE),
                volume: rng.uniform(MIN_VOLUME, MAX_VOLUME),
                last_update: now,
            }
        })
        .collect()
}

/// Advance every record by one tick.
pub fn tick(records: &[PriceRecord], rng: &mut dyn RandomSource, now: i64) -> Vec<PriceRecord> {
    records
        .iter()
        .map(|record| {
            let price = record.price + record.price * rng.symmetric(PRICE_DRAW) * 2.0;
            let change_24h = record.change_24h + rng.symmetric(CHANGE_STEP);
            PriceRecord {
                symbol: record.symbol.clone(),
                price,
                change_24h,
                volume: record.volume,
                last_update: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::{SeededSource, SequenceSource};

    #[test]
    fn test_initialize_uses_base_prices() {
        let mut rng = SequenceSource::constant(0.5);
        let records = initialize(&["BTCUSDT", "FOOUSDT"], &mut rng, 1_000);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].price, 43250.50);
        assert_eq!(records[1].price, 100.0);
        assert_eq!(records[0].change_24h, 0.0);
        assert_eq!(records[0].volume, 700_000.0);
        assert_eq!(records[1].last_update, 1_000);
    }

    #[test]
    fn test_initialize_ranges() {
        let mut rng = SeededSource::from_seed(3);
        let symbols: Vec<String> = (0..50).map(|i| format!("SYM{}", i)).collect();
        for record in initialize(&symbols, &mut rng, 0) {
            assert!((-5.0..=5.0).contains(&record.change_24h));
            assert!((MIN_VOLUME..=MAX_VOLUME).contains(&record.volume));
        }
    }

    #[test]
    fn test_tick_extremes() {
        let mut init = SequenceSource::constant(0.5);
        let records = initialize(&["SOLUSDT"], &mut init, 0);

        let mut low = SequenceSource::constant(0.0);
        let down = tick(&records, &mut low, 5);
        assert!((down[0].price - 125.80 * 0.998).abs() < 1e-9);
        assert_eq!(down[0].change_24h, -0.25);
        assert_eq!(down[0].volume, records[0].volume);
        assert_eq!(down[0].last_update, 5);
    }

    #[test]
    fn test_tick_keeps_symbol_set() {
        let mut rng = SeededSource::from_seed(11);
        let mut records = initialize(&["BTCUSDT", "ETHUSDT", "XRPUSDT"], &mut rng, 0);
        for step in 1..=100 {
            records = tick(&records, &mut rng, step);
        }
        let symbols: Vec<_> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT", "XRPUSDT"]);
    }
}
