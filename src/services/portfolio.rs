//! Synthetic positions and the account summary next to them.

use super::random::RandomSource;
use super::walk::{balance_share, MetricWalk};
use crate::types::{AccountSummary, Position};

/// Only the first three selected symbols carry a position.
pub const MAX_POSITIONS: usize = 3;

/// Sizes by slot: long-small, short, long-large.
const SIZE_PATTERN: [f64; MAX_POSITIONS] = [0.5, -2.0, 50.0];

/// Mark price draw, doubled on apply for a ±0.1% move per tick.
const MARK_DRAW: f64 = 0.0005;

/// Share of balance available as margin, in basis points.
const AVAILABLE_MARGIN_BPS: f64 = 7_500.0;

/// Total unrealized P&L starts at 5% of balance and drifts ±0.1% per tick.
pub const TOTAL_PNL_WALK: MetricWalk = MetricWalk::proportional(500.0, 10.0);

/// Base price by symbol family.
pub fn family_price(symbol: &str) -> f64 {
    if symbol.contains("BTC") {
        43_000.0
    } else if symbol.contains("ETH") {
        2_900.0
    } else if symbol.contains("SOL") {
        126.0
    } else if symbol.contains("ADA") {
        0.65
    } else {
        100.0
    }
}

/// Open the synthetic positions for the current selection.
pub fn initialize<S: AsRef<str>>(symbols: &[S], rng: &mut dyn RandomSource) -> Vec<Position> {
    symbols
        .iter()
        .take(MAX_POSITIONS)
        .zip(SIZE_PATTERN)
        .map(|(symbol, size)| {
            let symbol = symbol.as_ref();
            let base = family_price(symbol);
            let entry_price = base * rng.uniform(0.98, 1.02);
            let mark_price = base * rng.uniform(0.99, 1.01);
            Position::open(symbol, size, entry_price, mark_price)
        })
        .collect()
}

/// Move every mark price by one tick.
pub fn revalue(positions: &[Position], rng: &mut dyn RandomSource) -> Vec<Position> {
    positions
        .iter()
        .map(|pos| {
            let mark_price = pos.mark_price + pos.mark_price * rng.symmetric(MARK_DRAW) * 2.0;
            pos.marked_to(mark_price)
        })
        .collect()
}

/// Account summary right after a balance change.
pub fn anchor_account(balance: f64) -> AccountSummary {
    AccountSummary {
        balance,
        available_margin: balance_share(balance, AVAILABLE_MARGIN_BPS),
        total_unrealized_pnl: TOTAL_PNL_WALK.anchor(balance),
    }
}

/// Drift the account's total P&L by one tick.
pub fn step_account(prev: &AccountSummary, rng: &mut dyn RandomSource) -> AccountSummary {
    AccountSummary {
        total_unrealized_pnl: TOTAL_PNL_WALK.step(prev.total_unrealized_pnl, prev.balance, rng),
        ..*prev
    }
}
