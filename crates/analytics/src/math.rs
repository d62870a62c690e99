//! Windowed price arithmetic shared by the metric engine.
//!
//! Every function takes adjusted closes in chronological order (oldest first).

use rust_decimal::prelude::*;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a percentage to 2 decimal places, halves away from zero.
pub fn round_pct(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unrounded percentage change from `reference` to `current`.
///
/// A zero reference yields zero instead of a division fault.
pub fn pct_change(current: Decimal, reference: Decimal) -> Decimal {
    if reference.is_zero() {
        return Decimal::ZERO;
    }
    (current - reference) / reference * HUNDRED
}

/// Percentage return over the last `days` bars, rounded.
///
/// Zero when fewer than `days + 1` closes exist.
pub fn trailing_return(closes: &[Decimal], days: usize) -> Decimal {
    if closes.len() < days + 1 {
        return Decimal::ZERO;
    }
    let current = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - days];
    round_pct(pct_change(current, past))
}

/// Mean of the most recent `period` closes, or `None` when the history is shorter.
pub fn sma(closes: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    let sum: Decimal = window.iter().sum();
    Some(sum / Decimal::from(period))
}

/// Rounded distance of the latest close from the maximum of the last `window` closes.
pub fn pct_from_high(closes: &[Decimal], window: usize) -> Decimal {
    let Some(&current) = closes.last() else {
        return Decimal::ZERO;
    };
    let start = closes.len().saturating_sub(window);
    let high = closes[start..]
        .iter()
        .copied()
        .fold(current, Decimal::max);
    round_pct(pct_change(current, high))
}
