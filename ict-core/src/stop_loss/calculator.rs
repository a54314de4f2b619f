//! Stop-loss candidate calculation (`spec.md` §4.5 step 1): the worse of
//! {zone boundary, last-20-bar swing extreme}, each buffered by 1.5×ATR,
//! with a minimum 3% entry-to-SL distance enforced.

use crate::domain::{Bar, Bias};
use crate::indicators::atr::atr;
use crate::indicators::swings::{last_20_bar_swing_high, last_20_bar_swing_low};

const ATR_MULTIPLIER: f64 = 1.5;
const ATR_PERIOD: usize = 14;
const MIN_ENTRY_TO_SL_DISTANCE_PCT: f64 = 3.0;
const SWING_NEIGHBORHOOD: usize = 5;

/// Compute the SL candidate for a BULLISH (`entry_zone_low`) or BEARISH
/// (`entry_zone_high`) trade, given the chosen zone's boundary nearest the
/// stop side.
pub fn compute(bars: &[Bar], bias: Bias, entry_price: f64, zone_boundary: f64) -> f64 {
    let atr_value = atr(bars, ATR_PERIOD).unwrap_or(0.0);
    let buffer = atr_value * ATR_MULTIPLIER;

    let candidate = match bias {
        Bias::Bullish => {
            let swing_extreme = last_20_bar_swing_low(bars, SWING_NEIGHBORHOOD);
            (zone_boundary - buffer).min(swing_extreme - buffer)
        }
        _ => {
            let swing_extreme = last_20_bar_swing_high(bars, SWING_NEIGHBORHOOD);
            (zone_boundary + buffer).max(swing_extreme + buffer)
        }
    };

    enforce_minimum_distance(bias, entry_price, candidate)
}

fn enforce_minimum_distance(bias: Bias, entry_price: f64, candidate: f64) -> f64 {
    let min_distance = entry_price * MIN_ENTRY_TO_SL_DISTANCE_PCT / 100.0;
    match bias {
        Bias::Bullish => {
            let floor = entry_price - min_distance;
            candidate.min(floor)
        }
        _ => {
            let ceiling = entry_price + min_distance;
            candidate.max(ceiling)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn bullish_sl_sits_below_entry_by_at_least_3pct() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let bars = make_bars(&closes);
        let sl = compute(&bars, Bias::Bullish, 100.0, 99.0);
        assert!(sl <= 97.0);
    }

    #[test]
    fn bearish_sl_sits_above_entry_by_at_least_3pct() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let bars = make_bars(&closes);
        let sl = compute(&bars, Bias::Bearish, 100.0, 101.0);
        assert!(sl >= 103.0);
    }
}
