//! Take-profit engine Layer A (`spec.md` §4.6): three TPs as R-multiples,
//! with the multiplier set chosen by timeframe class.

use crate::config::TpMinimumRr;
use crate::domain::timeframe::{MEDIUM_LONG_TFS, SHORT_TERM_TFS};
use crate::domain::Bias;

const SHORT_TERM_MULTIPLIERS: [f64; 3] = [1.0, 3.0, 5.0];
const MEDIUM_LONG_MULTIPLIERS: [f64; 3] = [2.0, 4.0, 6.0];

fn multipliers_for(timeframe: &str) -> [f64; 3] {
    if SHORT_TERM_TFS.contains(&timeframe) {
        SHORT_TERM_MULTIPLIERS
    } else if MEDIUM_LONG_TFS.contains(&timeframe) {
        MEDIUM_LONG_MULTIPLIERS
    } else {
        // Unknown timeframe defaults conservative (`spec.md` §4.6).
        MEDIUM_LONG_MULTIPLIERS
    }
}

/// Mathematical TP anchors: `entry +/- multiplier * R` where
/// `R = |entry - sl|`, ordered monotonically in the trade direction.
pub fn mathematical_tps(entry_price: f64, sl_price: f64, bias: Bias, timeframe: &str) -> [f64; 3] {
    let r = (entry_price - sl_price).abs();
    let mults = multipliers_for(timeframe);
    match bias {
        Bias::Bullish => [
            entry_price + mults[0] * r,
            entry_price + mults[1] * r,
            entry_price + mults[2] * r,
        ],
        _ => [
            entry_price - mults[0] * r,
            entry_price - mults[1] * r,
            entry_price - mults[2] * r,
        ],
    }
}

/// R:R of a TP against the risk `R`.
pub fn rr_of(tp: f64, entry_price: f64, r: f64) -> f64 {
    if r <= 0.0 {
        return 0.0;
    }
    (tp - entry_price).abs() / r
}

/// Per-TP minimum R:R floor lookup by index (TP1/TP2/TP3).
pub fn minimum_rr_for(index: usize, floors: &TpMinimumRr) -> f64 {
    match index {
        0 => floors.tp1,
        1 => floors.tp2,
        _ => floors.tp3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_term_uses_1_3_5_multipliers() {
        let tps = mathematical_tps(100.0, 98.0, Bias::Bullish, "1h");
        assert_eq!(tps, [102.0, 106.0, 110.0]);
    }

    #[test]
    fn medium_long_uses_2_4_6_multipliers() {
        let tps = mathematical_tps(100.0, 98.0, Bias::Bullish, "4h");
        assert_eq!(tps, [104.0, 108.0, 112.0]);
    }

    #[test]
    fn bearish_tps_decrease_from_entry() {
        let tps = mathematical_tps(100.0, 102.0, Bias::Bearish, "1h");
        assert_eq!(tps, [98.0, 94.0, 90.0]);
    }

    #[test]
    fn unknown_timeframe_defaults_conservative() {
        let tps = mathematical_tps(100.0, 98.0, Bias::Bullish, "7h");
        assert_eq!(tps, [104.0, 108.0, 112.0]);
    }
}
