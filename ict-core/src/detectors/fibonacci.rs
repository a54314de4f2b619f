//! Fibonacci retracement/extension overlay producing the Optimal Trade
//! Entry (OTE) zone, 0.62-0.79 retracement of the measured swing
//! (`spec.md` GLOSSARY, §4.2). Best-effort: returns `None` rather than an
//! error when no qualifying swing exists, since this overlay "continues
//! with empties" on failure (`spec.md` §5, stage 6). Grounded on
//! `examples/original_source/fibonacci_analyzer.py`'s
//! `_calculate_ote_zone`/`_calculate_extensions`.

use crate::domain::{Bar, Bias, FibonacciData};
use crate::indicators::swings::{last_20_bar_swing_high, last_20_bar_swing_low};

const OTE_LOW: f64 = 0.62;
const OTE_HIGH: f64 = 0.79;
const EXT_1272: f64 = 1.272;
const EXT_1618: f64 = 1.618;
const SWING_NEIGHBORHOOD: usize = 5;

/// Measure the last-20-bar swing and compute the OTE band plus the 1.272
/// and 1.618 extensions, oriented by the current directional bias.
pub fn detect(bars: &[Bar], bias: Bias) -> Option<FibonacciData> {
    if bars.len() < 20 {
        return None;
    }

    let swing_high = last_20_bar_swing_high(bars, SWING_NEIGHBORHOOD);
    let swing_low = last_20_bar_swing_low(bars, SWING_NEIGHBORHOOD);
    let range = swing_high - swing_low;
    if range <= 0.0 {
        return None;
    }

    let (ote_low, ote_high, extension_1272, extension_1618) = match bias {
        Bias::Bullish => (
            swing_high - range * OTE_HIGH,
            swing_high - range * OTE_LOW,
            swing_high - range * EXT_1272,
            swing_high - range * EXT_1618,
        ),
        _ => (
            swing_low + range * OTE_LOW,
            swing_low + range * OTE_HIGH,
            swing_low + range * EXT_1272,
            swing_low + range * EXT_1618,
        ),
    };

    Some(FibonacciData {
        swing_low,
        swing_high,
        ote_low,
        ote_high,
        extension_1272,
        extension_1618,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn too_few_bars_returns_none() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(detect(&bars, Bias::Bullish).is_none());
    }

    #[test]
    fn bullish_ote_sits_below_swing_high() {
        let closes = vec![
            100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 110.0, 104.0, 103.0, 102.0, 101.0, 100.0,
            99.0, 98.0, 97.0, 96.0, 95.0, 94.0, 93.0, 92.0, 91.0, 90.0, 94.0, 96.0,
        ];
        let bars = make_bars(&closes);
        let fib = detect(&bars, Bias::Bullish).unwrap();
        assert!(fib.ote_low < fib.swing_high);
        assert!(fib.ote_high <= fib.swing_high);
        assert!(fib.ote_low < fib.ote_high);
    }
}
