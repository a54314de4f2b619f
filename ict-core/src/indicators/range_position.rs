//! Price-range position — replaces Bollinger-band position (`spec.md` §4.1).
//!
//! `(price - low20) / (high20 - low20)`. Bollinger bands are explicitly
//! forbidden for signal-influencing decisions.

use crate::domain::Bar;

/// Position of `price` within the trailing `window`-bar high/low range,
/// in `[0.0, 1.0]` (clamped). `None` if fewer than `window` bars exist or
/// the range is degenerate (high == low).
pub fn range_position(bars: &[Bar], window: usize, price: f64) -> Option<f64> {
    if bars.len() < window || window == 0 {
        return None;
    }
    let slice = &bars[bars.len() - window..];
    let low = slice.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let high = slice.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    if (high - low).abs() < f64::EPSILON {
        return None;
    }
    Some(((price - low) / (high - low)).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn midpoint_is_half() {
        let bars = make_bars(&(0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let mid = (low + high) / 2.0;
        let pos = range_position(&bars, 20, mid).unwrap();
        assert!((pos - 0.5).abs() < 0.05);
    }

    #[test]
    fn clamps_outside_range() {
        let bars = make_bars(&(0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        assert_eq!(range_position(&bars, 20, -1000.0), Some(0.0));
        assert_eq!(range_position(&bars, 20, 1_000_000.0), Some(1.0));
    }
}
