//! Swing high/low detection (`spec.md` §4.1).
//!
//! A swing high/low is a bar that strictly exceeds its N-bar neighborhood
//! on each side. N is configurable, default 5-10.

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub bar_index: usize,
    pub price: f64,
}

/// Bars whose high strictly exceeds every bar within `neighborhood` positions
/// on both sides.
pub fn swing_highs(bars: &[Bar], neighborhood: usize) -> Vec<SwingPoint> {
    swing_points(bars, neighborhood, true)
}

/// Bars whose low strictly undercuts every bar within `neighborhood`
/// positions on both sides.
pub fn swing_lows(bars: &[Bar], neighborhood: usize) -> Vec<SwingPoint> {
    swing_points(bars, neighborhood, false)
}

fn swing_points(bars: &[Bar], neighborhood: usize, highs: bool) -> Vec<SwingPoint> {
    let n = bars.len();
    if neighborhood == 0 || n < 2 * neighborhood + 1 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for i in neighborhood..(n - neighborhood) {
        let candidate = if highs { bars[i].high } else { bars[i].low };
        let is_extreme = (i - neighborhood..i)
            .chain(i + 1..=i + neighborhood)
            .all(|j| {
                let other = if highs { bars[j].high } else { bars[j].low };
                if highs {
                    candidate > other
                } else {
                    candidate < other
                }
            });
        if is_extreme {
            out.push(SwingPoint {
                bar_index: i,
                price: candidate,
            });
        }
    }
    out
}

/// Last 20-bar swing extreme: the highest swing high (for BULLISH SL
/// calculation context) or lowest swing low (BEARISH), falling back to the
/// raw window extreme if no qualifying swing point exists within it
/// (`spec.md` §4.5).
pub fn last_20_bar_swing_high(bars: &[Bar], neighborhood: usize) -> f64 {
    let window_start = bars.len().saturating_sub(20);
    let window = &bars[window_start..];
    let swings = swing_highs(window, neighborhood);
    swings
        .iter()
        .map(|s| s.price)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or_else(|| window.iter().map(|b| b.high).fold(f64::MIN, f64::max))
}

pub fn last_20_bar_swing_low(bars: &[Bar], neighborhood: usize) -> f64 {
    let window_start = bars.len().saturating_sub(20);
    let window = &bars[window_start..];
    let swings = swing_lows(window, neighborhood);
    swings
        .iter()
        .map(|s| s.price)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
        .unwrap_or_else(|| window.iter().map(|b| b.low).fold(f64::MAX, f64::min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn detects_a_clean_swing_high() {
        // 0..4 rising, peak at 5, then falling — with neighborhood 2 the peak
        // at index 5 strictly exceeds its 2-bar neighborhood both sides.
        let closes = vec![100.0, 101.0, 102.0, 103.0, 104.0, 110.0, 104.0, 103.0, 102.0, 101.0];
        let bars = make_bars(&closes);
        let highs = swing_highs(&bars, 2);
        assert!(highs.iter().any(|s| s.bar_index == 5));
    }

    #[test]
    fn too_few_bars_yields_no_swings() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(swing_highs(&bars, 5).is_empty());
    }

    #[test]
    fn swing_low_window_falls_back_to_raw_extreme_when_no_swing_found() {
        // Monotonically falling bars never produce an interior swing low
        // within the neighborhood test, so the fallback to raw window min applies.
        let closes: Vec<f64> = (0..20).rev().map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let lo = last_20_bar_swing_low(&bars, 5);
        let raw_min = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        assert_eq!(lo, raw_min);
    }
}
