//! Displacement detection — cumulative directional body dominance
//! (`spec.md` GLOSSARY, §4.3, §4.6).

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplacementDirection {
    Bullish,
    Bearish,
}

/// A cluster of consecutive candles whose directional body dominates the
/// opposite side by `>= ratio` (default 1.6x). Evaluated over the last
/// `lookback` bars.
pub fn detect_displacement(bars: &[Bar], lookback: usize, ratio: f64) -> Option<DisplacementDirection> {
    if bars.len() < lookback || lookback == 0 {
        return None;
    }
    let window = &bars[bars.len() - lookback..];
    let bull: f64 = window.iter().filter(|b| b.is_bullish()).map(|b| b.body()).sum();
    let bear: f64 = window.iter().filter(|b| !b.is_bullish()).map(|b| b.body()).sum();

    if bear <= f64::EPSILON && bull > 0.0 {
        return Some(DisplacementDirection::Bullish);
    }
    if bull <= f64::EPSILON && bear > 0.0 {
        return Some(DisplacementDirection::Bearish);
    }
    if bull >= bear * ratio {
        return Some(DisplacementDirection::Bullish);
    }
    if bear >= bull * ratio {
        return Some(DisplacementDirection::Bearish);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn dominant_bullish_body_detected() {
        let closes = vec![100.0, 110.0, 120.0, 130.0, 140.0];
        let mut bars = make_bars(&closes);
        // Shrink the one bearish-ish bar's wick influence; all closes rising here
        // so every bar is bullish, guaranteeing dominance.
        for b in bars.iter_mut() {
            b.open = b.open.min(b.close);
        }
        assert_eq!(
            detect_displacement(&bars, 5, 1.6),
            Some(DisplacementDirection::Bullish)
        );
    }

    #[test]
    fn near_balanced_bars_below_ratio_yield_no_displacement() {
        // bodies over the last 5 bars: bull 5, bear 5, bull 5, bear 5, bull 5
        // -> bull=15, bear=10, ratio 1.5 < 1.6 threshold.
        let bars = make_bars(&[100.0, 105.0, 100.0, 105.0, 100.0, 105.0]);
        assert_eq!(detect_displacement(&bars[1..], 5, 1.6), None);
    }

    #[test]
    fn insufficient_bars_is_none() {
        let bars = make_bars(&[1.0, 2.0]);
        assert_eq!(detect_displacement(&bars, 5, 1.6), None);
    }
}
