//! Per-timeframe bias computer (`spec.md` §4.3): structure + order-block
//! asymmetry + recent displacement, exclusively — no moving averages.
//! Grounded on `examples/original_source/mtf_analyzer.py`'s
//! `_determine_bias` (HH+HL / LH+LL over the last two swings) extended with
//! the weighted-score model the spec demands.

use crate::domain::{Bar, Bias, Zone};
use crate::indicators::swings::{swing_highs, swing_lows};

const STRUCTURE_WEIGHT: f64 = 55.0;
const OB_ASYMMETRY_WEIGHT: f64 = 30.0;
const DISPLACEMENT_WEIGHT: f64 = 15.0;
const SCORE_THRESHOLD: f64 = 70.0;
const RANGING_SCORE_GAP: f64 = 20.0;
const DISPLACEMENT_LOOKBACK: usize = 5;
const DISPLACEMENT_DOMINANCE_RATIO: f64 = 1.6;
const SWING_NEIGHBORHOOD: usize = 3;
const OB_LOOKBACK: usize = 20;

/// Structure verdict over the last two swing highs and two swing lows:
/// HH+HL is bullish, LH+LL is bearish, anything mixed is neutral.
fn structure_direction(bars: &[Bar]) -> Option<bool> {
    let highs = swing_highs(bars, SWING_NEIGHBORHOOD);
    let lows = swing_lows(bars, SWING_NEIGHBORHOOD);
    if highs.len() < 2 || lows.len() < 2 {
        return None;
    }
    let (h1, h2) = (highs[highs.len() - 2].price, highs[highs.len() - 1].price);
    let (l1, l2) = (lows[lows.len() - 2].price, lows[lows.len() - 1].price);

    let hh = h2 > h1;
    let hl = l2 > l1;
    let lh = h2 < h1;
    let ll = l2 < l1;

    if hh && hl {
        Some(true)
    } else if lh && ll {
        Some(false)
    } else {
        None
    }
}

fn cumulative_body(bars: &[Bar], bullish: bool) -> f64 {
    let start = bars.len().saturating_sub(DISPLACEMENT_LOOKBACK);
    bars[start..]
        .iter()
        .filter(|b| b.is_bullish() == bullish)
        .map(|b| b.body())
        .sum()
}

/// Score and classify a single timeframe's directional bias given its own
/// bars and the order blocks already detected on them (`spec.md` §4.3).
pub fn compute(bars: &[Bar], order_blocks: &[Zone]) -> (Bias, f64) {
    if bars.len() < 2 * SWING_NEIGHBORHOOD + 1 {
        return (Bias::Neutral, 0.0);
    }

    let structure = structure_direction(bars);

    let ob_window_start = bars.len().saturating_sub(OB_LOOKBACK);
    let bullish_obs = order_blocks
        .iter()
        .filter(|z| z.bar_index >= ob_window_start && z.polarity == crate::domain::Polarity::Bullish)
        .count();
    let bearish_obs = order_blocks
        .iter()
        .filter(|z| z.bar_index >= ob_window_start && z.polarity == crate::domain::Polarity::Bearish)
        .count();
    let ob_total = bullish_obs + bearish_obs;
    let ob_bullish_fraction = if ob_total == 0 {
        0.5
    } else {
        bullish_obs as f64 / ob_total as f64
    };

    let bull_body = cumulative_body(bars, true);
    let bear_body = cumulative_body(bars, false);

    let mut bullish_score = 0.0;
    let mut bearish_score = 0.0;

    match structure {
        Some(true) => bullish_score += STRUCTURE_WEIGHT,
        Some(false) => bearish_score += STRUCTURE_WEIGHT,
        None => {}
    }

    bullish_score += OB_ASYMMETRY_WEIGHT * ob_bullish_fraction;
    bearish_score += OB_ASYMMETRY_WEIGHT * (1.0 - ob_bullish_fraction);

    if bull_body >= bear_body * DISPLACEMENT_DOMINANCE_RATIO && bull_body > 0.0 {
        bullish_score += DISPLACEMENT_WEIGHT;
    }
    if bear_body >= bull_body * DISPLACEMENT_DOMINANCE_RATIO && bear_body > 0.0 {
        bearish_score += DISPLACEMENT_WEIGHT;
    }

    let (dominant_score, bias) = if bullish_score >= bearish_score {
        (bullish_score, Bias::Bullish)
    } else {
        (bearish_score, Bias::Bearish)
    };
    let gap = (bullish_score - bearish_score).abs();

    if dominant_score >= SCORE_THRESHOLD && gap > 0.0 {
        (bias, dominant_score.min(100.0))
    } else if gap < RANGING_SCORE_GAP {
        (Bias::Ranging, dominant_score.min(100.0))
    } else {
        (Bias::Neutral, dominant_score.min(100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;
    use crate::domain::{Polarity, ZoneFamily, ZoneMeta};

    fn ob(bar_index: usize, polarity: Polarity) -> Zone {
        Zone {
            family: ZoneFamily::OrderBlock,
            low: 1.0,
            high: 2.0,
            polarity,
            strength: 70.0,
            bar_index,
            mitigated: false,
            meta: ZoneMeta::OrderBlock {
                volume_spike: 1.5,
                displacement_pct: 1.0,
                retest_count: 0,
            },
        }
    }

    #[test]
    fn thin_data_is_neutral() {
        let bars = make_bars(&[1.0, 2.0]);
        let (bias, score) = compute(&bars, &[]);
        assert_eq!(bias, Bias::Neutral);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn higher_highs_and_higher_lows_score_bullish() {
        let closes = vec![
            100.0, 101.0, 102.0, 103.0, 104.0, 110.0, 104.0, 103.0, 102.0, 103.0, 104.0, 105.0,
            106.0, 107.0, 120.0, 107.0, 106.0, 105.0, 106.0, 107.0, 108.0,
        ];
        let bars = make_bars(&closes);
        let obs = vec![ob(5, Polarity::Bullish), ob(8, Polarity::Bullish)];
        let (bias, _) = compute(&bars, &obs);
        assert_eq!(bias, Bias::Bullish);
    }

    #[test]
    fn mixed_structure_without_ob_support_is_not_confidently_directional() {
        let closes = vec![
            100.0, 101.0, 102.0, 103.0, 104.0, 110.0, 104.0, 103.0, 102.0, 95.0, 104.0, 105.0,
            106.0, 107.0, 102.0, 107.0, 106.0, 105.0, 106.0, 107.0, 100.0,
        ];
        let bars = make_bars(&closes);
        let (bias, score) = compute(&bars, &[]);
        assert!(bias == Bias::Ranging || bias == Bias::Neutral);
        assert!(score < SCORE_THRESHOLD);
    }
}
