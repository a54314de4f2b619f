//! Clustered support/resistance overlay (`luxalgo_sr` in `ZoneBundle`,
//! `spec.md` §4.2). Best-effort: an empty list is substituted on thin data
//! rather than an error, matching the bundle's "Fibonacci + LuxAlgo
//! overlays: best-effort, continue with empties" contract (`spec.md` §5,
//! stage 6). Grounded on `examples/original_source/liquidity_map.py`'s
//! equal-level clustering, applied here over swing points rather than raw
//! wicks to approximate a vendor S/R overlay with this crate's own
//! indicator stack.

use crate::domain::{Bar, SrLevel};
use crate::indicators::swings::{swing_highs, swing_lows};

const SWING_NEIGHBORHOOD: usize = 4;
const CLUSTER_TOLERANCE_PCT: f64 = 0.3;
const MIN_TOUCHES: u32 = 2;
const MAX_LEVELS: usize = 10;

struct Accum {
    sum: f64,
    touches: u32,
}

fn cluster(levels: &[f64], tolerance_pct: f64) -> Vec<SrLevel> {
    let mut sorted = levels.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut out: Vec<Accum> = Vec::new();
    for price in sorted {
        if let Some(last) = out.last_mut() {
            let mean = last.sum / last.touches as f64;
            if (price - mean).abs() <= mean * tolerance_pct / 100.0 {
                last.sum += price;
                last.touches += 1;
                continue;
            }
        }
        out.push(Accum { sum: price, touches: 1 });
    }

    out.into_iter()
        .filter(|a| a.touches >= MIN_TOUCHES)
        .map(|a| SrLevel {
            price: a.sum / a.touches as f64,
            strength: (a.touches as f64 * 20.0).min(100.0),
            touches: a.touches,
        })
        .collect()
}

pub fn detect(bars: &[Bar]) -> Vec<SrLevel> {
    if bars.len() < 2 * SWING_NEIGHBORHOOD + 1 {
        return Vec::new();
    }

    let mut levels: Vec<f64> = swing_highs(bars, SWING_NEIGHBORHOOD)
        .into_iter()
        .map(|s| s.price)
        .collect();
    levels.extend(swing_lows(bars, SWING_NEIGHBORHOOD).into_iter().map(|s| s.price));

    let mut result = cluster(&levels, CLUSTER_TOLERANCE_PCT);
    result.sort_by(|a, b| b.strength.partial_cmp(&a.strength).unwrap());
    result.truncate(MAX_LEVELS);
    result
}

/// Nearest S/R level to `price`, used by the confidence scorer's "LuxAlgo
/// S/R proximity" boost (`spec.md` §4.7).
pub fn nearest(levels: &[SrLevel], price: f64) -> Option<&SrLevel> {
    levels
        .iter()
        .min_by(|a, b| (a.price - price).abs().partial_cmp(&(b.price - price).abs()).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn thin_data_yields_empty() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(detect(&bars).is_empty());
    }

    #[test]
    fn clusters_repeated_swing_levels() {
        let closes = vec![
            100.0, 101.0, 102.0, 103.0, 104.0, 110.0, 104.0, 103.0, 102.0, 101.0, 100.0, 99.0,
            98.0, 97.0, 96.0, 95.0, 96.0, 97.0, 98.0, 99.0, 100.0, 101.0, 102.0, 103.0, 104.0,
            110.02, 104.0, 103.0, 102.0, 101.0,
        ];
        let bars = make_bars(&closes);
        let levels = detect(&bars);
        assert!(levels.iter().any(|l| l.touches >= MIN_TOUCHES));
    }

    #[test]
    fn nearest_picks_closest_level() {
        let levels = vec![
            SrLevel { price: 100.0, strength: 50.0, touches: 2 },
            SrLevel { price: 120.0, strength: 80.0, touches: 3 },
        ];
        let found = nearest(&levels, 118.0).unwrap();
        assert_eq!(found.price, 120.0);
    }
}
