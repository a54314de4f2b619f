//! Liquidity zone detector — equal highs/lows clusters assumed to hold
//! resting stop orders (`spec.md` GLOSSARY). Grounded on
//! `examples/original_source/liquidity_map.py`'s equal-level clustering and
//! sweep detection, with an internal-pool variant grounded on
//! `examples/original_source/ilp_detector.py`'s swing-based IBSL/ISSL model.

use crate::domain::{Bar, LiquiditySide, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;
use crate::indicators::swings::{swing_highs, swing_lows};

const MIN_BARS: usize = 10;
const EQUAL_LEVEL_TOLERANCE_PCT: f64 = 0.1;
const MIN_TOUCHES: u32 = 2;
const MAX_ZONES: usize = 15;
const INTERNAL_LOOKBACK: usize = 30;
const INTERNAL_SWING_NEIGHBORHOOD: usize = 3;

struct Cluster {
    level: f64,
    touches: u32,
    last_bar_index: usize,
}

fn cluster_levels(prices: &[(usize, f64)], tolerance_pct: f64) -> Vec<Cluster> {
    let mut sorted: Vec<(usize, f64)> = prices.to_vec();
    sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let mut clusters: Vec<Cluster> = Vec::new();
    for (idx, price) in sorted {
        if let Some(last) = clusters.last_mut() {
            let tol = last.level * tolerance_pct / 100.0;
            if (price - last.level).abs() <= tol {
                last.touches += 1;
                last.last_bar_index = last.last_bar_index.max(idx);
                last.level = (last.level * (last.touches - 1) as f64 + price) / last.touches as f64;
                continue;
            }
        }
        clusters.push(Cluster {
            level: price,
            touches: 1,
            last_bar_index: idx,
        });
    }
    clusters
}

fn zones_from_clusters(
    clusters: Vec<Cluster>,
    current: f64,
    side: LiquiditySide,
    swept_above: bool,
) -> Vec<Zone> {
    clusters
        .into_iter()
        .filter(|c| c.touches >= MIN_TOUCHES)
        .map(|c| {
            let swept = if swept_above {
                current > c.level
            } else {
                current < c.level
            };
            let band = c.level * EQUAL_LEVEL_TOLERANCE_PCT / 100.0;
            Zone {
                family: ZoneFamily::LiquidityZone,
                low: c.level - band,
                high: c.level + band,
                polarity: if swept_above { Polarity::Bearish } else { Polarity::Bullish },
                strength: (c.touches as f64 * 25.0).min(100.0),
                bar_index: c.last_bar_index,
                mitigated: swept,
                meta: ZoneMeta::LiquidityZone {
                    side,
                    equal_level_count: c.touches,
                    swept,
                },
            }
        })
        .collect()
}

/// Buy-side liquidity (equal highs) and sell-side liquidity (equal lows)
/// across the full bar range, both active and swept. Callers split the
/// result by `ZoneMeta::LiquidityZone.swept` into active zones vs sweeps
/// (`spec.md` §4.2).
pub fn detect(bars: &[Bar]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "liquidity_zone",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let highs: Vec<(usize, f64)> = bars.iter().enumerate().map(|(i, b)| (i, b.high)).collect();
    let lows: Vec<(usize, f64)> = bars.iter().enumerate().map(|(i, b)| (i, b.low)).collect();
    let last = bars.last().unwrap();

    let mut zones = zones_from_clusters(
        cluster_levels(&highs, EQUAL_LEVEL_TOLERANCE_PCT),
        last.high,
        LiquiditySide::Bsl,
        true,
    );
    zones.extend(zones_from_clusters(
        cluster_levels(&lows, EQUAL_LEVEL_TOLERANCE_PCT),
        last.low,
        LiquiditySide::Ssl,
        false,
    ));

    zones.truncate(MAX_ZONES);
    Ok(zones)
}

/// Internal liquidity pools (IBSL/ISSL) — equal swing highs/lows within a
/// recent dealing range, distinct from the full-range external clusters
/// above (`examples/original_source/ilp_detector.py`).
pub fn detect_internal(bars: &[Bar]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "internal_liquidity",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let window_start = bars.len().saturating_sub(INTERNAL_LOOKBACK);
    let window = &bars[window_start..];
    let last = window.last().unwrap();

    let highs: Vec<(usize, f64)> = swing_highs(window, INTERNAL_SWING_NEIGHBORHOOD)
        .into_iter()
        .map(|s| (s.bar_index + window_start, s.price))
        .collect();
    let lows: Vec<(usize, f64)> = swing_lows(window, INTERNAL_SWING_NEIGHBORHOOD)
        .into_iter()
        .map(|s| (s.bar_index + window_start, s.price))
        .collect();

    let mut zones = zones_from_clusters(
        cluster_levels(&highs, EQUAL_LEVEL_TOLERANCE_PCT),
        last.high,
        LiquiditySide::Bsl,
        true,
    );
    zones.extend(zones_from_clusters(
        cluster_levels(&lows, EQUAL_LEVEL_TOLERANCE_PCT),
        last.low,
        LiquiditySide::Ssl,
        false,
    ));

    zones.truncate(MAX_ZONES);
    Ok(zones)
}

/// Recent liquidity sweeps — a swept liquidity zone within the last
/// `recent_bars` bars, used by the confidence scorer's "recent liquidity
/// sweep in our direction" boost (`spec.md` §4.7).
pub fn recent_sweeps(zones: &[Zone], current_bar_index: usize, recent_bars: usize) -> Vec<&Zone> {
    zones
        .iter()
        .filter(|z| z.mitigated && current_bar_index.saturating_sub(z.bar_index) <= recent_bars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn insufficient_bars_errors() {
        let bars = make_bars(&[1.0; 3]);
        assert!(matches!(
            detect(&bars),
            Err(DetectorError::InsufficientBars { .. })
        ));
    }

    #[test]
    fn detects_equal_highs_as_bsl() {
        let mut bars = make_bars(&[100.0, 95.0, 100.0, 90.0, 100.05, 85.0, 80.0, 75.0, 70.0, 65.0]);
        bars[0].high = 105.0;
        bars[2].high = 105.02;
        bars[4].high = 105.03;
        let zones = detect(&bars).unwrap();
        assert!(zones
            .iter()
            .any(|z| matches!(z.meta, ZoneMeta::LiquidityZone { side: LiquiditySide::Bsl, .. })));
    }

    #[test]
    fn internal_pools_are_distinct_from_external_clusters() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i % 10) as f64 - 5.0).abs())
            .collect();
        let bars = make_bars(&closes);
        // Not asserting specific pools here, only that the internal detector
        // runs over the shorter lookback without requiring equal-level setup.
        let zones = detect_internal(&bars).unwrap();
        assert!(zones.len() <= MAX_ZONES);
    }
}
