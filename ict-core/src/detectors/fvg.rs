//! Fair Value Gap detector — a three-bar imbalance gap (`spec.md` GLOSSARY).
//!
//! Bullish FVG: `bar[i-2].high < bar[i].low` (a gap up).
//! Bearish FVG: `bar[i-2].low > bar[i].high` (a gap down).

use crate::domain::{Bar, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;

const MIN_BARS: usize = 3;
const MIN_GAP_PCT: f64 = 0.05;
const MAX_ZONES: usize = 30;

pub fn detect(bars: &[Bar]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "fvg",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let mut zones = Vec::new();
    for i in 2..bars.len() {
        let left = bars[i - 2];
        let right = bars[i];
        let mid_price = right.close.max(f64::EPSILON);

        if left.high < right.low {
            let gap_pct = (right.low - left.high) / mid_price * 100.0;
            if gap_pct >= MIN_GAP_PCT {
                zones.push(Zone {
                    family: ZoneFamily::FairValueGap,
                    low: left.high,
                    high: right.low,
                    polarity: Polarity::Bullish,
                    strength: Zone::normalize_strength(gap_pct.min(10.0), 10.0),
                    bar_index: i,
                    mitigated: false,
                    meta: ZoneMeta::FairValueGap { gap_size_pct: gap_pct },
                });
            }
        } else if left.low > right.high {
            let gap_pct = (left.low - right.high) / mid_price * 100.0;
            if gap_pct >= MIN_GAP_PCT {
                zones.push(Zone {
                    family: ZoneFamily::FairValueGap,
                    low: right.high,
                    high: left.low,
                    polarity: Polarity::Bearish,
                    strength: Zone::normalize_strength(gap_pct.min(10.0), 10.0),
                    bar_index: i,
                    mitigated: false,
                    meta: ZoneMeta::FairValueGap { gap_size_pct: gap_pct },
                });
            }
        }

        if zones.len() >= MAX_ZONES {
            break;
        }
    }

    Ok(zones)
}

/// Mark an FVG mitigated once price has traded back through a configured
/// percentage of the gap (`spec.md` §3 zone activity invariant).
pub fn apply_mitigation(zones: &mut [Zone], bars: &[Bar], mitigation_threshold_pct: f64) {
    for zone in zones.iter_mut() {
        let width = zone.width().max(f64::EPSILON);
        for bar in &bars[zone.bar_index.min(bars.len().saturating_sub(1))..] {
            let penetration = match zone.polarity {
                Polarity::Bullish => (zone.high - bar.low.max(zone.low)).max(0.0),
                Polarity::Bearish => (bar.high.min(zone.high) - zone.low).max(0.0),
            };
            if penetration / width * 100.0 >= mitigation_threshold_pct {
                zone.mitigated = true;
                break;
            }
        }
    }
}
