//! Whale block detector — an order block with exceptional volume spike,
//! strong displacement, and minimal wicks; highest-conviction institutional
//! footprint (`spec.md` GLOSSARY). Grounded on
//! `examples/original_source/ict_whale_detector.py`'s tightened thresholds
//! over the same displacement/volume/wick model as the order-block detector.

use crate::domain::{Bar, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;
use crate::indicators::volume::median_volume;

const MIN_BARS: usize = 25;
const DISPLACEMENT_CANDLES: usize = 3;
const MIN_DISPLACEMENT_PCT: f64 = 1.5;
const MIN_VOLUME_SPIKE: f64 = 2.5;
const MAX_WICK_RATIO: f64 = 0.2;
const MAX_ZONES: usize = 10;

fn displacement_pct(bars: &[Bar], index: usize, bullish_move: bool) -> f64 {
    let start = bars[index].close;
    let end_index = (index + DISPLACEMENT_CANDLES).min(bars.len() - 1);
    if end_index <= index {
        return 0.0;
    }
    let window = &bars[index + 1..=end_index];
    let extreme = if bullish_move {
        window.iter().map(|b| b.high).fold(f64::MIN, f64::max)
    } else {
        window.iter().map(|b| b.low).fold(f64::MAX, f64::min)
    };
    let raw = if bullish_move {
        (extreme - start) / start * 100.0
    } else {
        (start - extreme) / start * 100.0
    };
    raw.max(0.0)
}

pub fn detect(bars: &[Bar]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "whale_block",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let mut zones = Vec::new();
    let upper = bars.len().saturating_sub(DISPLACEMENT_CANDLES);
    for i in 20..upper {
        let bar = bars[i];
        let range = bar.range().max(f64::EPSILON);
        let upper_wick = bar.high - bar.open.max(bar.close);
        let lower_wick = bar.open.min(bar.close) - bar.low;
        let wick_ratio = (upper_wick + lower_wick) / range;
        if wick_ratio > MAX_WICK_RATIO {
            continue;
        }

        let median = match median_volume(&bars[..=i], 20) {
            Some(m) if m > 0.0 => m,
            _ => continue,
        };
        let spike = bar.volume / median;
        if spike < MIN_VOLUME_SPIKE {
            continue;
        }

        let bullish_candidate = !bar.is_bullish();
        let disp = displacement_pct(bars, i, bullish_candidate);
        if disp < MIN_DISPLACEMENT_PCT {
            continue;
        }

        let strength = (60.0 + disp * 3.0 + (spike - MIN_VOLUME_SPIKE) * 5.0).clamp(0.0, 100.0);
        zones.push(Zone {
            family: ZoneFamily::WhaleBlock,
            low: bar.low,
            high: bar.high,
            polarity: if bullish_candidate {
                Polarity::Bullish
            } else {
                Polarity::Bearish
            },
            strength,
            bar_index: i,
            mitigated: false,
            meta: ZoneMeta::WhaleBlock {
                volume_spike: spike,
                displacement_pct: disp,
                wick_ratio,
            },
        });

        if zones.len() >= MAX_ZONES {
            break;
        }
    }

    Ok(zones)
}
