//! SIBI/SSIB detector — Sell-Side Imbalance Buy-Side Inefficiency and its
//! mirror; a compound pattern requiring displacement + FVG + liquidity void
//! (`spec.md` GLOSSARY). Gated behind `use_sibi_ssib` in `PipelineConfig`
//! (`spec.md` §6). Grounded on
//! `examples/original_source/sibi_ssib_detector.py`'s displacement +
//! nearby-FVG + volume-void composite.

use crate::domain::{Bar, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;
use crate::indicators::volume::median_volume;

const MIN_BARS: usize = 20;
const DISPLACEMENT_CANDLES: usize = 3;
const MIN_DISPLACEMENT_PCT: f64 = 1.0;
const VOID_LOOKBACK: usize = 10;
const VOID_VOLUME_RATIO: f64 = 0.6;
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

/// A liquidity void: the volume over the recent window is significantly
/// below the broader median, implying thin two-way interest.
fn has_liquidity_void(bars: &[Bar], index: usize) -> bool {
    let start = index.saturating_sub(VOID_LOOKBACK);
    let window = &bars[start..=index];
    let recent_avg = window.iter().map(|b| b.volume).sum::<f64>() / window.len() as f64;

    let broader_start = start.saturating_sub(50);
    let broader = &bars[broader_start..start.max(1)];
    if broader.is_empty() {
        return false;
    }
    let overall = median_volume(broader, broader.len()).unwrap_or(recent_avg);
    overall > 0.0 && recent_avg < overall * VOID_VOLUME_RATIO
}

fn fvg_count_near(fvg_zones: &[Zone], index: usize, lookback: usize) -> u32 {
    fvg_zones
        .iter()
        .filter(|z| index.saturating_sub(z.bar_index) <= lookback)
        .count() as u32
}

/// Scan for SIBI (bullish displacement) and SSIB (bearish displacement)
/// compound zones, requiring a nearby FVG and a liquidity void.
pub fn detect(bars: &[Bar], fvg_zones: &[Zone]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "sibi_ssib",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let mut zones = Vec::new();
    let upper = bars.len().saturating_sub(DISPLACEMENT_CANDLES);
    for i in 10..upper {
        for bullish in [true, false] {
            let disp = displacement_pct(bars, i, bullish);
            if disp < MIN_DISPLACEMENT_PCT {
                continue;
            }
            let fvg_count = fvg_count_near(fvg_zones, i, DISPLACEMENT_CANDLES + 2);
            if fvg_count == 0 {
                continue;
            }
            if !has_liquidity_void(bars, i) {
                continue;
            }

            let strength = (50.0 + disp * 5.0 + fvg_count as f64 * 5.0 + 10.0).clamp(0.0, 100.0);
            let bar = bars[i];
            zones.push(Zone {
                family: ZoneFamily::SibiSsib,
                low: bar.low,
                high: bar.high,
                polarity: if bullish { Polarity::Bullish } else { Polarity::Bearish },
                strength,
                bar_index: i,
                mitigated: false,
                meta: ZoneMeta::SibiSsib {
                    displacement_pct: disp,
                    void_size_pct: (1.0 - VOID_VOLUME_RATIO) * 100.0,
                },
            });

            if zones.len() >= MAX_ZONES {
                return Ok(zones);
            }
        }
    }

    Ok(zones)
}
