//! Order block detector — the last opposite-color candle before a strong
//! directional move (`spec.md` GLOSSARY). Grounded on
//! `examples/original_source/order_block_detector.py`'s displacement +
//! volume + body/wick strength model, reduced to the core's tagged `Zone`
//! representation.

use crate::domain::{Bar, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;
use crate::indicators::volume::median_volume;

const MIN_BARS: usize = 10;
const LOOKBACK_CANDLES: usize = 5;
const DISPLACEMENT_CANDLES: usize = 3;
const MIN_DISPLACEMENT_PCT: f64 = 0.5;
const MIN_VOLUME_RATIO: f64 = 1.2;
const MIN_STRENGTH: f64 = 60.0;
const MAX_ZONES: usize = 20;

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

fn strength_score(displacement: f64, volume_ratio: f64, body_ratio: f64, wick_ratio: f64) -> f64 {
    let disp_score = (displacement * 4.0).min(40.0);
    let vol_score = ((volume_ratio - 1.0) * 20.0).min(30.0).max(0.0);
    let body_score = (body_ratio * 30.0).min(20.0);
    let wick_penalty = (wick_ratio * 25.0).min(10.0);
    (disp_score + vol_score + body_score - wick_penalty).clamp(0.0, 100.0)
}

fn volume_ratio_at(bars: &[Bar], index: usize) -> f64 {
    let window = (index + 1).min(20);
    median_volume(&bars[..=index], window)
        .filter(|m| *m > 0.0)
        .map(|median| bars[index].volume / median)
        .unwrap_or(1.0)
}

/// Detect bullish and bearish order blocks on this bar range.
pub fn detect(bars: &[Bar]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "order_block",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let mut zones = Vec::new();
    let upper = bars.len().saturating_sub(DISPLACEMENT_CANDLES);
    for i in LOOKBACK_CANDLES..upper {
        let bar = bars[i];
        let body = bar.body();
        let range = bar.range().max(f64::EPSILON);
        let body_ratio = body / range;
        let upper_wick = bar.high - bar.open.max(bar.close);
        let lower_wick = bar.open.min(bar.close) - bar.low;
        let wick_ratio = (upper_wick + lower_wick) / range;
        let vol_ratio = volume_ratio_at(bars, i);

        // Bullish OB: last bearish candle before a strong bullish displacement.
        if !bar.is_bullish() {
            let disp = displacement_pct(bars, i, true);
            if disp >= MIN_DISPLACEMENT_PCT && vol_ratio >= MIN_VOLUME_RATIO {
                let strength = strength_score(disp, vol_ratio, body_ratio, wick_ratio);
                if strength >= MIN_STRENGTH {
                    zones.push(Zone {
                        family: ZoneFamily::OrderBlock,
                        low: bar.low,
                        high: bar.high,
                        polarity: Polarity::Bullish,
                        strength,
                        bar_index: i,
                        mitigated: false,
                        meta: ZoneMeta::OrderBlock {
                            volume_spike: vol_ratio,
                            displacement_pct: disp,
                            retest_count: 0,
                        },
                    });
                }
            }
        }

        // Bearish OB: last bullish candle before a strong bearish displacement.
        if bar.is_bullish() {
            let disp = displacement_pct(bars, i, false);
            if disp >= MIN_DISPLACEMENT_PCT && vol_ratio >= MIN_VOLUME_RATIO {
                let strength = strength_score(disp, vol_ratio, body_ratio, wick_ratio);
                if strength >= MIN_STRENGTH {
                    zones.push(Zone {
                        family: ZoneFamily::OrderBlock,
                        low: bar.low,
                        high: bar.high,
                        polarity: Polarity::Bearish,
                        strength,
                        bar_index: i,
                        mitigated: false,
                        meta: ZoneMeta::OrderBlock {
                            volume_spike: vol_ratio,
                            displacement_pct: disp,
                            retest_count: 0,
                        },
                    });
                }
            }
        }

        if zones.len() >= MAX_ZONES {
            break;
        }
    }

    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn insufficient_bars_errors() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            detect(&bars),
            Err(DetectorError::InsufficientBars { .. })
        ));
    }

    #[test]
    fn detects_bullish_ob_before_strong_move() {
        // A bearish dip candle followed by a strong rally with elevated volume.
        let mut closes = vec![100.0; 15];
        closes[9] = 98.0; // bearish candle at index 9 (close < open=100 from idx8)
        closes[10] = 100.0;
        closes[11] = 103.0;
        closes[12] = 106.0;
        let mut bars = make_bars(&closes);
        for b in bars.iter_mut() {
            b.volume = 100.0;
        }
        bars[9].volume = 400.0;
        let zones = detect(&bars).unwrap();
        assert!(zones.iter().any(|z| z.polarity == Polarity::Bullish && z.bar_index == 9));
    }

    #[test]
    fn zones_are_well_formed_and_capped() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + (i % 7) as f64 * 3.0).collect();
        let bars = make_bars(&closes);
        let zones = detect(&bars).unwrap();
        assert!(zones.len() <= MAX_ZONES);
        for z in &zones {
            assert!(z.is_well_formed());
        }
    }
}
