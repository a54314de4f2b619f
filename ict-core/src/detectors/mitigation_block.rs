//! Mitigation block detector — an order block partially revisited by price;
//! still active as long as the revisit stays below the mitigation threshold
//! (`spec.md` GLOSSARY: "an OB partially revisited; still active if revisit
//! < threshold"). Gated behind `use_mitigation_blocks` in `PipelineConfig`
//! (`spec.md` §6). Grounded on
//! `examples/original_source/order_block_detector.py`'s
//! `_update_mitigation_status`/`check_mitigation` revisit-percentage model.

use crate::domain::{Bar, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;

const MIN_BARS: usize = 10;
const MAX_ZONES: usize = 15;

/// Revisit percentage of an order block's range by subsequent bars.
fn revisit_pct(ob: &Zone, bars: &[Bar]) -> f64 {
    let range = ob.width().max(f64::EPSILON);
    let mut best = 0.0_f64;
    for bar in bars.iter().skip(ob.bar_index + 1) {
        let penetration = match ob.polarity {
            Polarity::Bullish => (ob.high - bar.low.max(ob.low)).max(0.0),
            Polarity::Bearish => (bar.high.min(ob.high) - ob.low).max(0.0),
        };
        best = best.max(penetration / range * 100.0);
    }
    best
}

/// An order block becomes a mitigation block once it has been revisited
/// above zero but stays below `mitigation_threshold_pct` (otherwise it is
/// fully mitigated and the breaker detector takes over once price breaks
/// through it entirely).
pub fn detect(
    order_blocks: &[Zone],
    bars: &[Bar],
    mitigation_threshold_pct: f64,
) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "mitigation_block",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let mut zones = Vec::new();
    for ob in order_blocks {
        let revisit = revisit_pct(ob, bars);
        if revisit > 0.0 && revisit < mitigation_threshold_pct {
            zones.push(Zone {
                family: ZoneFamily::MitigationBlock,
                low: ob.low,
                high: ob.high,
                polarity: ob.polarity,
                strength: ob.strength * (1.0 - revisit / 100.0),
                bar_index: ob.bar_index,
                mitigated: false,
                meta: ZoneMeta::MitigationBlock { revisit_pct: revisit },
            });
            if zones.len() >= MAX_ZONES {
                break;
            }
        }
    }

    Ok(zones)
}
