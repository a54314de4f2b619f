//! Breaker block detector — a mitigated order block that price later
//! reclaims and flips into support/resistance of the opposite polarity
//! (`spec.md` GLOSSARY). Gated behind `use_breaker_blocks` in
//! `PipelineConfig` (`spec.md` §6). Grounded on
//! `examples/original_source/order_block_detector.py`'s order-block model,
//! extended with the break-and-retest condition.

use crate::domain::{Bar, Polarity, Zone, ZoneFamily, ZoneMeta};
use crate::error::DetectorError;

const MIN_BARS: usize = 10;
const MAX_ZONES: usize = 15;

/// An order block is promoted to a breaker once price closes fully through
/// it (invalidating it as an order block) and then trades back into its
/// range, flipping its polarity.
pub fn detect(order_blocks: &[Zone], bars: &[Bar]) -> Result<Vec<Zone>, DetectorError> {
    if bars.len() < MIN_BARS {
        return Err(DetectorError::InsufficientBars {
            family: "breaker_block",
            min_bars: MIN_BARS,
            have: bars.len(),
        });
    }

    let mut zones = Vec::new();
    for ob in order_blocks {
        let Some(break_index) = find_break(ob, bars) else {
            continue;
        };
        let Some(retest_index) = find_retest(ob, bars, break_index) else {
            continue;
        };

        let flipped_polarity = match ob.polarity {
            Polarity::Bullish => Polarity::Bearish,
            Polarity::Bearish => Polarity::Bullish,
        };

        zones.push(Zone {
            family: ZoneFamily::BreakerBlock,
            low: ob.low,
            high: ob.high,
            polarity: flipped_polarity,
            strength: ob.strength * 0.9,
            bar_index: retest_index,
            mitigated: false,
            meta: ZoneMeta::BreakerBlock {
                origin_polarity: ob.polarity,
                breach_bar_index: break_index,
            },
        });

        if zones.len() >= MAX_ZONES {
            break;
        }
    }

    Ok(zones)
}

fn find_break(ob: &Zone, bars: &[Bar]) -> Option<usize> {
    bars.iter().enumerate().skip(ob.bar_index + 1).find_map(|(i, bar)| match ob.polarity {
        Polarity::Bullish if bar.close < ob.low => Some(i),
        Polarity::Bearish if bar.close > ob.high => Some(i),
        _ => None,
    })
}

fn find_retest(ob: &Zone, bars: &[Bar], break_index: usize) -> Option<usize> {
    bars.iter()
        .enumerate()
        .skip(break_index + 1)
        .find_map(|(i, bar)| (bar.low <= ob.high && bar.high >= ob.low).then_some(i))
}
