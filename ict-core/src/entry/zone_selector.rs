//! Entry-zone selector (`spec.md` §4.4): picks a price band of the correct
//! polarity within distance bounds, or synthesizes a fallback band.
//! Grounded on `examples/original_source/ict_signal_engine.py`'s entry
//! selection pass over FVG/OB/S-R candidates.

use crate::domain::{Bias, DistanceDirection, EntrySource, EntryStatus, EntryZone, SrLevel, Zone};

const MIN_DISTANCE_PCT: f64 = 0.5;
const NEAR_FAR_BOUNDARY_PCT: f64 = 3.0;
const MAX_DISTANCE_PCT: f64 = 5.0;
const ZONE_BUFFER_PCT: f64 = 0.2;
const FALLBACK_DISTANCE_PCT: f64 = 1.0;
const FALLBACK_QUALITY: f64 = 40.0;

struct Candidate {
    source: EntrySource,
    low: f64,
    high: f64,
    center: f64,
    quality: f64,
}

fn distance_pct(current_price: f64, center: f64) -> f64 {
    ((current_price - center).abs() / current_price) * 100.0
}

/// Select the best entry zone of the correct polarity for `bias`
/// (BULLISH looks below `current_price`, BEARISH above), returning the
/// final zone widened by a +/-0.2% buffer plus its acceptance status.
pub fn select(
    current_price: f64,
    bias: Bias,
    fvgs: &[Zone],
    order_blocks: &[Zone],
    sr_levels: &[SrLevel],
) -> (EntryZone, EntryStatus) {
    let bullish = bias == Bias::Bullish;

    let mut candidates: Vec<Candidate> = Vec::new();
    for z in fvgs.iter().filter(|z| z.is_active()) {
        if (z.polarity == crate::domain::Polarity::Bullish) == bullish {
            candidates.push(Candidate {
                source: EntrySource::Fvg,
                low: z.low,
                high: z.high,
                center: z.center(),
                quality: z.strength,
            });
        }
    }
    for z in order_blocks.iter().filter(|z| z.is_active()) {
        if (z.polarity == crate::domain::Polarity::Bullish) == bullish {
            candidates.push(Candidate {
                source: EntrySource::OrderBlock,
                low: z.low,
                high: z.high,
                center: z.center(),
                quality: z.strength,
            });
        }
    }
    for sr in sr_levels {
        let is_below = sr.price < current_price;
        if is_below == bullish {
            candidates.push(Candidate {
                source: EntrySource::SupportResistance,
                low: sr.price,
                high: sr.price,
                center: sr.price,
                quality: sr.strength,
            });
        }
    }

    let correct_direction = |c: &Candidate| {
        let below = c.center < current_price;
        below == bullish
    };

    let mut wrong_direction_exists = false;
    let mut best: Option<(&Candidate, f64)> = None;
    for c in &candidates {
        if !correct_direction(c) {
            wrong_direction_exists = true;
            continue;
        }
        let dist = distance_pct(current_price, c.center);
        if dist > MAX_DISTANCE_PCT || dist < MIN_DISTANCE_PCT {
            continue;
        }
        let priority = c.quality * (1.0 - dist / 10.0);
        if best.map_or(true, |(_, p)| priority > p) {
            best = Some((c, priority));
        }
    }

    if let Some((chosen, _)) = best {
        let dist = distance_pct(current_price, chosen.center);
        let status = if dist <= NEAR_FAR_BOUNDARY_PCT {
            EntryStatus::ValidNear
        } else {
            EntryStatus::ValidWait
        };
        return finalize(chosen.source, chosen.low, chosen.high, chosen.center, chosen.quality, dist, bullish, status);
    }

    // No accepted candidate. Distinguish TOO_FAR / TOO_LATE / NO_ZONE
    // fallback by checking the closest in-direction candidate (if any).
    let closest_in_direction = candidates
        .iter()
        .filter(|c| correct_direction(c))
        .map(|c| distance_pct(current_price, c.center))
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a: f64| a.min(d))));

    if let Some(dist) = closest_in_direction {
        if dist > MAX_DISTANCE_PCT {
            let zone = synthesize(current_price, bullish, EntrySource::Fallback, dist, true);
            return (zone, EntryStatus::TooFar);
        }
    }

    if wrong_direction_exists && closest_in_direction.is_none() {
        let zone = synthesize(current_price, bullish, EntrySource::Fallback, 0.0, true);
        return (zone, EntryStatus::TooLate);
    }

    let zone = synthesize(current_price, bullish, EntrySource::Fallback, FALLBACK_DISTANCE_PCT, false);
    (zone, EntryStatus::ValidFallback)
}

fn synthesize(
    current_price: f64,
    bullish: bool,
    source: EntrySource,
    distance_pct: f64,
    out_of_range: bool,
) -> EntryZone {
    let offset = current_price * FALLBACK_DISTANCE_PCT / 100.0;
    let center = if bullish { current_price - offset } else { current_price + offset };
    let (low, high) = buffered(center, center);
    EntryZone {
        source,
        low,
        high,
        center,
        quality: FALLBACK_QUALITY,
        distance_pct,
        distance_direction: if bullish { DistanceDirection::Below } else { DistanceDirection::Above },
        distance_out_of_range: out_of_range,
    }
}

fn buffered(low: f64, high: f64) -> (f64, f64) {
    let mid = (low + high) / 2.0;
    let buf = mid * ZONE_BUFFER_PCT / 100.0;
    (low - buf, high + buf)
}

fn finalize(
    source: EntrySource,
    low: f64,
    high: f64,
    center: f64,
    quality: f64,
    distance_pct: f64,
    bullish: bool,
    status: EntryStatus,
) -> (EntryZone, EntryStatus) {
    let (low, high) = buffered(low, high);
    let zone = EntryZone {
        source,
        low,
        high,
        center,
        quality,
        distance_pct,
        distance_direction: if bullish { DistanceDirection::Below } else { DistanceDirection::Above },
        distance_out_of_range: false,
    };
    (zone, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Polarity, ZoneFamily, ZoneMeta};

    fn fvg(low: f64, high: f64, polarity: Polarity) -> Zone {
        Zone {
            family: ZoneFamily::FairValueGap,
            low,
            high,
            polarity,
            strength: 80.0,
            bar_index: 1,
            mitigated: false,
            meta: ZoneMeta::FairValueGap { gap_size_pct: 1.0 },
        }
    }

    #[test]
    fn picks_valid_near_fvg_below_for_bullish() {
        let z = fvg(97.0, 98.0, Polarity::Bullish);
        let (zone, status) = select(100.0, Bias::Bullish, &[z], &[], &[]);
        assert_eq!(status, EntryStatus::ValidNear);
        assert!(zone.center < 100.0);
    }

    #[test]
    fn picks_valid_wait_for_4pct_distance() {
        let z = fvg(95.9, 96.1, Polarity::Bullish);
        let (_, status) = select(100.0, Bias::Bullish, &[z], &[], &[]);
        assert_eq!(status, EntryStatus::ValidWait);
    }

    #[test]
    fn no_zones_yields_fallback() {
        let (zone, status) = select(100.0, Bias::Bullish, &[], &[], &[]);
        assert_eq!(status, EntryStatus::ValidFallback);
        assert_eq!(zone.source, EntrySource::Fallback);
        assert!(zone.center < 100.0);
    }

    #[test]
    fn too_far_zone_is_rejected() {
        let z = fvg(89.0, 90.0, Polarity::Bullish);
        let (_, status) = select(100.0, Bias::Bullish, &[z], &[], &[]);
        assert_eq!(status, EntryStatus::TooFar);
    }
}
