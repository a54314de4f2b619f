//! EntryZone — the selected price band a signal enters from (`spec.md` §3, §4.4).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySource {
    Fvg,
    OrderBlock,
    SupportResistance,
    /// Synthesized `current_price +/- 1%` band when no zone exists in the
    /// correct direction (`spec.md` §4.4, `NO_ZONE` case).
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceDirection {
    Above,
    Below,
}

/// The outcome of entry-zone selection (`spec.md` §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// 0.5%-3%: best case.
    ValidNear,
    /// 3%-5%: accepted with a "wait for pullback" annotation.
    ValidWait,
    /// Synthesized fallback zone at `current_price +/- 1%`.
    ValidFallback,
    /// > 5% away: stale, pipeline rejects.
    TooFar,
    /// < 0.5% but zones only exist in the wrong direction: price already
    /// passed them.
    TooLate,
}

impl EntryStatus {
    pub fn is_acceptable(&self) -> bool {
        matches!(
            self,
            EntryStatus::ValidNear | EntryStatus::ValidWait | EntryStatus::ValidFallback
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::ValidNear => "VALID_NEAR",
            EntryStatus::ValidWait => "VALID_WAIT",
            EntryStatus::ValidFallback => "VALID_FALLBACK",
            EntryStatus::TooFar => "TOO_FAR",
            EntryStatus::TooLate => "TOO_LATE",
        }
    }
}

/// The chosen entry band. Invariant (`spec.md` §3): for a BEARISH signal
/// `center > current_price`; for a BULLISH signal `center < current_price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryZone {
    pub source: EntrySource,
    pub low: f64,
    pub high: f64,
    pub center: f64,
    pub quality: f64,
    pub distance_pct: f64,
    pub distance_direction: DistanceDirection,
    pub distance_out_of_range: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceptable_statuses() {
        assert!(EntryStatus::ValidNear.is_acceptable());
        assert!(EntryStatus::ValidWait.is_acceptable());
        assert!(EntryStatus::ValidFallback.is_acceptable());
        assert!(!EntryStatus::TooFar.is_acceptable());
        assert!(!EntryStatus::TooLate.is_acceptable());
    }
}
