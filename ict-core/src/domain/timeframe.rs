//! Timeframe labels — the fixed TF list used for MTF consensus (`spec.md` §4.3).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed timeframes the MTF consensus walk iterates over.
///
/// Kept as a thin wrapper over the wire-format string label (`"1h"`, `"4h"`,
/// ...) rather than a closed enum, because `mtf_bars` arrives keyed by
/// arbitrary string labels from the collaborator contract (`spec.md` §6) and
/// unrecognized labels must not panic — they're simply absent from the fixed
/// consensus list and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timeframe(pub String);

impl Timeframe {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rough ordering of seconds-per-bar, used to classify a TF into the
    /// short-term / medium-long TP-multiplier bucket (`spec.md` §4.6).
    pub fn approx_seconds(&self) -> Option<u64> {
        let s = self.0.as_str();
        let (num, unit) = s.split_at(s.len().saturating_sub(1));
        let n: u64 = num.parse().ok()?;
        let mult = match unit {
            "m" => 60,
            "h" => 3600,
            "d" => 86_400,
            "w" => 604_800,
            _ => return None,
        };
        Some(n * mult)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Timeframe {
    fn from(s: &str) -> Self {
        Timeframe::new(s)
    }
}

/// The fixed MTF consensus TF list from `spec.md` §4.3, in ascending order.
pub const CONSENSUS_TIMEFRAMES: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "12h", "1d", "3d", "1w",
];

/// Short-term TF class for the TP-engine multiplier table (`spec.md` §4.6).
pub const SHORT_TERM_TFS: &[&str] = &["15m", "30m", "1h", "2h"];

/// Medium/long TF class for the TP-engine multiplier table (`spec.md` §4.6).
pub const MEDIUM_LONG_TFS: &[&str] = &["4h", "6h", "8h", "12h", "1d", "3d", "1w"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_seconds_parses_known_units() {
        assert_eq!(Timeframe::new("15m").approx_seconds(), Some(900));
        assert_eq!(Timeframe::new("4h").approx_seconds(), Some(14_400));
        assert_eq!(Timeframe::new("1d").approx_seconds(), Some(86_400));
        assert_eq!(Timeframe::new("1w").approx_seconds(), Some(604_800));
    }

    #[test]
    fn approx_seconds_none_for_garbage() {
        assert_eq!(Timeframe::new("bogus").approx_seconds(), None);
    }
}
