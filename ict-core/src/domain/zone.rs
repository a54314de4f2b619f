//! Zone — the polymorphic price-band type shared by every ICT detector
//! family (`spec.md` §3, design note in §9: "use a tagged variant ...
//! pattern-match" instead of the source's `hasattr` attribute probing).

use serde::{Deserialize, Serialize};

/// Directional polarity of a zone. Liquidity zones use the BSL/SSL side
/// tags instead, carried separately on `LiquidityMeta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Bullish,
    Bearish,
}

/// Which side of resting liquidity a liquidity zone represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquiditySide {
    /// Buy-side liquidity — resting stops above equal highs.
    Bsl,
    /// Sell-side liquidity — resting stops below equal lows.
    Ssl,
}

/// The detector family a zone came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneFamily {
    OrderBlock,
    FairValueGap,
    WhaleBlock,
    LiquidityZone,
    BreakerBlock,
    MitigationBlock,
    SibiSsib,
}

impl ZoneFamily {
    /// Human-readable family name, used by `explain` and diagnostic output.
    pub fn label(self) -> &'static str {
        match self {
            ZoneFamily::OrderBlock => "order block",
            ZoneFamily::FairValueGap => "fair value gap",
            ZoneFamily::WhaleBlock => "whale block",
            ZoneFamily::LiquidityZone => "liquidity zone",
            ZoneFamily::BreakerBlock => "breaker block",
            ZoneFamily::MitigationBlock => "mitigation block",
            ZoneFamily::SibiSsib => "SIBI/SSIB imbalance",
        }
    }
}

/// Detector-specific metadata. Variants correspond 1:1 to `ZoneFamily`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZoneMeta {
    OrderBlock {
        volume_spike: f64,
        displacement_pct: f64,
        retest_count: u32,
    },
    FairValueGap {
        gap_size_pct: f64,
    },
    WhaleBlock {
        volume_spike: f64,
        displacement_pct: f64,
        wick_ratio: f64,
    },
    LiquidityZone {
        side: LiquiditySide,
        equal_level_count: u32,
        swept: bool,
    },
    BreakerBlock {
        origin_polarity: Polarity,
        breach_bar_index: usize,
    },
    MitigationBlock {
        revisit_pct: f64,
    },
    SibiSsib {
        displacement_pct: f64,
        void_size_pct: f64,
    },
}

/// A price band with a directional tag, a 0-100 quality score, and
/// detector-specific metadata. Invariant: `low <= high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub family: ZoneFamily,
    pub low: f64,
    pub high: f64,
    pub polarity: Polarity,
    /// Normalized 0-100 quality score. Detectors may natively score on
    /// [0,10] or [0,100]; the facade normalizes (`spec.md` §3).
    pub strength: f64,
    pub bar_index: usize,
    pub mitigated: bool,
    pub meta: ZoneMeta,
}

impl Zone {
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.high && self.strength >= 0.0 && self.strength <= 100.0
    }

    pub fn center(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// A zone is active until mitigated or invalidated. This crate treats
    /// invalidation (breaker conversion) as a family change handled by the
    /// breaker detector, so activity here only tracks the mitigation flag.
    pub fn is_active(&self) -> bool {
        !self.mitigated
    }

    /// Normalize a strength value that may arrive on a [0,10] or [0,100]
    /// native scale into the core's canonical [0,100] quality score.
    pub fn normalize_strength(raw: f64, native_max: f64) -> f64 {
        if native_max <= 0.0 {
            return 0.0;
        }
        (raw / native_max * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Zone {
        Zone {
            family: ZoneFamily::OrderBlock,
            low: 100.0,
            high: 102.0,
            polarity: Polarity::Bullish,
            strength: 80.0,
            bar_index: 5,
            mitigated: false,
            meta: ZoneMeta::OrderBlock {
                volume_spike: 2.1,
                displacement_pct: 1.5,
                retest_count: 0,
            },
        }
    }

    #[test]
    fn well_formed_requires_low_le_high() {
        let mut z = sample();
        assert!(z.is_well_formed());
        z.low = 103.0;
        assert!(!z.is_well_formed());
    }

    #[test]
    fn normalize_strength_scales_into_0_100() {
        assert_eq!(Zone::normalize_strength(7.0, 10.0), 70.0);
        assert_eq!(Zone::normalize_strength(150.0, 100.0), 100.0);
        assert_eq!(Zone::normalize_strength(5.0, 0.0), 0.0);
    }

    #[test]
    fn center_is_midpoint() {
        assert_eq!(sample().center(), 101.0);
    }
}
