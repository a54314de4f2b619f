//! ZoneBundle — the aggregated output of the zone-detector facade (`spec.md` §4.2).

use super::zone::Zone;
use serde::{Deserialize, Serialize};

/// The 0.62-0.79 retracement ("OTE") band plus the swing the ratios were
/// measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciData {
    pub swing_low: f64,
    pub swing_high: f64,
    pub ote_low: f64,
    pub ote_high: f64,
    pub extension_1272: f64,
    pub extension_1618: f64,
}

impl FibonacciData {
    pub fn contains_ote(&self, price: f64) -> bool {
        let (lo, hi) = if self.ote_low <= self.ote_high {
            (self.ote_low, self.ote_high)
        } else {
            (self.ote_high, self.ote_low)
        };
        price >= lo && price <= hi
    }
}

/// A clustered support/resistance level (optional overlay, `spec.md` §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SrLevel {
    pub price: f64,
    pub strength: f64,
    pub touches: u32,
}

/// Aggregated output of "detect all components on this bar range"
/// (`spec.md` §4.2). Each family's list may be empty (substituted on
/// detector failure) but is never absent — the bundle is always returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneBundle {
    pub order_blocks: Vec<Zone>,
    pub fvgs: Vec<Zone>,
    pub whale_blocks: Vec<Zone>,
    pub liquidity_zones: Vec<Zone>,
    pub liquidity_sweeps: Vec<Zone>,
    pub internal_liquidity: Vec<Zone>,
    pub breaker_blocks: Vec<Zone>,
    pub mitigation_blocks: Vec<Zone>,
    pub sibi_ssib_zones: Vec<Zone>,
    pub fibonacci_data: Option<FibonacciData>,
    pub luxalgo_sr: Vec<SrLevel>,
    /// Families whose detector failed and were substituted with `[]`
    /// (`spec.md` §2, "Detectors are independent; failure of one must not
    /// abort the bundle").
    pub degraded_families: Vec<&'static str>,
}

impl ZoneBundle {
    pub fn total_zone_count(&self) -> usize {
        self.order_blocks.len()
            + self.fvgs.len()
            + self.whale_blocks.len()
            + self.liquidity_zones.len()
            + self.liquidity_sweeps.len()
            + self.internal_liquidity.len()
            + self.breaker_blocks.len()
            + self.mitigation_blocks.len()
            + self.sibi_ssib_zones.len()
    }

    /// All active (non-mitigated) zones across families that carry a
    /// bullish/bearish polarity, used by the entry selector and TP engine's
    /// obstacle scan.
    pub fn all_directional_zones(&self) -> Vec<&Zone> {
        self.order_blocks
            .iter()
            .chain(self.fvgs.iter())
            .chain(self.whale_blocks.iter())
            .chain(self.breaker_blocks.iter())
            .chain(self.mitigation_blocks.iter())
            .chain(self.sibi_ssib_zones.iter())
            .filter(|z| z.is_active())
            .collect()
    }
}
