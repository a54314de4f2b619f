//! NoTradeMessage — the canonical diagnostic emitted when an analysis-level
//! gate rejects (`spec.md` §3, §4.8 stages 7b-10).

use super::mtf_consensus::MtfConsensusData;
use serde::{Deserialize, Serialize};

/// Emitted in place of a `Signal` when a gate rejects at or after stage 7b.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoTradeMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub symbol: String,
    pub timeframe: String,
    pub reason: String,
    pub details: String,
    pub mtf_breakdown: Option<MtfConsensusData>,
    pub mtf_consensus_pct: Option<f64>,
    pub current_price: f64,
    pub price_change_24h: Option<f64>,
    pub rsi: Option<f64>,
    pub signal_direction: Option<String>,
    pub confidence: Option<f64>,
    pub ict_components: usize,
    pub entry_status: Option<&'static str>,
    pub structure_broken: bool,
    pub displacement_detected: bool,
    /// The stage this call was rejected at — `"7b"`, `"8"`, `"9"`, `"10"`,
    /// `"11.5"`, or `"11.6"` (`ict_signal_engine.py`'s `blocked_at_step`
    /// diagnostic logging, carried forward as a supplemented feature).
    pub blocked_at_step: &'static str,
}

impl NoTradeMessage {
    pub fn new(symbol: impl Into<String>, timeframe: impl Into<String>, current_price: f64) -> Self {
        Self {
            kind: "NO_TRADE",
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            reason: String::new(),
            details: String::new(),
            mtf_breakdown: None,
            mtf_consensus_pct: None,
            current_price,
            price_change_24h: None,
            rsi: None,
            signal_direction: None,
            confidence: None,
            ict_components: 0,
            entry_status: None,
            structure_broken: false,
            displacement_detected: false,
            blocked_at_step: "",
        }
    }

    pub fn at_step(mut self, step: &'static str, reason: impl Into<String>) -> Self {
        self.blocked_at_step = step;
        self.reason = reason.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_step_and_reason() {
        let msg = NoTradeMessage::new("ETHUSDT", "4h", 3000.0)
            .at_step("8", "Entry distance exceeds 5% universal maximum")
            .with_details("best candidate FVG 6.2% away");
        assert_eq!(msg.blocked_at_step, "8");
        assert_eq!(msg.kind, "NO_TRADE");
        assert!(msg.reason.contains("5%"));
    }
}
