//! Signal — the full output record of a successful pipeline run (`spec.md` §3).

use super::bias::{Bias, SignalType};
use super::entry_zone::EntryZone;
use super::mtf_consensus::MtfConsensusData;
use super::zone_bundle::ZoneBundle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the timeframe-hierarchy lookup performed at stage 6b.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeHierarchyMeta {
    pub entry_tf: String,
    pub confirmation_tf: Option<String>,
    pub structure_tf: Option<String>,
    pub htf_bias_tf: Option<String>,
    pub confirmation_missing: bool,
    pub structure_missing: bool,
    pub confidence_penalty_applied: f64,
}

/// A named, human-readable rationale for a single zone (`zone_explainer.py`
/// in `examples/original_source/`; gated by `use_zone_explanations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneExplanation {
    pub family: &'static str,
    pub summary: String,
}

/// The full emitted trade recommendation (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub timeframe: String,
    pub signal_type: SignalType,
    /// 1-5.
    pub signal_strength: u8,
    pub entry_price: f64,
    pub sl_price: f64,
    /// Exactly three, monotonically increasing in the trade direction.
    pub tp_prices: [f64; 3],
    pub confidence: f64,
    /// Computed against TP2 when three TPs exist (always true in this
    /// model), else TP1 — see `spec.md` §9 Open Question.
    pub risk_reward_ratio: f64,
    pub bias: Bias,
    pub htf_bias: String,
    pub mtf_structure: String,
    pub mtf_consensus_data: MtfConsensusData,
    pub entry_zone: EntryZone,
    pub entry_status: &'static str,
    pub distance_penalty: bool,
    pub timeframe_hierarchy: TimeframeHierarchyMeta,
    pub zones: ZoneBundle,
    pub reasoning: String,
    pub warnings: Vec<String>,
    pub zone_explanations: Vec<ZoneExplanation>,
}

impl Signal {
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.sl_price).abs()
    }

    /// TP used for the R:R floor and the headline `risk_reward_ratio`
    /// (`spec.md` §9 Open Question: "validate against TP2 when present").
    pub fn rr_reference_tp(&self) -> f64 {
        self.tp_prices[1]
    }

    /// A minimal, file-writable record for the optional out-of-core backtest
    /// export (`spec.md` §6, "Persisted state layout").
    pub fn to_backtest_record(&self) -> BacktestRecord {
        BacktestRecord {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe.clone(),
            timestamp: self.timestamp,
            signal_type: format!("{:?}", self.signal_type),
            entry: self.entry_price,
            sl: self.sl_price,
            tp: self.tp_prices,
            confidence: self.confidence,
            rr: self.risk_reward_ratio,
            bias: self.bias.as_str().to_string(),
            reasoning: self.reasoning.clone(),
        }
    }
}

/// Out-of-core record shape keyed `{symbol}_{timeframe}_backtest.json`
/// (`spec.md` §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRecord {
    pub symbol: String,
    pub timeframe: String,
    pub timestamp: DateTime<Utc>,
    pub signal_type: String,
    pub entry: f64,
    pub sl: f64,
    pub tp: [f64; 3],
    pub confidence: f64,
    pub rr: f64,
    pub bias: String,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bias::Bias;
    use crate::domain::entry_zone::{DistanceDirection, EntrySource, EntryZone};
    use crate::domain::mtf_consensus::MtfConsensusData;
    use std::collections::BTreeMap;

    fn sample_signal() -> Signal {
        Signal {
            timestamp: Utc::now(),
            symbol: "BTCUSDT".into(),
            timeframe: "1h".into(),
            signal_type: SignalType::Buy,
            signal_strength: 3,
            entry_price: 100.0,
            sl_price: 98.0,
            tp_prices: [101.5, 106.0, 110.0],
            confidence: 72.0,
            risk_reward_ratio: 3.0,
            bias: Bias::Bullish,
            htf_bias: "BULLISH".into(),
            mtf_structure: "HH+HL".into(),
            mtf_consensus_data: MtfConsensusData::compute(Bias::Bullish, BTreeMap::new(), &[]),
            entry_zone: EntryZone {
                source: EntrySource::Fvg,
                low: 99.8,
                high: 100.2,
                center: 100.0,
                quality: 80.0,
                distance_pct: 1.0,
                distance_direction: DistanceDirection::Below,
                distance_out_of_range: false,
            },
            entry_status: "VALID_NEAR",
            distance_penalty: false,
            timeframe_hierarchy: TimeframeHierarchyMeta {
                entry_tf: "1h".into(),
                confirmation_tf: Some("4h".into()),
                structure_tf: Some("1d".into()),
                htf_bias_tf: Some("1d".into()),
                confirmation_missing: false,
                structure_missing: false,
                confidence_penalty_applied: 0.0,
            },
            zones: ZoneBundle::default(),
            reasoning: "test".into(),
            warnings: vec![],
            zone_explanations: vec![],
        }
    }

    #[test]
    fn rr_reference_is_tp2() {
        let s = sample_signal();
        assert_eq!(s.rr_reference_tp(), 106.0);
    }

    #[test]
    fn risk_is_entry_minus_sl_magnitude() {
        assert_eq!(sample_signal().risk(), 2.0);
    }

    #[test]
    fn backtest_record_roundtrips_through_json() {
        let record = sample_signal().to_backtest_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: BacktestRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entry, 100.0);
        assert_eq!(back.tp, [101.5, 106.0, 110.0]);
    }
}
