//! MTF consensus data carried on the emitted `Signal` (`spec.md` §3, §4.3).

use super::bias::Bias;
use super::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-timeframe bias verdict, used both to compute consensus and to
/// render `mtf_breakdown` on a `NoTradeMessage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfBiasResult {
    pub bias: Bias,
    pub confidence: f64,
}

/// Aggregated MTF consensus against a target bias (`spec.md` §4.3).
///
/// `consensus_pct = aligned / (aligned + conflicting)`; neutrals are
/// excluded from the denominator. If the denominator is 0: 100% when
/// `aligned >= 1`, else 0% (total market indecision).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtfConsensusData {
    pub target_bias: Bias,
    pub per_tf: BTreeMap<String, TfBiasResult>,
    pub aligned: u32,
    pub conflicting: u32,
    pub neutral: u32,
    pub missing: u32,
    pub consensus_pct: f64,
}

impl MtfConsensusData {
    pub fn compute(
        target_bias: Bias,
        per_tf: BTreeMap<String, TfBiasResult>,
        expected_tfs: &[&str],
    ) -> Self {
        let mut aligned = 0u32;
        let mut conflicting = 0u32;
        let mut neutral = 0u32;
        let mut missing = 0u32;

        for tf in expected_tfs {
            match per_tf.get(*tf) {
                Some(result) if result.bias == target_bias => aligned += 1,
                Some(result) if result.bias.opposite() == target_bias => conflicting += 1,
                Some(_) => neutral += 1,
                None => missing += 1,
            }
        }

        let denom = aligned + conflicting;
        let consensus_pct = if denom == 0 {
            if aligned >= 1 {
                100.0
            } else {
                0.0
            }
        } else {
            (aligned as f64 / denom as f64) * 100.0
        };

        Self {
            target_bias,
            per_tf,
            aligned,
            conflicting,
            neutral,
            missing,
            consensus_pct,
        }
    }
}

/// Result of computing bias for a single timeframe, keyed for lookup.
pub struct TfBias {
    pub tf: Timeframe,
    pub result: TfBiasResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(bias: Bias, confidence: f64) -> TfBiasResult {
        TfBiasResult { bias, confidence }
    }

    #[test]
    fn consensus_with_neutrals_excluded_from_denominator() {
        // spec.md §8(e): target=BULLISH, {1h: BULLISH, 4h: BULLISH, 1d: NEUTRAL,
        // 15m: BEARISH, 2h: RANGING}, plus primary counted at confidence 100%
        // contributes as an extra aligned vote (aligned=3 total).
        let mut per_tf = BTreeMap::new();
        per_tf.insert("primary".to_string(), tf(Bias::Bullish, 100.0));
        per_tf.insert("1h".to_string(), tf(Bias::Bullish, 90.0));
        per_tf.insert("4h".to_string(), tf(Bias::Bullish, 80.0));
        per_tf.insert("1d".to_string(), tf(Bias::Neutral, 50.0));
        per_tf.insert("15m".to_string(), tf(Bias::Bearish, 70.0));
        per_tf.insert("2h".to_string(), tf(Bias::Ranging, 40.0));

        let data = MtfConsensusData::compute(
            Bias::Bullish,
            per_tf,
            &["primary", "1h", "4h", "1d", "15m", "2h"],
        );
        assert_eq!(data.aligned, 3);
        assert_eq!(data.conflicting, 1);
        assert_eq!(data.neutral, 2);
        assert_eq!(data.consensus_pct, 75.0);
    }

    #[test]
    fn zero_denominator_with_aligned_is_full_consensus() {
        let mut per_tf = BTreeMap::new();
        per_tf.insert("1h".to_string(), tf(Bias::Bullish, 90.0));
        let data = MtfConsensusData::compute(Bias::Bullish, per_tf, &["1h"]);
        assert_eq!(data.consensus_pct, 100.0);
    }

    #[test]
    fn zero_denominator_with_no_aligned_is_zero() {
        let mut per_tf = BTreeMap::new();
        per_tf.insert("1h".to_string(), tf(Bias::Neutral, 10.0));
        let data = MtfConsensusData::compute(Bias::Bullish, per_tf, &["1h"]);
        assert_eq!(data.consensus_pct, 0.0);
    }
}
