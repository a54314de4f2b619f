//! MTF consensus orchestration (`spec.md` §4.3): runs the per-timeframe
//! bias computer over every supplied timeframe and folds the result into
//! `MtfConsensusData`. The consensus arithmetic itself lives on
//! `MtfConsensusData::compute`; this module is the collaborator-facing glue
//! that builds its `per_tf` map.

use super::bias;
use crate::domain::timeframe::CONSENSUS_TIMEFRAMES;
use crate::domain::{Bar, Bias, MtfConsensusData, TfBiasResult, Zone};
use std::collections::BTreeMap;

/// One other timeframe's bars plus the order blocks already detected on
/// them, keyed by the wire-format label (`"1h"`, `"4h"`, ...).
pub struct MtfInput<'a> {
    pub label: &'a str,
    pub bars: &'a [Bar],
    pub order_blocks: &'a [Zone],
}

/// Compute consensus against `target_bias`, counting the primary timeframe
/// at confidence 100% (`spec.md` §4.3) and every other supplied timeframe at
/// its own computed confidence. Timeframes absent from `mtf_inputs` but
/// present in `CONSENSUS_TIMEFRAMES` count as `missing`.
pub fn compute(target_bias: Bias, primary_label: &str, mtf_inputs: &[MtfInput]) -> MtfConsensusData {
    let mut per_tf = BTreeMap::new();
    per_tf.insert(
        primary_label.to_string(),
        TfBiasResult {
            bias: target_bias,
            confidence: 100.0,
        },
    );

    for input in mtf_inputs {
        let (tf_bias, confidence) = bias::compute(input.bars, input.order_blocks);
        per_tf.insert(input.label.to_string(), TfBiasResult { bias: tf_bias, confidence });
    }

    let mut expected: Vec<&str> = vec![primary_label];
    expected.extend(CONSENSUS_TIMEFRAMES.iter().filter(|tf| **tf != primary_label));

    MtfConsensusData::compute(target_bias, per_tf, &expected)
}
