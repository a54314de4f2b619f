//! Confidence threshold evaluator (`spec.md` §4.9, stage 12.2), independent
//! of the pipeline's own stage-11.6 check: stricter for SELL than BUY is
//! allowed by config.

use crate::domain::SignalType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThresholdConfig {
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl Default for ConfidenceThresholdConfig {
    fn default() -> Self {
        Self {
            buy_threshold: 60.0,
            sell_threshold: 60.0,
        }
    }
}

pub fn evaluate(config: &ConfidenceThresholdConfig, signal_type: SignalType, raw_confidence: f64) -> bool {
    let threshold = if signal_type.is_sell_side() {
        config.sell_threshold
    } else {
        config.buy_threshold
    };
    raw_confidence >= threshold
}
