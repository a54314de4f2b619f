//! ML advisory hook (`spec.md` §9 design note, stage 12.0-late): runs
//! last, after every strategy decision and risk filter, and may only
//! scale confidence. Grounded on the "PR-ML-8" advisory layer in
//! `examples/original_source/ict_signal_engine.py`, which locks
//! `strategy_signal` before calling the predictor and clamps the result
//! back into `[0, 100]`.
//!
//! The "strategy decision is locked" property is enforced structurally
//! here rather than by convention: [`LockedStrategyDecision`] is the only
//! input the hook receives, and it carries no setter — nothing downstream
//! of its construction can mutate direction, entry, SL, or TP.

use crate::domain::SignalType;

/// The fields of a signal that ML advisory must never influence. Built
/// once the pipeline has already decided on direction and price levels;
/// there is no way to write back into a `Signal` through this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockedStrategyDecision {
    pub signal_type: SignalType,
    pub entry_price: f64,
    pub sl_price: f64,
    pub tp_prices: [f64; 3],
}

/// The only thing an ML advisor is allowed to return: a bounded
/// confidence multiplier plus human-readable warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceModifier {
    pub multiplier: f64,
    pub ml_confidence: f64,
    pub mode: &'static str,
    pub warnings: Vec<String>,
}

pub const MIN_MULTIPLIER: f64 = 0.8;
pub const MAX_MULTIPLIER: f64 = 1.2;

/// Pluggable ML predictor. The core ships no model; a caller wires a
/// real implementation in, or the pipeline runs with `None` and leaves
/// confidence untouched (`spec.md` §7: "ML hook unavailable or errors:
/// continue with base confidence; log once").
pub trait MlAdvisor: Send + Sync {
    fn get_confidence_modifier(
        &self,
        decision: LockedStrategyDecision,
        base_confidence: f64,
    ) -> Result<ConfidenceModifier, String>;
}

/// Applies an advisor's modifier to `base_confidence`, clamping both the
/// modifier itself and the result (`spec.md` §8 invariant 9). On advisor
/// failure, returns the base confidence unchanged and a single warning —
/// mirrors the `except Exception` branch in `ict_signal_engine.py`
/// ("Continuing with ICT-only confidence").
pub fn apply(
    advisor: Option<&dyn MlAdvisor>,
    decision: LockedStrategyDecision,
    base_confidence: f64,
) -> (f64, Vec<String>) {
    let Some(advisor) = advisor else {
        return (base_confidence, Vec::new());
    };

    match advisor.get_confidence_modifier(decision, base_confidence) {
        Ok(modifier) => {
            let clamped_multiplier = modifier.multiplier.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
            let adjusted = (base_confidence * clamped_multiplier).clamp(0.0, 100.0);
            (adjusted, modifier.warnings)
        }
        Err(reason) => (
            base_confidence,
            vec![format!("ML advisory unavailable: {reason}")],
        ),
    }
}
