//! The ML advisory hook (`spec.md` §9): optional, confidence-only, and
//! always the last stage before the final gates.

pub mod advisory;

pub use advisory::{apply, ConfidenceModifier, LockedStrategyDecision, MlAdvisor};
