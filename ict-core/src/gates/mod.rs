//! Gate evaluators (`spec.md` §4.9): four independent boolean admission
//! checks run at stages 12.1-12.4. Each is loaded as an optional plugin and
//! skipped with a warning if absent; all receive defensive "everything
//! safe" defaults so the core can run standalone.

pub mod confidence_threshold;
pub mod entry_gating;
pub mod execution_eligibility;
pub mod risk_admission;

pub use confidence_threshold::ConfidenceThresholdConfig;
pub use entry_gating::EntryGatingContext;
pub use execution_eligibility::ExecutionEligibilityContext;
pub use risk_admission::RiskAdmissionContext;
