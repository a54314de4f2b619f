//! Stop-loss calculation and validation (`spec.md` §4.5).

pub mod calculator;
pub mod validator;

pub use calculator::compute;
pub use validator::{validate, validate_without_reference_ob, ValidationResult};
