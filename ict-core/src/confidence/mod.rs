//! Confidence scoring (`spec.md` §4.7).

pub mod scorer;

pub use scorer::{score, ScoringContext};
