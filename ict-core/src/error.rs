//! Structured error types for seams that represent programmer/config
//! mistakes — not trade-rejection outcomes. Per `spec.md` §7, analysis
//! rejections are always data (`NoTradeMessage` / `None`), never `Err`.

use thiserror::Error;

/// Errors raised while loading a `PipelineConfig` from TOML.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised by the LRU+TTL cache's internal bookkeeping.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache capacity must be >= 1, got {0}")]
    InvalidCapacity(usize),
}

/// Errors surfaced by a single detector invocation. The facade (`spec.md`
/// §4.2, §9) downgrades every variant here to an empty zone list plus a
/// warning — detector errors never propagate out of `generate_signal`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectorError {
    #[error("detector '{family}' requires at least {min_bars} bars, got {have}")]
    InsufficientBars {
        family: &'static str,
        min_bars: usize,
        have: usize,
    },

    #[error("detector '{family}' failed: {reason}")]
    Failed {
        family: &'static str,
        reason: String,
    },
}
