//! ICT Core — ICT/SMC zone detection, multi-timeframe bias, and the
//! signal-generation pipeline.
//!
//! This crate contains the heart of the signal engine:
//! - Domain types (bars, zones, bias, signals, no-trade diagnostics)
//! - Config loading and validation
//! - Zone detectors (order blocks, FVGs, whale blocks, liquidity,
//!   breaker/mitigation blocks, SIBI/SSIB, Fibonacci, LuxAlgo S/R)
//! - Indicators (ATR, RSI, swings, displacement, volume, range position)
//! - Multi-timeframe bias and consensus
//! - Entry-zone selection, stop-loss, and take-profit construction
//! - Confidence scoring and the no-trade diagnostic builder
//! - Admission gates, ML advisory, and the LRU+TTL signal cache
//! - The pipeline orchestrator tying every stage together

pub mod cache;
pub mod confidence;
pub mod config;
pub mod detectors;
pub mod domain;
pub mod entry;
pub mod error;
pub mod explain;
pub mod gates;
pub mod indicators;
pub mod ml;
pub mod mtf;
pub mod no_trade;
pub mod pipeline;
pub mod stop_loss;
pub mod take_profit;

pub use error::{CacheError, ConfigError, DetectorError};
pub use pipeline::{Outcome, Pipeline, SignalRequest, Stage};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: every type that crosses the pipeline boundary is
    /// Send + Sync, since a caller is expected to run `Pipeline` from a
    /// worker thread (e.g. behind an async task or a CLI's blocking pool).
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Zone>();
        require_sync::<domain::Zone>();
        require_send::<domain::ZoneBundle>();
        require_sync::<domain::ZoneBundle>();
        require_send::<domain::Bias>();
        require_sync::<domain::Bias>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::NoTradeMessage>();
        require_sync::<domain::NoTradeMessage>();
        require_send::<config::PipelineConfig>();
        require_sync::<config::PipelineConfig>();
        require_send::<Pipeline>();
        require_send::<Outcome>();
        require_sync::<Outcome>();
    }

    #[test]
    fn default_config_builds_a_pipeline() {
        let pipeline = Pipeline::new(config::PipelineConfig::default());
        assert!(pipeline.is_ok());
    }
}
