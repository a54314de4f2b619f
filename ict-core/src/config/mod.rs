//! Feature-flag configuration (`spec.md` §6) and timeframe-hierarchy config.
//!
//! Follows the teacher's `RunConfig`/`StrategyConfig` pattern
//! (`trendlab-runner/src/config.rs`): a single serializable struct with
//! sane defaults, loaded from TOML by the CLI harness.

pub mod tf_hierarchy;

pub use tf_hierarchy::{TfHierarchyConfig, TfHierarchyEntry};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Per-TP minimum R:R floor (`spec.md` §4.6 Layer B step 3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpMinimumRr {
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
}

impl Default for TpMinimumRr {
    fn default() -> Self {
        Self {
            tp1: 2.5,
            tp2: 3.5,
            tp3: 5.0,
        }
    }
}

/// News-sentiment gate weights and thresholds (`spec.md` §4.8 stage 12b).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewsSentimentConfig {
    pub critical_weight: f64,
    pub important_weight: f64,
    pub normal_weight: f64,
    pub block_buy_below: f64,
    pub block_sell_above: f64,
}

impl Default for NewsSentimentConfig {
    fn default() -> Self {
        Self {
            critical_weight: 3.0,
            important_weight: 2.0,
            normal_weight: 1.0,
            block_buy_below: -30.0,
            block_sell_above: 30.0,
        }
    }
}

/// The full feature-flag surface consumed by the pipeline (`spec.md` §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub use_breaker_blocks: bool,
    pub use_mitigation_blocks: bool,
    pub use_sibi_ssib: bool,
    pub use_zone_explanations: bool,
    pub use_cache: bool,
    pub cache_ttl_seconds: u64,
    pub cache_max_size: usize,
    pub use_ml: bool,
    pub use_news_filter: bool,
    pub use_structure_tp: bool,
    pub min_confidence: f64,
    pub min_risk_reward: f64,
    pub max_entry_distance_pct: f64,
    pub min_sl_distance_pct: f64,
    pub tp_minimum_rr: TpMinimumRr,
    /// Strict mode (default) rejects a signal with no reference OB at SL
    /// validation; non-strict accepts an ATR*1.5 fallback SL and marks
    /// `sl_fallback_used` in warnings (`spec.md` §4.5).
    pub ict_strict_sl_validation: bool,
    pub news_sentiment: NewsSentimentConfig,
    pub tf_hierarchy: TfHierarchyConfig,
    /// Symbols eligible for the "ALT-independent" non-directional-bias
    /// mitigation path at stage 7b (`manual_validation_altcoin_mode.py`
    /// in `examples/original_source/`, carried as a SPEC_FULL supplement).
    pub alt_independent_symbols: Vec<String>,
    /// Minimum consensus percentage required at stage 11.5.
    pub min_mtf_consensus_pct: f64,
    pub min_entry_gap_pct: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_breaker_blocks: true,
            use_mitigation_blocks: true,
            use_sibi_ssib: true,
            use_zone_explanations: true,
            use_cache: true,
            cache_ttl_seconds: 300,
            cache_max_size: 256,
            use_ml: false,
            use_news_filter: false,
            use_structure_tp: true,
            min_confidence: 60.0,
            min_risk_reward: 3.0,
            max_entry_distance_pct: 0.05,
            min_sl_distance_pct: 0.03,
            tp_minimum_rr: TpMinimumRr::default(),
            ict_strict_sl_validation: true,
            news_sentiment: NewsSentimentConfig::default(),
            tf_hierarchy: TfHierarchyConfig::default(),
            alt_independent_symbols: Vec::new(),
            min_mtf_consensus_pct: 50.0,
            min_entry_gap_pct: 0.005,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
        let cfg: PipelineConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_max_size == 0 {
            return Err(ConfigError::Invalid(
                "cache_max_size must be >= 1".to_string(),
            ));
        }
        if self.max_entry_distance_pct <= self.min_entry_gap_pct {
            return Err(ConfigError::Invalid(
                "max_entry_distance_pct must exceed min_entry_gap_pct".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.min_confidence, 60.0);
        assert_eq!(cfg.min_risk_reward, 3.0);
        assert_eq!(cfg.max_entry_distance_pct, 0.05);
        assert_eq!(cfg.min_sl_distance_pct, 0.03);
        assert_eq!(cfg.tp_minimum_rr.tp1, 2.5);
        assert_eq!(cfg.tp_minimum_rr.tp2, 3.5);
        assert_eq!(cfg.tp_minimum_rr.tp3, 5.0);
        assert!(cfg.ict_strict_sl_validation);
    }

    #[test]
    fn from_toml_overrides_defaults() {
        let cfg = PipelineConfig::from_toml("min_confidence = 70.0\nuse_ml = true\n").unwrap();
        assert_eq!(cfg.min_confidence, 70.0);
        assert!(cfg.use_ml);
        // Untouched fields keep defaults.
        assert_eq!(cfg.min_risk_reward, 3.0);
    }

    #[test]
    fn rejects_zero_cache_capacity() {
        let err = PipelineConfig::from_toml("cache_max_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
