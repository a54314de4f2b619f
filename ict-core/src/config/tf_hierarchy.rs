//! Timeframe-hierarchy config — per-entry-TF expected confirmation/structure
//! timeframes, used at pipeline stage 6b (`spec.md` §6, §4.8).
//!
//! Defaults are grounded in `examples/original_source/demo_tf_hierarchy.py`
//! and `test_tf_hierarchy.py`, which ship a table covering 1h/2h/4h/1d.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfHierarchyEntry {
    pub confirmation_tf: Option<String>,
    pub structure_tf: Option<String>,
    pub htf_bias_tf: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfHierarchyConfig {
    pub entries: BTreeMap<String, TfHierarchyEntry>,
    pub confirmation_penalty_if_missing: f64,
    pub structure_penalty_if_missing: f64,
    pub allow_fallback_tfs: bool,
}

impl Default for TfHierarchyConfig {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "1h".to_string(),
            TfHierarchyEntry {
                confirmation_tf: Some("4h".to_string()),
                structure_tf: Some("1d".to_string()),
                htf_bias_tf: Some("1d".to_string()),
            },
        );
        entries.insert(
            "2h".to_string(),
            TfHierarchyEntry {
                confirmation_tf: Some("4h".to_string()),
                structure_tf: Some("1d".to_string()),
                htf_bias_tf: Some("1d".to_string()),
            },
        );
        entries.insert(
            "4h".to_string(),
            TfHierarchyEntry {
                confirmation_tf: Some("1d".to_string()),
                structure_tf: Some("1d".to_string()),
                htf_bias_tf: Some("1d".to_string()),
            },
        );
        entries.insert(
            "1d".to_string(),
            TfHierarchyEntry {
                confirmation_tf: None,
                structure_tf: None,
                htf_bias_tf: Some("1d".to_string()),
            },
        );
        Self {
            entries,
            confirmation_penalty_if_missing: 0.15,
            structure_penalty_if_missing: 0.25,
            allow_fallback_tfs: true,
        }
    }
}

impl TfHierarchyConfig {
    pub fn lookup(&self, entry_tf: &str) -> Option<&TfHierarchyEntry> {
        self.entries.get(entry_tf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_1h_2h_4h_1d() {
        let cfg = TfHierarchyConfig::default();
        for tf in ["1h", "2h", "4h", "1d"] {
            assert!(cfg.lookup(tf).is_some(), "missing default entry for {tf}");
        }
    }

    #[test]
    fn unknown_entry_tf_is_none() {
        assert!(TfHierarchyConfig::default().lookup("3m").is_none());
    }
}
