//! Stage-specific no-trade message construction (`spec.md` §4.8).

pub mod builder;

pub use builder::{
    confidence_floor, entry_zone_rejected, mtf_consensus_floor, non_directional_bias,
    risk_reward_floor, sl_or_tp_rejected, with_context,
};
