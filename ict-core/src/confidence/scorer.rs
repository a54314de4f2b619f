//! Confidence scorer (`spec.md` §4.7): weighted sum over detected
//! component presence, then multiplicative soft-penalty adjustments,
//! clamped to [0,100].

use crate::domain::{Bias, ZoneBundle};

/// Everything the scorer needs beyond the zone bundle itself.
pub struct ScoringContext<'a> {
    pub bundle: &'a ZoneBundle,
    pub bias: Bias,
    pub structure_break_in_last_5_bars: bool,
    pub aligned_tf_count: u32,
    pub displacement_in_last_3_bars: bool,
    pub risk_reward_ratio: f64,
    pub nearest_sr_within_2pct: bool,
    pub luxalgo_bias_aligned: bool,
    pub luxalgo_entry_validated: bool,
    pub price_in_ote_zone: bool,
    pub is_alt_independent_symbol: bool,
    pub own_structure_rescued_from_htf: bool,
    pub htf_non_directional: bool,
    pub own_structure_non_directional: bool,
    pub entry_distance_pct: f64,
    pub nearest_liquidity_within_2pct_matches_bias: bool,
    pub recent_liquidity_sweep_in_our_direction: bool,
}

/// Base weighted-sum score over detected components (`spec.md` §4.7 table).
fn base_score(ctx: &ScoringContext) -> f64 {
    let mut score = 0.0;

    if ctx.structure_break_in_last_5_bars {
        score += 20.0;
    }
    score += (ctx.bundle.whale_blocks.len() as f64 * 10.0).min(25.0);
    score += (ctx.bundle.liquidity_zones.len() as f64 * 5.0).min(20.0);
    score += (ctx.bundle.order_blocks.len() as f64 * 5.0).min(15.0);
    score += (ctx.bundle.fvgs.len() as f64 * 3.0).min(10.0);
    score += (ctx.aligned_tf_count as f64 * 3.0).min(10.0);
    score += (ctx.bundle.breaker_blocks.len() as f64 * 3.0).min(8.0);
    if !ctx.bundle.mitigation_blocks.is_empty() {
        score += 5.0;
    }
    if !ctx.bundle.sibi_ssib_zones.is_empty() {
        score += 5.0;
    }
    if ctx.displacement_in_last_3_bars {
        score += 10.0;
    }
    score += (ctx.risk_reward_ratio / 2.0 * 5.0).min(10.0);
    if ctx.nearest_sr_within_2pct {
        score += 15.0;
    }
    if ctx.luxalgo_bias_aligned {
        score += 10.0;
    }
    if ctx.luxalgo_entry_validated {
        score += 10.0;
    }
    if ctx.price_in_ote_zone {
        score += 10.0;
    }

    score
}

/// Multiplicative non-directional-bias penalty (`spec.md` §4.7).
fn non_directional_penalty(ctx: &ScoringContext) -> f64 {
    if ctx.bias.is_directional() {
        return 1.0;
    }
    let mut multiplier = 0.8;
    if ctx.is_alt_independent_symbol && ctx.own_structure_rescued_from_htf {
        multiplier *= 0.20;
    } else if ctx.htf_non_directional && ctx.own_structure_non_directional {
        multiplier *= 0.40;
    } else if ctx.htf_non_directional {
        multiplier *= 0.35;
    }
    multiplier
}

/// Apply the full soft-penalty/boost chain and clamp to [0,100].
pub fn score(ctx: &ScoringContext) -> f64 {
    let mut result = base_score(ctx);
    result *= non_directional_penalty(ctx);

    if ctx.entry_distance_pct < 0.5 {
        result *= 0.9;
    }

    if ctx.nearest_liquidity_within_2pct_matches_bias {
        result *= 1.05;
    }
    if ctx.recent_liquidity_sweep_in_our_direction {
        result *= 1.03;
    }

    result.clamp(0.0, 100.0)
}
