//! Take-profit engine Layer B (`spec.md` §4.6): scan obstacles in the path
//! between entry and a mathematical TP, score each contextually, and
//! rewrite the TP around any obstacle judged likely to reject price.

use crate::config::TpMinimumRr;
use crate::domain::{Bias, Zone};
use crate::take_profit::engine::{minimum_rr_for, rr_of};

const SAFE_TP_BUFFER_PCT: f64 = 0.3;

const HTF_ALIGNED_BONUS: f64 = 20.0;
const HTF_MISALIGNED_PENALTY: f64 = 20.0;
const DISPLACEMENT_OUR_DIRECTION_PENALTY: f64 = 15.0;
const HIGH_VOLUME_BONUS: f64 = 10.0;
const MTF_CONFIRMATION_BONUS: f64 = 15.0;
const STALE_OBSTACLE_PENALTY: f64 = 5.0;

const VERY_LIKELY_REJECTION: f64 = 75.0;
const LIKELY_REJECTION: f64 = 60.0;
const UNCERTAIN: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathObstacle {
    pub price: f64,
    pub raw_strength: f64,
    pub evaluated_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionVerdict {
    VeryLikelyRejection,
    LikelyRejection,
    Uncertain,
    LikelyPenetration,
}

impl RejectionVerdict {
    pub fn confidence(&self) -> f64 {
        match self {
            RejectionVerdict::VeryLikelyRejection => 85.0,
            RejectionVerdict::LikelyRejection => 70.0,
            RejectionVerdict::Uncertain => 50.0,
            RejectionVerdict::LikelyPenetration => 70.0,
        }
    }

    fn classify(score: f64) -> Self {
        if score >= VERY_LIKELY_REJECTION {
            RejectionVerdict::VeryLikelyRejection
        } else if score >= LIKELY_REJECTION {
            RejectionVerdict::LikelyRejection
        } else if score >= UNCERTAIN {
            RejectionVerdict::Uncertain
        } else {
            RejectionVerdict::LikelyPenetration
        }
    }
}

/// Contextual adjustments applied to an obstacle's raw quality score
/// (`spec.md` §4.6 step 2).
pub struct ObstacleContext {
    pub htf_bias_aligned_with_obstacle: bool,
    pub displacement_in_our_direction: bool,
    pub high_volume_at_obstacle: bool,
    pub mtf_confirms: bool,
    pub obstacle_is_stale: bool,
}

pub fn evaluate(raw_strength: f64, ctx: &ObstacleContext) -> f64 {
    let mut score = raw_strength;
    score += if ctx.htf_bias_aligned_with_obstacle {
        HTF_ALIGNED_BONUS
    } else {
        -HTF_MISALIGNED_PENALTY
    };
    if ctx.displacement_in_our_direction {
        score -= DISPLACEMENT_OUR_DIRECTION_PENALTY;
    }
    if ctx.high_volume_at_obstacle {
        score += HIGH_VOLUME_BONUS;
    }
    if ctx.mtf_confirms {
        score += MTF_CONFIRMATION_BONUS;
    }
    if ctx.obstacle_is_stale {
        score -= STALE_OBSTACLE_PENALTY;
    }
    score.clamp(0.0, 100.0)
}

/// Opposing-polarity zones (order blocks, FVGs, whale blocks) plus
/// support/resistance levels that lie strictly between `entry_price` and
/// `tp_price`, sorted by proximity to entry. `sr_levels` supplies the
/// resistance-for-LONG / support-for-SHORT path obstacles from `spec.md`
/// §4.6 step 1 — a level is an obstacle purely by lying in the path; it
/// carries no polarity tag of its own.
pub fn scan_path(
    entry_price: f64,
    tp_price: f64,
    bias: Bias,
    candidate_zones: &[Zone],
    sr_levels: &[crate::domain::SrLevel],
) -> Vec<PathObstacle> {
    let (low, high) = if tp_price >= entry_price {
        (entry_price, tp_price)
    } else {
        (tp_price, entry_price)
    };

    let opposing_polarity = match bias {
        Bias::Bullish => crate::domain::Polarity::Bearish,
        _ => crate::domain::Polarity::Bullish,
    };

    let mut obstacles: Vec<PathObstacle> = candidate_zones
        .iter()
        .filter(|z| z.is_active() && z.polarity == opposing_polarity)
        .filter(|z| z.center() > low && z.center() < high)
        .map(|z| PathObstacle {
            price: z.center(),
            raw_strength: z.strength,
            evaluated_strength: z.strength,
        })
        .collect();

    obstacles.extend(
        sr_levels
            .iter()
            .filter(|sr| sr.price > low && sr.price < high)
            .map(|sr| PathObstacle {
                price: sr.price,
                raw_strength: sr.strength,
                evaluated_strength: sr.strength,
            }),
    );

    obstacles.sort_by(|a, b| {
        (a.price - entry_price)
            .abs()
            .partial_cmp(&(b.price - entry_price).abs())
            .unwrap()
    });

    obstacles
}

/// Layer B step 3: if the nearest sufficiently-strong obstacle would likely
/// reject price, propose a safe TP just in front of it, accepting it only
/// if the resulting R:R still meets the per-TP minimum.
pub fn adjust_tp(
    mathematical_tp: f64,
    entry_price: f64,
    r: f64,
    tp_index: usize,
    bias: Bias,
    obstacles: &[PathObstacle],
    floors: &TpMinimumRr,
) -> (f64, Option<String>) {
    let Some(obstacle) = obstacles.iter().find(|o| o.evaluated_strength >= LIKELY_REJECTION) else {
        return (mathematical_tp, None);
    };

    let safe_tp = match bias {
        Bias::Bullish => obstacle.price * (1.0 - SAFE_TP_BUFFER_PCT / 100.0),
        _ => obstacle.price * (1.0 + SAFE_TP_BUFFER_PCT / 100.0),
    };

    let safe_rr = rr_of(safe_tp, entry_price, r);
    let floor = minimum_rr_for(tp_index, floors);

    if safe_rr >= floor {
        (safe_tp, None)
    } else {
        let warning = format!(
            "obstacle at {:.2} (strength {:.0}) may reject price before TP{}; kept mathematical anchor to preserve R:R",
            obstacle.price,
            obstacle.evaluated_strength,
            tp_index + 1
        );
        (mathematical_tp, Some(warning))
    }
}

pub fn verdict_for(score: f64) -> RejectionVerdict {
    RejectionVerdict::classify(score)
}
