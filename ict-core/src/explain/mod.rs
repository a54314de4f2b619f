//! Natural-language zone summaries (`spec.md` §9 supplement). A small
//! formatter over an already-detected `ZoneBundle`, not a new detector —
//! grounded on `examples/original_source/zone_explainer.py`'s
//! `ZoneExplainer`, which narrates why each zone matters (displacement,
//! volume, retests, bias alignment) rather than computing anything new.
//!
//! Gated behind `PipelineConfig.use_zone_explanations`; when off, the
//! pipeline never calls into this module and `Signal.zone_explanations`
//! stays empty.

use crate::domain::{Bias, Polarity, Zone, ZoneBundle, ZoneExplanation, ZoneMeta};

/// One explanation per active, directional zone in `bundle`, oriented by
/// the resolved trade `bias`. Liquidity-side zones (which carry
/// `LiquiditySide` rather than `Polarity`) get a lighter, side-based
/// summary instead of a bias-alignment call-out.
pub fn explain_bundle(bundle: &ZoneBundle, bias: Bias) -> Vec<ZoneExplanation> {
    let mut out = Vec::new();

    for zone in bundle.all_directional_zones() {
        out.push(explain_zone(zone, bias));
    }
    for zone in bundle.liquidity_zones.iter().chain(bundle.liquidity_sweeps.iter()) {
        out.push(explain_liquidity(zone));
    }

    out
}

fn bias_alignment_note(zone_polarity: Polarity, bias: Bias) -> &'static str {
    let aligned = match bias {
        Bias::Bullish => zone_polarity == Polarity::Bullish,
        Bias::Bearish => zone_polarity == Polarity::Bearish,
        _ => false,
    };
    if aligned {
        "aligns with the current bias"
    } else {
        "conflicts with the current bias; treat as lower-probability until confirmed"
    }
}

fn explain_zone(zone: &Zone, bias: Bias) -> ZoneExplanation {
    let direction = if zone.polarity == Polarity::Bullish {
        "bullish"
    } else {
        "bearish"
    };
    let alignment = bias_alignment_note(zone.polarity, bias);
    let retest_note = |count: u32| {
        if count == 0 {
            "untested — first retest may be the optimal entry".to_string()
        } else {
            format!("tested {count}x already; still valid if holding")
        }
    };

    let detail = match &zone.meta {
        ZoneMeta::OrderBlock {
            displacement_pct,
            volume_spike,
            retest_count,
        } => format!(
            "displacement {displacement_pct:.2}%, volume {volume_spike:.1}x average, {}",
            retest_note(*retest_count)
        ),
        ZoneMeta::WhaleBlock {
            displacement_pct,
            volume_spike,
            wick_ratio,
        } => format!(
            "displacement {displacement_pct:.2}%, volume {volume_spike:.1}x average, wick ratio {wick_ratio:.2} — institutional footprint"
        ),
        ZoneMeta::FairValueGap { gap_size_pct } => {
            format!("{gap_size_pct:.2}% imbalance left by displacement; a likely magnet for a retrace")
        }
        ZoneMeta::BreakerBlock {
            origin_polarity,
            breach_bar_index,
        } => format!(
            "originally a {} order block, breached at bar {breach_bar_index} (change of character); now trades with opposite polarity",
            if *origin_polarity == Polarity::Bullish { "bullish" } else { "bearish" }
        ),
        ZoneMeta::MitigationBlock { revisit_pct } => {
            format!("price has revisited {revisit_pct:.1}% of this zone; partial mitigation in progress")
        }
        ZoneMeta::SibiSsib {
            displacement_pct,
            void_size_pct,
        } => format!("{void_size_pct:.2}% void left by a {displacement_pct:.2}% displacement move"),
        ZoneMeta::LiquidityZone { .. } => unreachable!("liquidity zones are explained separately"),
    };

    let family_name = zone.family.label();
    ZoneExplanation {
        family: family_name,
        summary: format!("{direction} {family_name} (strength {:.0}/100): {detail}; {alignment}.", zone.strength),
    }
}

fn explain_liquidity(zone: &Zone) -> ZoneExplanation {
    let (side, swept) = match &zone.meta {
        ZoneMeta::LiquidityZone { side, swept, equal_level_count } => (*side, *swept, *equal_level_count),
        _ => return ZoneExplanation {
            family: "liquidity zone",
            summary: "liquidity zone with unexpected metadata".to_string(),
        },
    };
    let side_label = match side {
        crate::domain::LiquiditySide::Bsl => "buy-side liquidity (equal highs)",
        crate::domain::LiquiditySide::Ssl => "sell-side liquidity (equal lows)",
    };
    let status = if swept {
        "already swept — institutions have taken this liquidity"
    } else {
        "not yet swept — a likely draw on liquidity"
    };
    ZoneExplanation {
        family: "liquidity zone",
        summary: format!(
            "{side_label} across {equal_level_count} level(s): {status}."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ZoneFamily;

    fn ob(polarity: Polarity) -> Zone {
        Zone {
            family: ZoneFamily::OrderBlock,
            low: 100.0,
            high: 102.0,
            polarity,
            strength: 75.0,
            bar_index: 10,
            mitigated: false,
            meta: ZoneMeta::OrderBlock {
                volume_spike: 1.8,
                displacement_pct: 0.9,
                retest_count: 0,
            },
        }
    }

    #[test]
    fn aligned_order_block_notes_alignment() {
        let explanation = explain_zone(&ob(Polarity::Bullish), Bias::Bullish);
        assert!(explanation.summary.contains("aligns with the current bias"));
    }

    #[test]
    fn conflicting_order_block_notes_conflict() {
        let explanation = explain_zone(&ob(Polarity::Bearish), Bias::Bullish);
        assert!(explanation.summary.contains("conflicts with the current bias"));
    }

    #[test]
    fn explain_bundle_covers_every_active_family() {
        let mut bundle = ZoneBundle::default();
        bundle.order_blocks.push(ob(Polarity::Bullish));
        let explanations = explain_bundle(&bundle, Bias::Bullish);
        assert_eq!(explanations.len(), 1);
    }
}
