//! Zone-detector facade — the single "detect all components on this bar
//! range" entry point (`spec.md` §4.2). Each family is independent; a
//! failing detector is downgraded to an empty list plus a `tracing::warn!`
//! and recorded in `ZoneBundle::degraded_families` rather than aborting the
//! whole bundle.

pub mod breaker_block;
pub mod fibonacci;
pub mod fvg;
pub mod liquidity_zone;
pub mod luxalgo_sr;
pub mod mitigation_block;
pub mod order_block;
pub mod sibi_ssib;
pub mod whale_block;

use crate::config::PipelineConfig;
use crate::domain::{Bar, Bias, ZoneBundle};

/// Run every detector family over `bars` and assemble a `ZoneBundle`.
/// `bias` feeds the Fibonacci overlay's swing orientation; feature flags in
/// `config` gate breaker/mitigation/SIBI-SSIB detection (`spec.md` §6).
pub fn detect_all(bars: &[Bar], bias: Bias, config: &PipelineConfig) -> ZoneBundle {
    let mut bundle = ZoneBundle::default();

    bundle.order_blocks = run(&mut bundle.degraded_families, "order_block", || {
        order_block::detect(bars)
    });

    bundle.fvgs = run(&mut bundle.degraded_families, "fvg", || fvg::detect(bars));
    fvg::apply_mitigation(&mut bundle.fvgs, bars, 50.0);

    bundle.whale_blocks = run(&mut bundle.degraded_families, "whale_block", || {
        whale_block::detect(bars)
    });

    let liquidity_all = run(&mut bundle.degraded_families, "liquidity_zone", || {
        liquidity_zone::detect(bars)
    });
    bundle.liquidity_zones = liquidity_all.iter().filter(|z| !z.mitigated).cloned().collect();
    bundle.liquidity_sweeps = liquidity_all.into_iter().filter(|z| z.mitigated).collect();

    bundle.internal_liquidity = run(&mut bundle.degraded_families, "internal_liquidity", || {
        liquidity_zone::detect_internal(bars)
    });

    if config.use_breaker_blocks {
        bundle.breaker_blocks = run(&mut bundle.degraded_families, "breaker_block", || {
            breaker_block::detect(&bundle.order_blocks, bars)
        });
    }

    if config.use_mitigation_blocks {
        bundle.mitigation_blocks = run(&mut bundle.degraded_families, "mitigation_block", || {
            mitigation_block::detect(&bundle.order_blocks, bars, 50.0)
        });
    }

    if config.use_sibi_ssib {
        bundle.sibi_ssib_zones = run(&mut bundle.degraded_families, "sibi_ssib", || {
            sibi_ssib::detect(bars, &bundle.fvgs)
        });
    }

    bundle.fibonacci_data = fibonacci::detect(bars, bias);
    bundle.luxalgo_sr = luxalgo_sr::detect(bars);

    bundle
}

fn run<F>(degraded: &mut Vec<&'static str>, family: &'static str, f: F) -> Vec<crate::domain::Zone>
where
    F: FnOnce() -> Result<Vec<crate::domain::Zone>, crate::error::DetectorError>,
{
    match f() {
        Ok(zones) => zones,
        Err(err) => {
            tracing::warn!(family, error = %err, "detector failed, substituting empty list");
            degraded.push(family);
            Vec::new()
        }
    }
}
