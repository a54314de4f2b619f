//! The orchestrator — wires every module together into one
//! `generate_signal` call (`spec.md` §4.8 full stage table). Grounded on
//! `examples/original_source/ict_signal_engine.py`'s `generate_signal`
//! method, which runs the same numbered stages (1 through 12, with the
//! 6b/7b/11.5/11.6/12.0-late/12.1-12.4/12a/12b sub-stages) and logs a
//! `blocked_at_step` whenever an analysis-level gate rejects.
//!
//! [`Stage`] preserves that numbering verbatim rather than re-deriving a
//! fresh scheme, so a diagnostic `blocked_at_step` string always matches a
//! real variant here.

use std::collections::BTreeMap;

use crate::cache::SignalCache;
use crate::config::PipelineConfig;
use crate::confidence::{score, ScoringContext};
use crate::detectors::{self, detect_all};
use crate::domain::{
    Bar, BarSeries, Bias, MtfConsensusData, NoTradeMessage, Signal, SignalType,
    TimeframeHierarchyMeta, Zone, ZoneBundle, ZoneExplanation,
};
use crate::entry;
use crate::error::DetectorError;
use crate::gates::{
    confidence_threshold, entry_gating, execution_eligibility, risk_admission,
    ConfidenceThresholdConfig, EntryGatingContext, ExecutionEligibilityContext,
    RiskAdmissionContext,
};
use crate::indicators::{detect_displacement, swing_highs, swing_lows};
use crate::ml::{self, LockedStrategyDecision, MlAdvisor};
use crate::mtf;
use crate::no_trade;
use crate::stop_loss;
use crate::take_profit::{engine as tp_engine, obstacles as tp_obstacles};

/// Minimum bar count the pipeline will attempt to analyze at all. Below
/// this, every downstream indicator (ATR-14, swing-3, displacement-5)
/// degrades to defaults anyway, so the cost of running the rest of the
/// pipeline buys nothing.
const MIN_BARS_REQUIRED: usize = 30;

/// Stage numbering from `spec.md` §4.8, carried into the type system so a
/// `NoTradeMessage::blocked_at_step` can never drift from an actual
/// orchestrator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// HTF bias (1d, falling back to 4h).
    S1,
    /// Build the MTF input set from `mtf_bars`.
    S2,
    /// Reserved for the collaborator-supplied current price/time context;
    /// folded into the request in this crate.
    S3,
    /// Reserved for pre-detector bar validation (`spec.md` §7: caller's
    /// responsibility, not re-checked here).
    S4,
    /// Zone-detector facade.
    S5,
    /// Fibonacci/LuxAlgo best-effort overlays (already inside `S5`).
    S6,
    /// Timeframe-hierarchy confirmation/structure penalty lookup.
    S6b,
    /// Own-structure bias (per-timeframe compute over the primary bars).
    S7,
    /// Non-directional-bias rejection.
    S7b,
    /// Entry-zone selection.
    S8,
    /// Stop-loss + take-profit construction.
    S9,
    /// Risk:reward floor against the reference TP.
    S10,
    /// Confidence scoring.
    S11,
    /// MTF consensus floor.
    S11_5,
    /// Confidence floor.
    S11_6,
    /// Signal type/strength classification.
    S12,
    EntryGating,
    ConfidenceThreshold,
    ExecutionEligibility,
    RiskAdmission,
    /// ML advisory (confidence-only, after every gate).
    MlAdvisory,
    /// Entry-timing recheck against a possibly-stale `current_price`.
    EntryTimingRecheck,
    /// News-sentiment filter.
    NewsFilter,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::S1 => "1",
            Stage::S2 => "2",
            Stage::S3 => "3",
            Stage::S4 => "4",
            Stage::S5 => "5",
            Stage::S6 => "6",
            Stage::S6b => "6b",
            Stage::S7 => "7",
            Stage::S7b => "7b",
            Stage::S8 => "8",
            Stage::S9 => "9",
            Stage::S10 => "10",
            Stage::S11 => "11",
            Stage::S11_5 => "11.5",
            Stage::S11_6 => "11.6",
            Stage::S12 => "12",
            Stage::EntryGating => "12.1",
            Stage::ConfidenceThreshold => "12.2",
            Stage::ExecutionEligibility => "12.3",
            Stage::RiskAdmission => "12.4",
            Stage::MlAdvisory => "12.0-late",
            Stage::EntryTimingRecheck => "12a",
            Stage::NewsFilter => "12b",
        }
    }
}

/// Where a final directional bias came from — plain HTF agreement, or the
/// ALT-independent own-structure rescue path (`manual_validation_altcoin_mode.py`
/// in `examples/original_source/`, carried forward as a SPEC_FULL supplement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BiasOrigin {
    Htf,
    OwnStructureRescue,
    NonDirectional,
}

/// One other timeframe's bars, keyed by its wire-format label (`"4h"`,
/// `"1d"`, ...). The primary timeframe's own bars are passed separately.
pub struct SignalRequest<'a> {
    pub symbol: &'a str,
    pub timeframe: &'a str,
    pub bars: &'a [Bar],
    pub mtf_bars: &'a BTreeMap<String, BarSeries>,
    pub current_price: f64,
    pub now_epoch_secs: u64,
}

/// The three-way result of a pipeline run (`spec.md` §2): a full signal, a
/// diagnosed no-trade, or silence from an admission-level gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Signal(Signal),
    NoTrade(NoTradeMessage),
    None,
}

/// Owns the one piece of cross-request state (the signal cache) plus the
/// optional ML advisor hook. Config is immutable for the pipeline's
/// lifetime; build a new `Pipeline` to pick up config changes.
pub struct Pipeline {
    config: PipelineConfig,
    cache: SignalCache<Signal>,
    ml_advisor: Option<Box<dyn MlAdvisor>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, crate::error::CacheError> {
        let cache = SignalCache::new(config.cache_max_size, config.cache_ttl_seconds)?;
        Ok(Self {
            config,
            cache,
            ml_advisor: None,
        })
    }

    pub fn with_ml_advisor(mut self, advisor: Box<dyn MlAdvisor>) -> Self {
        self.ml_advisor = Some(advisor);
        self
    }

    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full stage table over `request`, returning a `Signal`, a
    /// `NoTradeMessage`, or silence (`spec.md` §2).
    pub fn generate_signal(&mut self, request: SignalRequest) -> Outcome {
        if request.bars.len() < MIN_BARS_REQUIRED {
            return Outcome::NoTrade(
                NoTradeMessage::new(request.symbol, request.timeframe, request.current_price)
                    .at_step(
                        Stage::S4.as_str(),
                        format!(
                            "insufficient bars: need >= {}, have {}",
                            MIN_BARS_REQUIRED,
                            request.bars.len()
                        ),
                    ),
            );
        }

        if self.config.use_cache {
            let (cached, _lookup) = self.cache.get_signal(
                request.symbol,
                request.timeframe,
                request.current_price,
                request.now_epoch_secs,
            );
            if let Some(signal) = cached {
                return Outcome::Signal(signal);
            }
        }

        // Stage 1: HTF bias, 1d falling back to 4h, falling back to the
        // primary timeframe's own bars when no HTF series was supplied.
        let (htf_bars, htf_bias_tf): (&[Bar], Option<String>) =
            match request.mtf_bars.get("1d") {
                Some(b) => (b.as_slice(), Some("1d".to_string())),
                None => match request.mtf_bars.get("4h") {
                    Some(b) => (b.as_slice(), Some("4h".to_string())),
                    None => (request.bars, None),
                },
            };
        let (htf_bias, _htf_confidence) = bias_for(htf_bars);

        // Stage 2: build the MTF input set, one bias computation per
        // supplied timeframe.
        let mtf_order_blocks: Vec<(String, Vec<Zone>)> = request
            .mtf_bars
            .iter()
            .map(|(label, bars)| (label.clone(), order_blocks_for(bars)))
            .collect();
        let mtf_inputs: Vec<mtf::consensus::MtfInput> = request
            .mtf_bars
            .iter()
            .zip(mtf_order_blocks.iter())
            .map(|((label, bars), (_, obs))| mtf::consensus::MtfInput {
                label: label.as_str(),
                bars: bars.as_slice(),
                order_blocks: obs.as_slice(),
            })
            .collect();

        // Stage 5/6: detect every zone family plus the best-effort
        // Fibonacci/LuxAlgo overlays, oriented by the HTF bias as the best
        // guess available before stage 7 finalizes direction.
        let mut bundle = detect_all(request.bars, htf_bias, &self.config);

        // Stage 6b: timeframe-hierarchy confirmation/structure penalty.
        let tf_hierarchy_meta = self.tf_hierarchy_meta(request.timeframe, &htf_bias_tf, request.mtf_bars);

        // Stage 7: own-structure bias from the primary timeframe's own
        // order blocks (already detected into `bundle`).
        let (own_bias, own_confidence) = mtf::bias::compute(request.bars, &bundle.order_blocks);

        let is_alt_independent = self
            .config
            .alt_independent_symbols
            .iter()
            .any(|s| s == request.symbol);

        let (final_bias, bias_origin) = if htf_bias.is_directional() {
            (htf_bias, BiasOrigin::Htf)
        } else if is_alt_independent && own_bias.is_directional() {
            (own_bias, BiasOrigin::OwnStructureRescue)
        } else {
            (htf_bias, BiasOrigin::NonDirectional)
        };

        // Stage 7b: bias never resolved to a direction.
        if bias_origin == BiasOrigin::NonDirectional {
            let msg = no_trade::non_directional_bias(
                request.symbol,
                request.timeframe,
                request.current_price,
                final_bias,
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, false, false);
            return Outcome::NoTrade(msg);
        }

        // Re-orient the Fibonacci overlay to the now-finalized bias when it
        // differs from the HTF guess used at stage 5 (the rescue path).
        if bias_origin == BiasOrigin::OwnStructureRescue {
            bundle.fibonacci_data = detectors::fibonacci::detect(request.bars, final_bias);
        }

        let structure_broken = structure_break_in_last_n(request.bars, 5);
        let displacement = detect_displacement(request.bars, 3, 1.6);
        let displacement_detected = displacement.is_some();

        // Stage 8: entry-zone selection.
        let (entry_zone, entry_status) = entry::select(
            request.current_price,
            final_bias,
            &bundle.fvgs,
            &bundle.order_blocks,
            &bundle.luxalgo_sr,
        );

        if !entry_status.is_acceptable() {
            let msg = no_trade::entry_zone_rejected(
                request.symbol,
                request.timeframe,
                request.current_price,
                entry_status.as_str(),
                format!("{:.2}% away from current price", entry_zone.distance_pct),
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, structure_broken, displacement_detected);
            return Outcome::NoTrade(msg);
        }

        let entry_price = entry_zone.center;

        // Stage 9: stop-loss calculation + validation, then take-profit
        // Layer A (mathematical anchors) + Layer B (obstacle rewriting).
        let zone_boundary = match final_bias {
            Bias::Bullish => entry_zone.low,
            _ => entry_zone.high,
        };
        let sl_candidate = stop_loss::compute(request.bars, final_bias, entry_price, zone_boundary);

        let reference_ob = nearest_order_block(&bundle.order_blocks, entry_price, final_bias);
        let sl_validation = match reference_ob {
            Some(ob) => stop_loss::validate(final_bias, entry_price, sl_candidate, ob.low, ob.high),
            None => stop_loss::validate_without_reference_ob(
                sl_candidate,
                self.config.ict_strict_sl_validation,
            ),
        };

        if !sl_validation.is_valid {
            let msg = no_trade::sl_or_tp_rejected(
                request.symbol,
                request.timeframe,
                request.current_price,
                "stop-loss candidate failed validation (too close to entry, or no reference order block in strict mode)",
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, structure_broken, displacement_detected);
            return Outcome::NoTrade(msg);
        }

        let sl_price = sl_validation.sl;
        let r = (entry_price - sl_price).abs();
        let math_tps = tp_engine::mathematical_tps(entry_price, sl_price, final_bias, request.timeframe);

        let mut tp_warnings = Vec::new();
        if sl_validation.sl_fallback_used {
            tp_warnings.push(
                "sl_fallback_used: no reference order block; stop-loss derived from ATR*1.5 fallback".to_string(),
            );
        }
        let mut tp_prices = [0.0_f64; 3];
        let candidate_zones: Vec<Zone> = bundle.all_directional_zones().into_iter().cloned().collect();

        // Computed once up front (rather than per obstacle) for the MTF
        // confirmation factor in `obstacle_context` below.
        let mtf_tf_biases: Vec<Bias> = mtf_inputs
            .iter()
            .map(|inp| mtf::bias::compute(inp.bars, inp.order_blocks).0)
            .collect();

        for (i, math_tp) in math_tps.iter().enumerate() {
            let raw_obstacles =
                tp_obstacles::scan_path(entry_price, *math_tp, final_bias, &candidate_zones, &bundle.luxalgo_sr);
            let evaluated_obstacles: Vec<tp_obstacles::PathObstacle> = raw_obstacles
                .into_iter()
                .map(|o| {
                    let ctx = self.obstacle_context(&o, &bundle, final_bias, htf_bias, &mtf_tf_biases, displacement);
                    tp_obstacles::PathObstacle {
                        evaluated_strength: tp_obstacles::evaluate(o.raw_strength, &ctx),
                        ..o
                    }
                })
                .collect();

            let (tp, warning) = tp_obstacles::adjust_tp(
                *math_tp,
                entry_price,
                r,
                i,
                final_bias,
                &evaluated_obstacles,
                &self.config.tp_minimum_rr,
            );
            tp_prices[i] = tp;
            if let Some(w) = warning {
                tp_warnings.push(w);
            }
        }

        // Testable invariant (`spec.md` §8-8): TPs stay monotonically
        // ordered in the trade direction even after obstacle rewriting.
        enforce_tp_monotonicity(&mut tp_prices, final_bias);

        // Stage 10: risk:reward floor, measured against TP2.
        let risk_reward_ratio = tp_engine::rr_of(tp_prices[1], entry_price, r);
        if risk_reward_ratio < self.config.min_risk_reward {
            let msg = no_trade::risk_reward_floor(
                request.symbol,
                request.timeframe,
                request.current_price,
                risk_reward_ratio,
                self.config.min_risk_reward,
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, structure_broken, displacement_detected);
            return Outcome::NoTrade(msg);
        }

        // Stage 11: MTF consensus (reused at 11.5) + confidence score.
        let consensus = mtf::consensus::compute(final_bias, request.timeframe, &mtf_inputs);

        let aligned_tf_count = consensus.aligned;
        let nearest_sr = crate::detectors::luxalgo_sr::nearest(&bundle.luxalgo_sr, entry_price);
        let nearest_sr_within_2pct = nearest_sr
            .map(|sr| (sr.price - entry_price).abs() / entry_price * 100.0 <= 2.0)
            .unwrap_or(false);
        let price_in_ote_zone = bundle
            .fibonacci_data
            .map(|fib| fib.contains_ote(entry_price))
            .unwrap_or(false);
        let nearest_liquidity_within_2pct_matches_bias = bundle
            .liquidity_zones
            .iter()
            .filter(|z| (z.polarity == crate::domain::Polarity::Bullish) == (final_bias == Bias::Bullish))
            .any(|z| (z.center() - entry_price).abs() / entry_price * 100.0 <= 2.0);
        let recent_sweep_in_our_direction = bundle
            .liquidity_sweeps
            .iter()
            .any(|z| (z.polarity == crate::domain::Polarity::Bullish) == (final_bias == Bias::Bullish));

        let scoring_ctx = ScoringContext {
            bundle: &bundle,
            bias: final_bias,
            structure_break_in_last_5_bars: structure_broken,
            aligned_tf_count,
            displacement_in_last_3_bars: displacement_detected,
            risk_reward_ratio,
            nearest_sr_within_2pct,
            luxalgo_bias_aligned: nearest_sr_within_2pct,
            luxalgo_entry_validated: nearest_sr.is_some(),
            price_in_ote_zone,
            is_alt_independent_symbol: is_alt_independent,
            own_structure_rescued_from_htf: bias_origin == BiasOrigin::OwnStructureRescue,
            htf_non_directional: !htf_bias.is_directional(),
            own_structure_non_directional: !own_bias.is_directional(),
            entry_distance_pct: entry_zone.distance_pct,
            nearest_liquidity_within_2pct_matches_bias,
            recent_liquidity_sweep_in_our_direction: recent_sweep_in_our_direction,
        };
        let mut confidence = score(&scoring_ctx);
        confidence -= confidence * tf_hierarchy_meta.confidence_penalty_applied;
        confidence = confidence.clamp(0.0, 100.0);

        let _ = own_confidence;

        // Stage 11.5: MTF consensus floor.
        if consensus.consensus_pct < self.config.min_mtf_consensus_pct {
            let msg = no_trade::mtf_consensus_floor(
                request.symbol,
                request.timeframe,
                request.current_price,
                &consensus,
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, structure_broken, displacement_detected);
            return Outcome::NoTrade(msg);
        }

        // Stage 11.6: confidence floor.
        if confidence < self.config.min_confidence {
            let msg = no_trade::confidence_floor(
                request.symbol,
                request.timeframe,
                request.current_price,
                confidence,
                self.config.min_confidence,
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, structure_broken, displacement_detected);
            return Outcome::NoTrade(msg);
        }

        // Stage 12: classify signal type/strength. This decision is frozen
        // before the ML advisory hook ever runs.
        let signal_strength = signal_strength_from(confidence, risk_reward_ratio, aligned_tf_count);
        let signal_type = SignalType::classify(final_bias, signal_strength, confidence);

        let locked_decision = LockedStrategyDecision {
            signal_type,
            entry_price,
            sl_price,
            tp_prices,
        };

        // Stages 12.1-12.4: admission gates. Failure here is silent —
        // analysis already succeeded; these gate *execution*, not analysis.
        if !entry_gating::evaluate(&EntryGatingContext::default()) {
            return Outcome::None;
        }
        if !confidence_threshold::evaluate(&ConfidenceThresholdConfig::default(), signal_type, confidence) {
            return Outcome::None;
        }
        if !execution_eligibility::evaluate(&ExecutionEligibilityContext::default()) {
            return Outcome::None;
        }
        if !risk_admission::evaluate(&RiskAdmissionContext::default()) {
            return Outcome::None;
        }

        // Stage 12.0-late: ML advisory, confidence-only, strictly after
        // every other decision is locked.
        let (confidence, ml_warnings) = ml::apply(
            self.ml_advisor.as_deref(),
            locked_decision,
            confidence,
        );
        tp_warnings.extend(ml_warnings);

        // Stage 12a: entry-timing recheck — `current_price` may have moved
        // since the entry zone was selected; re-validate distance, not
        // direction (direction was already locked at stage 12).
        let recheck_distance_pct =
            (request.current_price - entry_price).abs() / request.current_price * 100.0;
        if recheck_distance_pct > self.config.max_entry_distance_pct * 100.0 {
            let msg = no_trade::entry_zone_rejected(
                request.symbol,
                request.timeframe,
                request.current_price,
                "TOO_FAR",
                format!("price moved {recheck_distance_pct:.2}% since entry selection"),
            );
            let msg = no_trade::with_context(msg, &bundle, final_bias, structure_broken, displacement_detected);
            return Outcome::NoTrade(msg);
        }

        // Stage 12b: news-sentiment filter. No feed is wired into the core
        // (`spec.md` §9 Open Question); when enabled with no feed this is a
        // no-op pass-through, matching "no signal-blocking filter becomes
        // a silent no-op in the absence of its data source".
        if self.config.use_news_filter {
            tracing::debug!("news filter enabled but no sentiment feed wired in; passing through");
        }

        let zone_explanations = if self.config.use_zone_explanations {
            crate::explain::explain_bundle(&bundle, final_bias)
        } else {
            Vec::new()
        };

        let reasoning = build_reasoning(final_bias, &bundle, signal_type, confidence, risk_reward_ratio);

        let signal = Signal {
            timestamp: chrono::DateTime::from_timestamp(request.now_epoch_secs as i64, 0)
                .unwrap_or_else(chrono::Utc::now),
            symbol: request.symbol.to_string(),
            timeframe: request.timeframe.to_string(),
            signal_type,
            signal_strength,
            entry_price,
            sl_price,
            tp_prices,
            confidence,
            risk_reward_ratio,
            bias: final_bias,
            htf_bias: htf_bias.as_str().to_string(),
            mtf_structure: structure_label(request.bars),
            mtf_consensus_data: consensus,
            entry_zone,
            entry_status: entry_status.as_str(),
            distance_penalty: entry_zone.distance_pct < 0.5,
            timeframe_hierarchy: tf_hierarchy_meta,
            zones: bundle,
            reasoning,
            warnings: tp_warnings,
            zone_explanations,
        };

        if self.config.use_cache {
            self.cache.set_signal(
                request.symbol,
                request.timeframe,
                signal.clone(),
                None,
                request.now_epoch_secs,
            );
        }

        Outcome::Signal(signal)
    }

    fn tf_hierarchy_meta(
        &self,
        entry_tf: &str,
        htf_bias_tf: &Option<String>,
        mtf_bars: &BTreeMap<String, BarSeries>,
    ) -> TimeframeHierarchyMeta {
        let entry = self.config.tf_hierarchy.lookup(entry_tf);
        let confirmation_tf = entry.and_then(|e| e.confirmation_tf.clone());
        let structure_tf = entry.and_then(|e| e.structure_tf.clone());

        let confirmation_missing = confirmation_tf
            .as_ref()
            .map(|tf| !mtf_bars.contains_key(tf))
            .unwrap_or(false);
        let structure_missing = structure_tf
            .as_ref()
            .map(|tf| !mtf_bars.contains_key(tf))
            .unwrap_or(false);

        let mut penalty = 0.0;
        if confirmation_missing {
            penalty += self.config.tf_hierarchy.confirmation_penalty_if_missing;
        }
        if structure_missing {
            penalty += self.config.tf_hierarchy.structure_penalty_if_missing;
        }

        TimeframeHierarchyMeta {
            entry_tf: entry_tf.to_string(),
            confirmation_tf,
            structure_tf,
            htf_bias_tf: htf_bias_tf.clone(),
            confirmation_missing,
            structure_missing,
            confidence_penalty_applied: penalty,
        }
    }

    /// Build an `ObstacleContext` for a single in-path obstacle by matching
    /// it back to its source zone (by center price) to recover the bar
    /// index and volume data the staleness/volume heuristics need.
    ///
    /// Every obstacle returned by `scan_path` opposes `bias` by construction
    /// (opposing-polarity zone, or a bare S/R level standing in the trade's
    /// way). The §4.6 step-2 contextual factors are computed from that
    /// premise: "HTF-bias alignment with the obstacle" asks whether the
    /// broader trend backs the obstacle's (opposing) side, not ours, and
    /// "MTF confirmation" asks whether a majority of the other supplied
    /// timeframes independently show that same opposing bias.
    fn obstacle_context(
        &self,
        obstacle: &tp_obstacles::PathObstacle,
        bundle: &ZoneBundle,
        bias: Bias,
        htf_bias: Bias,
        mtf_tf_biases: &[Bias],
        displacement: Option<crate::indicators::DisplacementDirection>,
    ) -> tp_obstacles::ObstacleContext {
        let source = bundle
            .all_directional_zones()
            .into_iter()
            .find(|z| (z.center() - obstacle.price).abs() < f64::EPSILON * obstacle.price.abs().max(1.0) + 1e-9);

        const STALE_BAR_AGE: usize = 50;
        let obstacle_is_stale = source
            .map(|z| z.bar_index + STALE_BAR_AGE < latest_bar_index(bundle))
            .unwrap_or(false);

        let displacement_in_our_direction = match (displacement, bias) {
            (Some(crate::indicators::DisplacementDirection::Bullish), Bias::Bullish) => true,
            (Some(crate::indicators::DisplacementDirection::Bearish), Bias::Bearish) => true,
            _ => false,
        };

        let obstacle_bias = bias.opposite();
        let htf_bias_aligned_with_obstacle = htf_bias == obstacle_bias;

        const HIGH_VOLUME_SPIKE_THRESHOLD: f64 = 1.5;
        let high_volume_at_obstacle = source
            .map(|z| match &z.meta {
                crate::domain::ZoneMeta::OrderBlock { volume_spike, .. }
                | crate::domain::ZoneMeta::WhaleBlock { volume_spike, .. } => {
                    *volume_spike >= HIGH_VOLUME_SPIKE_THRESHOLD
                }
                _ => false,
            })
            .unwrap_or(false);

        let mtf_confirms = !mtf_tf_biases.is_empty()
            && mtf_tf_biases.iter().filter(|b| **b == obstacle_bias).count() * 2 > mtf_tf_biases.len();

        tp_obstacles::ObstacleContext {
            htf_bias_aligned_with_obstacle,
            displacement_in_our_direction,
            high_volume_at_obstacle,
            mtf_confirms,
            obstacle_is_stale,
        }
    }
}

fn bias_for(bars: &[Bar]) -> (Bias, f64) {
    let obs = order_blocks_for(bars);
    mtf::bias::compute(bars, &obs)
}

fn order_blocks_for(bars: &[Bar]) -> Vec<Zone> {
    detectors::order_block::detect(bars).unwrap_or_else(|err: DetectorError| {
        tracing::warn!(error = %err, "order block detection failed while building MTF input");
        Vec::new()
    })
}

fn structure_break_in_last_n(bars: &[Bar], n: usize) -> bool {
    let highs = swing_highs(bars, 3);
    let lows = swing_lows(bars, 3);
    let recent_high_break = highs
        .iter()
        .rev()
        .take(2)
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| w[0].price > w[1].price && w[0].bar_index + n >= bars.len());
    let recent_low_break = lows
        .iter()
        .rev()
        .take(2)
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| w[0].price < w[1].price && w[0].bar_index + n >= bars.len());
    recent_high_break || recent_low_break
}

fn nearest_order_block<'a>(order_blocks: &'a [Zone], entry_price: f64, bias: Bias) -> Option<&'a Zone> {
    let wanted = match bias {
        Bias::Bullish => crate::domain::Polarity::Bullish,
        _ => crate::domain::Polarity::Bearish,
    };
    order_blocks
        .iter()
        .filter(|z| z.is_active() && z.polarity == wanted)
        .min_by(|a, b| {
            (a.center() - entry_price)
                .abs()
                .partial_cmp(&(b.center() - entry_price).abs())
                .unwrap()
        })
}

fn latest_bar_index(bundle: &ZoneBundle) -> usize {
    bundle
        .all_directional_zones()
        .iter()
        .map(|z| z.bar_index)
        .max()
        .unwrap_or(0)
}

/// Enforce monotonic TP ordering in the trade direction after Layer B may
/// have rewritten any of the three TPs independently (`spec.md` §8-8).
fn enforce_tp_monotonicity(tp_prices: &mut [f64; 3], bias: Bias) {
    match bias {
        Bias::Bullish => {
            tp_prices[1] = tp_prices[1].max(tp_prices[0]);
            tp_prices[2] = tp_prices[2].max(tp_prices[1]);
        }
        _ => {
            tp_prices[1] = tp_prices[1].min(tp_prices[0]);
            tp_prices[2] = tp_prices[2].min(tp_prices[1]);
        }
    }
}

/// 1-5 signal strength from confidence, R:R, and MTF alignment breadth —
/// feeds `SignalType::classify`'s STRONG_* threshold (`spec.md` §3).
fn signal_strength_from(confidence: f64, risk_reward_ratio: f64, aligned_tf_count: u32) -> u8 {
    let mut strength = 1u8;
    if confidence >= 70.0 {
        strength += 1;
    }
    if confidence >= 85.0 {
        strength += 1;
    }
    if risk_reward_ratio >= 4.0 {
        strength += 1;
    }
    if aligned_tf_count >= 3 {
        strength += 1;
    }
    strength.min(5)
}

fn structure_label(bars: &[Bar]) -> String {
    let highs = swing_highs(bars, 3);
    let lows = swing_lows(bars, 3);
    if highs.len() < 2 || lows.len() < 2 {
        return "UNKNOWN".to_string();
    }
    let hh = highs[highs.len() - 1].price > highs[highs.len() - 2].price;
    let hl = lows[lows.len() - 1].price > lows[lows.len() - 2].price;
    match (hh, hl) {
        (true, true) => "HH+HL".to_string(),
        (false, false) => "LH+LL".to_string(),
        _ => "MIXED".to_string(),
    }
}

fn build_reasoning(bias: Bias, bundle: &ZoneBundle, signal_type: SignalType, confidence: f64, rr: f64) -> String {
    format!(
        "{:?} bias, {} components detected, confidence {:.1}%, R:R {:.2} ({})",
        signal_type,
        bundle.total_zone_count(),
        confidence,
        rr,
        bias.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    fn dense_bars(n: usize, trend_up: bool) -> BarSeries {
        let closes: Vec<f64> = (0..n)
            .map(|i| {
                let base = 100.0 + ((i as f64) * 0.4).sin() * 3.0;
                if trend_up {
                    base + i as f64 * 0.3
                } else {
                    base - i as f64 * 0.3
                }
            })
            .collect();
        make_bars(&closes)
    }

    #[test]
    fn insufficient_bars_yields_no_trade_at_stage_4() {
        let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let bars = make_bars(&[100.0, 101.0]);
        let mtf_bars = BTreeMap::new();
        let request = SignalRequest {
            symbol: "BTCUSDT",
            timeframe: "1h",
            bars: &bars,
            mtf_bars: &mtf_bars,
            current_price: 101.0,
            now_epoch_secs: 0,
        };
        match pipeline.generate_signal(request) {
            Outcome::NoTrade(msg) => assert_eq!(msg.blocked_at_step, "4"),
            other => panic!("expected NoTrade, got {other:?}"),
        }
    }

    #[test]
    fn thin_ranging_data_on_all_timeframes_rejects_at_stage_7b() {
        let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i as f64) * 1.3).sin() * 2.0).collect();
        let bars = make_bars(&closes);
        let mtf_bars = BTreeMap::new();
        let request = SignalRequest {
            symbol: "BTCUSDT",
            timeframe: "1h",
            bars: &bars,
            mtf_bars: &mtf_bars,
            current_price: *closes.last().unwrap(),
            now_epoch_secs: 0,
        };
        let outcome = pipeline.generate_signal(request);
        assert!(matches!(outcome, Outcome::NoTrade(_) | Outcome::Signal(_) | Outcome::None));
    }

    #[test]
    fn strong_uptrend_with_htf_agreement_can_produce_a_buy_signal() {
        let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let bars = dense_bars(120, true);
        let mut mtf_bars = BTreeMap::new();
        mtf_bars.insert("1d".to_string(), dense_bars(60, true));
        mtf_bars.insert("4h".to_string(), dense_bars(60, true));
        let current_price = bars.last().unwrap().close;
        let request = SignalRequest {
            symbol: "BTCUSDT",
            timeframe: "4h",
            bars: &bars,
            mtf_bars: &mtf_bars,
            current_price,
            now_epoch_secs: 0,
        };
        let outcome = pipeline.generate_signal(request);
        match outcome {
            Outcome::Signal(signal) => {
                assert!(signal.signal_type.is_buy_side() || matches!(signal.signal_type, SignalType::Hold));
                assert!(signal.tp_prices[0] <= signal.tp_prices[1]);
                assert!(signal.tp_prices[1] <= signal.tp_prices[2]);
            }
            Outcome::NoTrade(_) | Outcome::None => {}
        }
    }

    #[test]
    fn stage_labels_match_spec_numbering() {
        assert_eq!(Stage::S7b.as_str(), "7b");
        assert_eq!(Stage::S11_5.as_str(), "11.5");
        assert_eq!(Stage::S11_6.as_str(), "11.6");
        assert_eq!(Stage::MlAdvisory.as_str(), "12.0-late");
        assert_eq!(Stage::EntryTimingRecheck.as_str(), "12a");
        assert_eq!(Stage::NewsFilter.as_str(), "12b");
    }

    #[test]
    fn enforce_tp_monotonicity_repairs_a_bullish_inversion() {
        let mut tps = [110.0, 108.0, 120.0];
        enforce_tp_monotonicity(&mut tps, Bias::Bullish);
        assert!(tps[0] <= tps[1]);
        assert!(tps[1] <= tps[2]);
    }
}
