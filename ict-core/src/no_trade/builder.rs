//! Stage-specific `NoTradeMessage` construction (`spec.md` §4.8, stages
//! 7b-11.6). `domain::no_trade::NoTradeMessage` is the plain data record;
//! this module is the orchestrator-facing factory that fills it in
//! consistently for each rejection point, mirroring the diagnostic
//! payload `ict_signal_engine.py` logs at each `blocked_at_step`.

use crate::domain::{Bias, MtfConsensusData, NoTradeMessage, ZoneBundle};

/// Stage 7b: bias never resolved to a direction, even after the
/// ALT-symbol own-structure fallback.
pub fn non_directional_bias(
    symbol: &str,
    timeframe: &str,
    current_price: f64,
    bias: Bias,
) -> NoTradeMessage {
    NoTradeMessage::new(symbol, timeframe, current_price)
        .at_step(
            "7b",
            format!("Market bias is non-directional ({})", bias.as_str()),
        )
        .with_details("HTF and MTF structure did not agree on a tradeable direction")
}

/// Stage 8: entry-zone selector returned `TOO_FAR` or `TOO_LATE`.
pub fn entry_zone_rejected(
    symbol: &str,
    timeframe: &str,
    current_price: f64,
    entry_status: &'static str,
    detail: impl Into<String>,
) -> NoTradeMessage {
    let mut msg = NoTradeMessage::new(symbol, timeframe, current_price).at_step(
        "8",
        format!("No acceptable entry zone ({entry_status})"),
    );
    msg.entry_status = Some(entry_status);
    msg.with_details(detail)
}

/// Stage 9: SL validator rejected (strict mode) or TPs failed to clear
/// their per-TP minimum R:R floors.
pub fn sl_or_tp_rejected(
    symbol: &str,
    timeframe: &str,
    current_price: f64,
    detail: impl Into<String>,
) -> NoTradeMessage {
    NoTradeMessage::new(symbol, timeframe, current_price)
        .at_step("9", "Stop-loss or take-profit construction failed validation")
        .with_details(detail)
}

/// Stage 10: R:R against the reference TP fell below the configured
/// floor.
pub fn risk_reward_floor(
    symbol: &str,
    timeframe: &str,
    current_price: f64,
    risk_reward_ratio: f64,
    min_risk_reward: f64,
) -> NoTradeMessage {
    NoTradeMessage::new(symbol, timeframe, current_price)
        .at_step(
            "10",
            format!(
                "Risk:reward {risk_reward_ratio:.2} below floor {min_risk_reward:.2}"
            ),
        )
        .with_details(format!(
            "measured against reference TP; floor is {min_risk_reward:.2}"
        ))
}

/// Stage 11.5: MTF consensus below 50%.
pub fn mtf_consensus_floor(
    symbol: &str,
    timeframe: &str,
    current_price: f64,
    consensus: &MtfConsensusData,
) -> NoTradeMessage {
    let mut msg = NoTradeMessage::new(symbol, timeframe, current_price).at_step(
        "11.5",
        format!(
            "MTF consensus {:.1}% below 50% floor",
            consensus.consensus_pct
        ),
    );
    msg.mtf_breakdown = Some(consensus.clone());
    msg.mtf_consensus_pct = Some(consensus.consensus_pct);
    msg.with_details(format!(
        "aligned={} conflicting={} neutral={} missing={}",
        consensus.aligned, consensus.conflicting, consensus.neutral, consensus.missing
    ))
}

/// Stage 11.6: confidence score below the configured minimum.
pub fn confidence_floor(
    symbol: &str,
    timeframe: &str,
    current_price: f64,
    confidence: f64,
    min_confidence: f64,
) -> NoTradeMessage {
    let mut msg = NoTradeMessage::new(symbol, timeframe, current_price).at_step(
        "11.6",
        format!("Confidence {confidence:.1}% below minimum {min_confidence:.1}%"),
    );
    msg.confidence = Some(confidence);
    msg
}

/// Attaches the common diagnostic fields (component count, direction,
/// structure/displacement flags) shared by every stage's message, once
/// the bundle and bias are known.
pub fn with_context(
    mut msg: NoTradeMessage,
    bundle: &ZoneBundle,
    bias: Bias,
    structure_broken: bool,
    displacement_detected: bool,
) -> NoTradeMessage {
    msg.ict_components = bundle.total_zone_count();
    msg.signal_direction = if bias.is_directional() {
        Some(bias.as_str().to_string())
    } else {
        None
    };
    msg.structure_broken = structure_broken;
    msg.displacement_detected = displacement_detected;
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bias;

    #[test]
    fn non_directional_bias_message_carries_step_7b() {
        let msg = non_directional_bias("BTCUSDT", "4h", 50_000.0, Bias::Ranging);
        assert_eq!(msg.blocked_at_step, "7b");
        assert!(msg.reason.contains("RANGING") || msg.reason.to_lowercase().contains("ranging"));
    }

    #[test]
    fn entry_zone_rejected_carries_status() {
        let msg = entry_zone_rejected("ETHUSDT", "1d", 3000.0, "TOO_FAR", "6.2% away");
        assert_eq!(msg.entry_status, Some("TOO_FAR"));
        assert_eq!(msg.blocked_at_step, "8");
    }

    #[test]
    fn risk_reward_floor_message_reports_both_values() {
        let msg = risk_reward_floor("BTCUSDT", "1h", 50_000.0, 2.75, 3.0);
        assert!(msg.reason.contains("2.75"));
        assert!(msg.reason.contains("3.00") || msg.reason.contains("3"));
    }

    #[test]
    fn with_context_fills_component_count_and_direction() {
        let msg = NoTradeMessage::new("BTCUSDT", "1h", 50_000.0);
        let bundle = ZoneBundle::default();
        let msg = with_context(msg, &bundle, Bias::Bullish, false, false);
        assert_eq!(msg.ict_components, 0);
        assert_eq!(msg.signal_direction, Some("BULLISH".to_string()));
    }
}
