//! Bias and directional types (`spec.md` §3).

use serde::{Deserialize, Serialize};

/// Market directional verdict. `Neutral` and `Ranging` are both
/// non-directional — the pipeline gates on them identically but keeps the
/// distinction for diagnostics (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
    Ranging,
}

impl Bias {
    pub fn is_directional(&self) -> bool {
        matches!(self, Bias::Bullish | Bias::Bearish)
    }

    pub fn is_non_directional(&self) -> bool {
        !self.is_directional()
    }

    pub fn opposite(&self) -> Bias {
        match self {
            Bias::Bullish => Bias::Bearish,
            Bias::Bearish => Bias::Bullish,
            other => *other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bias::Bullish => "BULLISH",
            Bias::Bearish => "BEARISH",
            Bias::Neutral => "NEUTRAL",
            Bias::Ranging => "RANGING",
        }
    }
}

/// Final emitted signal classification (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalType {
    Buy,
    StrongBuy,
    Sell,
    StrongSell,
    Hold,
}

impl SignalType {
    /// STRONG_* is emitted when strength >= 4/5 AND confidence >= 85
    /// (`spec.md` §3).
    pub fn classify(bias: Bias, strength: u8, confidence: f64) -> SignalType {
        let strong = strength >= 4 && confidence >= 85.0;
        match bias {
            Bias::Bullish if strong => SignalType::StrongBuy,
            Bias::Bullish => SignalType::Buy,
            Bias::Bearish if strong => SignalType::StrongSell,
            Bias::Bearish => SignalType::Sell,
            _ => SignalType::Hold,
        }
    }

    pub fn is_buy_side(&self) -> bool {
        matches!(self, SignalType::Buy | SignalType::StrongBuy)
    }

    pub fn is_sell_side(&self) -> bool {
        matches!(self, SignalType::Sell | SignalType::StrongSell)
    }
}
