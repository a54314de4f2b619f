//! Bar — the fundamental OHLCV unit the pipeline consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV candle, already validated by the caller (no NaN in OHLC,
/// `volume >= 0`). The pipeline assumes this on entry — see `spec.md` §7
/// ("Invalid OHLC ... reject upstream; the core assumes validated input").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True body size (always non-negative).
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Signed body: positive for a bullish (close > open) candle.
    pub fn signed_body(&self) -> f64 {
        self.close - self.open
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_valid(&self) -> bool {
        !self.open.is_nan()
            && !self.high.is_nan()
            && !self.low.is_nan()
            && !self.close.is_nan()
            && !self.volume.is_nan()
            && self.volume >= 0.0
            && self.high >= self.low
    }
}

/// An ordered bar series for one timeframe, addressable by position.
pub type BarSeries = Vec<Bar>;

#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> BarSeries {
    use chrono::TimeZone;
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 0.5;
            let low = open.min(close) - 0.5;
            Bar::new(
                base + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                1000.0,
            )
        })
        .collect()
}
