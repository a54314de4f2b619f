//! Average True Range — the rolling mean of true range (`spec.md` §4.1).
//!
//! Deliberately a *simple* rolling mean, not the teacher's Wilder-smoothed
//! EMA (`examples/trustdan-trendlab-tui.1/trendlab-core/src/indicators/atr.rs`):
//! `spec.md` explicitly forbids EMA-based smoothing for any signal-influencing
//! decision, carving out only "the ATR and RSI rolling-mean operations" as
//! permitted. The true-range series computation itself is kept the same.

use crate::domain::Bar;

/// True Range series. `TR[0] = high[0] - low[0]` (no previous close);
/// `TR[t] = max(high-low, |high-prev_close|, |low-prev_close|)`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.high - bar.low);
        } else {
            let pc = bars[i - 1].close;
            tr.push((bar.high - bar.low).max((bar.high - pc).abs()).max((bar.low - pc).abs()));
        }
    }
    tr
}

/// Rolling simple mean of true range over `period` bars, evaluated at the
/// last bar in `bars`. Returns `None` if fewer than `period` bars are
/// available.
pub fn atr(bars: &[Bar], period: usize) -> Option<f64> {
    if bars.len() < period || period == 0 {
        return None;
    }
    let tr = true_range(bars);
    let window = &tr[tr.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Full rolling-ATR series (one value per bar once `period` bars are
/// available, `NaN` before that), used by the obstacle scanner which needs
/// ATR at arbitrary historical positions, not just the latest bar.
pub fn atr_series(bars: &[Bar], period: usize) -> Vec<f64> {
    let tr = true_range(bars);
    let n = tr.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..n {
        let window = &tr[i + 1 - period..=i];
        out[i] = window.iter().sum::<f64>() / period as f64;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn atr_none_when_insufficient_bars() {
        let bars = make_bars(&[1.0, 2.0]);
        assert_eq!(atr(&bars, 14), None);
    }

    #[test]
    fn atr_is_mean_of_true_range_window() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let a = atr(&bars, 14).unwrap();
        assert!(a > 0.0);
        let series = atr_series(&bars, 14);
        assert_eq!(series[bars.len() - 1], a);
    }

    #[test]
    fn true_range_first_bar_is_high_minus_low() {
        let bars = make_bars(&[100.0, 105.0]);
        let tr = true_range(&bars);
        assert_eq!(tr[0], bars[0].high - bars[0].low);
    }
}
