//! Volume statistics — median-based, never mean-based (`spec.md` §4.1).

use crate::domain::Bar;

/// Median of a trailing window of `window` bars' volume, evaluated at the
/// last bar. `None` if fewer bars are available.
pub fn median_volume(bars: &[Bar], window: usize) -> Option<f64> {
    if bars.len() < window || window == 0 {
        return None;
    }
    let mut vols: Vec<f64> = bars[bars.len() - window..].iter().map(|b| b.volume).collect();
    vols.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = vols.len() / 2;
    Some(if vols.len() % 2 == 0 {
        (vols[mid - 1] + vols[mid]) / 2.0
    } else {
        vols[mid]
    })
}

/// `current / median` over a trailing 20-bar window (`spec.md` §4.1).
pub fn volume_spike(bars: &[Bar]) -> Option<f64> {
    let current = bars.last()?.volume;
    let median = median_volume(bars, 20)?;
    if median <= 0.0 {
        return None;
    }
    Some(current / median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::make_bars;

    #[test]
    fn median_of_odd_window() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars[0].volume = 10.0;
        bars[1].volume = 30.0;
        bars[2].volume = 20.0;
        assert_eq!(median_volume(&bars, 3), Some(20.0));
    }

    #[test]
    fn median_of_even_window_averages_middle_two() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        bars[0].volume = 10.0;
        bars[1].volume = 20.0;
        bars[2].volume = 30.0;
        bars[3].volume = 40.0;
        assert_eq!(median_volume(&bars, 4), Some(25.0));
    }

    #[test]
    fn volume_spike_ratio() {
        let mut bars = make_bars(&(0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        for b in bars.iter_mut() {
            b.volume = 100.0;
        }
        bars.last_mut().unwrap().volume = 400.0;
        assert_eq!(volume_spike(&bars), Some(4.0));
    }
}
