//! Stop-loss validation against the reference order block (`spec.md` §4.5
//! step 2): for BULLISH the SL must lie strictly below `OB.low` with a
//! buffer of at least 0.2% of `OB.low`; for BEARISH, symmetric above
//! `OB.high`. A candidate that is inside or above the OB (i.e. violates
//! that buffer) is snapped to `OB.low * (1 - 0.3%)` (mirrored for
//! BEARISH); a candidate that already clears the buffer is returned
//! unchanged — it is not re-snapped toward entry. Additionally the SL
//! must be at least 0.5% from entry.

use crate::domain::Bias;

const MIN_BUFFER_PCT: f64 = 0.2;
const SNAP_BUFFER_PCT: f64 = 0.3;
const MIN_ENTRY_DISTANCE_PCT: f64 = 0.5;

/// Outcome of SL validation. `sl_fallback_used` is set only when `validate`
/// is called via `validate_or_fallback` with no reference OB in non-strict
/// mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationResult {
    pub sl: f64,
    pub is_valid: bool,
    pub sl_fallback_used: bool,
}

/// Validate (and if necessary snap) `candidate_sl` against the reference
/// order block boundary. Returns `is_valid = false` when the entry-to-SL
/// distance ends up below `MIN_ENTRY_DISTANCE_PCT`.
pub fn validate(bias: Bias, entry_price: f64, candidate_sl: f64, ob_low: f64, ob_high: f64) -> ValidationResult {
    let sl = match bias {
        Bias::Bullish => {
            let min_buffer = ob_low * MIN_BUFFER_PCT / 100.0;
            if candidate_sl >= ob_low - min_buffer {
                ob_low * (1.0 - SNAP_BUFFER_PCT / 100.0)
            } else {
                candidate_sl
            }
        }
        _ => {
            let min_buffer = ob_high * MIN_BUFFER_PCT / 100.0;
            if candidate_sl <= ob_high + min_buffer {
                ob_high * (1.0 + SNAP_BUFFER_PCT / 100.0)
            } else {
                candidate_sl
            }
        }
    };

    let entry_distance_pct = (entry_price - sl).abs() / entry_price * 100.0;
    let is_valid = entry_distance_pct >= MIN_ENTRY_DISTANCE_PCT;

    ValidationResult {
        sl,
        is_valid,
        sl_fallback_used: false,
    }
}

/// When no reference OB exists: strict mode rejects outright; non-strict
/// accepts the ATR-based fallback candidate and marks
/// `sl_fallback_used = true` (`spec.md` §4.5, §7).
pub fn validate_without_reference_ob(candidate_sl: f64, strict: bool) -> ValidationResult {
    ValidationResult {
        sl: candidate_sl,
        is_valid: !strict,
        sl_fallback_used: !strict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_inside_ob_snaps_to_ob_low_minus_030pct() {
        let result = validate(Bias::Bullish, 100.0, 99.8, 99.0, 101.0);
        assert!(result.sl < 99.0);
        assert!((result.sl - 99.0 * 0.997).abs() < 1e-9);
    }

    #[test]
    fn candidate_already_below_ob_with_buffer_passes_through_unchanged() {
        let result = validate(Bias::Bullish, 100.0, 90.0, 99.0, 101.0);
        assert_eq!(result.sl, 90.0);
    }

    #[test]
    fn scenario_c_candidate_at_48500_is_not_pulled_toward_entry() {
        // spec.md §8(c): entry=50000, OB.low=49500; a candidate already
        // below `OB.low * 0.998` must be returned unchanged, not re-snapped
        // up toward entry.
        let result = validate(Bias::Bullish, 50_000.0, 48_500.0, 49_500.0, 49_800.0);
        assert_eq!(result.sl, 48_500.0);
        assert!(result.is_valid);
    }

    #[test]
    fn too_close_to_entry_is_invalid() {
        let result = validate(Bias::Bullish, 100.0, 99.85, 99.9, 101.0);
        assert!(!result.is_valid);
    }

    #[test]
    fn strict_mode_rejects_without_reference_ob() {
        let result = validate_without_reference_ob(95.0, true);
        assert!(!result.is_valid);
    }

    #[test]
    fn non_strict_mode_accepts_fallback_with_warning_flag() {
        let result = validate_without_reference_ob(95.0, false);
        assert!(result.is_valid);
        assert!(result.sl_fallback_used);
    }
}
