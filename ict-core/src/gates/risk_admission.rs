//! Risk admission check (`spec.md` §4.9, stage 12.4): ANDs per-signal risk,
//! total open risk, symbol exposure, direction exposure, and daily loss
//! against their respective caps.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAdmissionContext {
    pub signal_risk_pct: f64,
    pub per_signal_cap_pct: f64,
    pub total_open_risk_pct: f64,
    pub portfolio_cap_pct: f64,
    pub symbol_exposure_pct: f64,
    pub symbol_cap_pct: f64,
    pub direction_exposure_pct: f64,
    pub direction_cap_pct: f64,
    pub daily_loss_pct: f64,
    pub daily_cap_pct: f64,
}

impl Default for RiskAdmissionContext {
    fn default() -> Self {
        Self {
            signal_risk_pct: 0.0,
            per_signal_cap_pct: 100.0,
            total_open_risk_pct: 0.0,
            portfolio_cap_pct: 100.0,
            symbol_exposure_pct: 0.0,
            symbol_cap_pct: 100.0,
            direction_exposure_pct: 0.0,
            direction_cap_pct: 100.0,
            daily_loss_pct: 0.0,
            daily_cap_pct: 100.0,
        }
    }
}

pub fn evaluate(ctx: &RiskAdmissionContext) -> bool {
    ctx.signal_risk_pct <= ctx.per_signal_cap_pct
        && ctx.total_open_risk_pct <= ctx.portfolio_cap_pct
        && ctx.symbol_exposure_pct <= ctx.symbol_cap_pct
        && ctx.direction_exposure_pct <= ctx.direction_cap_pct
        && ctx.daily_loss_pct <= ctx.daily_cap_pct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass() {
        assert!(evaluate(&RiskAdmissionContext::default()));
    }

    #[test]
    fn exceeding_daily_loss_cap_blocks_admission() {
        let ctx = RiskAdmissionContext {
            daily_loss_pct: 5.0,
            daily_cap_pct: 3.0,
            ..Default::default()
        };
        assert!(!evaluate(&ctx));
    }

    #[test]
    fn exceeding_per_signal_cap_blocks_admission() {
        let ctx = RiskAdmissionContext {
            signal_risk_pct: 3.0,
            per_signal_cap_pct: 2.0,
            ..Default::default()
        };
        assert!(!evaluate(&ctx));
    }
}
