//! Execution eligibility check (`spec.md` §4.9, stage 12.3): ANDs execution
//! layer readiness, symbol lock, capacity, and emergency-halt state.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionEligibilityContext {
    pub execution_state_ready: bool,
    pub execution_layer_available: bool,
    pub symbol_execution_locked: bool,
    pub position_capacity_available: bool,
    pub emergency_halt_active: bool,
}

impl Default for ExecutionEligibilityContext {
    fn default() -> Self {
        Self {
            execution_state_ready: true,
            execution_layer_available: true,
            symbol_execution_locked: false,
            position_capacity_available: true,
            emergency_halt_active: false,
        }
    }
}

pub fn evaluate(ctx: &ExecutionEligibilityContext) -> bool {
    ctx.execution_state_ready
        && ctx.execution_layer_available
        && !ctx.symbol_execution_locked
        && ctx.position_capacity_available
        && !ctx.emergency_halt_active
}
