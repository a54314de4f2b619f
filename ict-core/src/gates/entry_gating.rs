//! Entry gating admission check (`spec.md` §4.9, stage 12.1): ANDs system
//! state, breaker/duplicate/cooldown/market-state/signature conditions.

/// Defensive "everything safe" default — used when the surrounding system
/// hasn't wired this gate up, so the core can run standalone (`spec.md`
/// §4.9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryGatingContext {
    pub system_state_operational: bool,
    pub breaker_block_active: bool,
    pub active_signal_exists: bool,
    pub cooldown_active: bool,
    pub market_open: bool,
    pub signature_already_seen: bool,
}

impl Default for EntryGatingContext {
    fn default() -> Self {
        Self {
            system_state_operational: true,
            breaker_block_active: false,
            active_signal_exists: false,
            cooldown_active: false,
            market_open: true,
            signature_already_seen: false,
        }
    }
}

pub fn evaluate(ctx: &EntryGatingContext) -> bool {
    ctx.system_state_operational
        && !ctx.breaker_block_active
        && !ctx.active_signal_exists
        && !ctx.cooldown_active
        && ctx.market_open
        && !ctx.signature_already_seen
}
