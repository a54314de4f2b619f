//! Pure numeric indicator primitives over bar series (`spec.md` §4.1).
//!
//! Explicitly forbidden here: EMAs, SMAs, MACD, Bollinger bands for any
//! *signal-influencing* decision. The ATR and RSI rolling-mean operations
//! are permitted exceptions; price-range position replaces Bollinger
//! position.

pub mod atr;
pub mod displacement;
pub mod range_position;
pub mod rsi;
pub mod swings;
pub mod volume;

pub use atr::{atr, atr_series, true_range};
pub use displacement::{detect_displacement, DisplacementDirection};
pub use range_position::range_position;
pub use rsi::rsi;
pub use swings::{last_20_bar_swing_high, last_20_bar_swing_low, swing_highs, swing_lows, SwingPoint};
pub use volume::{median_volume, volume_spike};
