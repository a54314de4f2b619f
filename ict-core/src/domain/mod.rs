//! Domain types — bars, zones, bias, entry zones, signals, and the
//! no-trade diagnostic (`spec.md` §3).

pub mod bar;
pub mod bias;
pub mod entry_zone;
pub mod mtf_consensus;
pub mod no_trade;
pub mod signal;
pub mod timeframe;
pub mod zone;
pub mod zone_bundle;

pub use bar::{Bar, BarSeries};
pub use bias::{Bias, SignalType};
pub use entry_zone::{DistanceDirection, EntrySource, EntryStatus, EntryZone};
pub use mtf_consensus::{MtfConsensusData, TfBiasResult};
pub use no_trade::NoTradeMessage;
pub use signal::{BacktestRecord, Signal, TimeframeHierarchyMeta, ZoneExplanation};
pub use timeframe::Timeframe;
pub use zone::{LiquiditySide, Polarity, Zone, ZoneFamily, ZoneMeta};
pub use zone_bundle::{FibonacciData, SrLevel, ZoneBundle};
