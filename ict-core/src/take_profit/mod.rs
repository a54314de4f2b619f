//! Take-profit engine: mathematical R-multiple anchors (Layer A) rewritten
//! around in-path structural obstacles (Layer B) (`spec.md` §4.6).

pub mod engine;
pub mod obstacles;

pub use engine::mathematical_tps;
pub use obstacles::{adjust_tp, evaluate, scan_path, ObstacleContext, PathObstacle, RejectionVerdict};
