//! Task prioritization and dashboard statistics.
//!
//! - [`fallback`]: deterministic urgency / importance / label heuristic
//! - [`bridge`]: out-of-process scorer speaking JSON over stdio
//! - [`prioritize`]: entry point that tries the bridge and falls back
//! - [`reclassify`]: which updates re-run scoring, completion timestamps
//! - [`stats`]: aggregate counters over the task collection

pub mod bridge;
pub mod fallback;
pub mod input;
pub mod prioritize;
pub mod reclassify;
pub mod stats;

pub use bridge::{ExternalScorerBridge, Scorer, ScorerError};
pub use input::{ScorerPayload, ScoringInput};
pub use prioritize::Prioritizer;
pub use reclassify::{completion_transition, needs_reclassification};
pub use stats::{build_stats, build_stats_at, StatsSnapshot};
