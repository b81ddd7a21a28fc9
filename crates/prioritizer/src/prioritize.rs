use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskmate_core::config::ScorerConfig;
use taskmate_core::ScoreResult;
use tracing::warn;

use crate::bridge::{ExternalScorerBridge, Scorer};
use crate::fallback;
use crate::input::ScoringInput;

/// Scoring entry point used by the task handlers.
///
/// Never fails: any scorer problem is logged and answered by the heuristic.
#[derive(Clone, Default)]
pub struct Prioritizer {
    scorer: Option<Arc<dyn Scorer>>,
}

impl Prioritizer {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer: Some(scorer),
        }
    }

    /// Heuristic only, no external process.
    pub fn fallback_only() -> Self {
        Self { scorer: None }
    }

    pub fn from_config(config: &ScorerConfig) -> Self {
        Self::new(Arc::new(ExternalScorerBridge::from_config(config)))
    }

    pub async fn prioritize(&self, input: &ScoringInput) -> ScoreResult {
        self.prioritize_at(input, Utc::now()).await
    }

    pub async fn prioritize_at(&self, input: &ScoringInput, now: DateTime<Utc>) -> ScoreResult {
        let Some(scorer) = &self.scorer else {
            return fallback::classify_at(input, now);
        };

        if !scorer.is_available() {
            warn!("External scorer not available, using heuristic prioritization");
            return fallback::classify_at(input, now);
        }

        match scorer.score(input).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Prioritizer fallback engaged");
                fallback::classify_at(input, now)
            }
        }
    }
}
