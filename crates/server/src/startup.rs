//! Server startup: shared state initialization.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use taskmate_prioritizer::{ExternalScorerBridge, Prioritizer, Scorer};

use crate::keep_alive::KeepAlive;
use crate::state::AppState;

/// Build `AppState` from config. The keep-alive loop is created but not started.
pub fn build_app_state(config: &taskmate_core::Config) -> anyhow::Result<Arc<AppState>> {
    let bridge = ExternalScorerBridge::from_config(&config.scorer);
    if bridge.is_available() {
        info!(script = %bridge.script_path().display(), "External scorer ready");
    } else {
        warn!(
            script = %bridge.script_path().display(),
            "External scorer script not found, heuristic prioritization only"
        );
    }
    let prioritizer = Prioritizer::new(Arc::new(bridge));

    let keep_alive = KeepAlive::from_config(&config.keep_alive);

    let state = AppState::open(&config.storage.data_dir, prioritizer, keep_alive)
        .with_context(|| {
            format!(
                "failed to open data directory {}",
                config.storage.data_dir.display()
            )
        })?;
    info!(data_dir = %config.storage.data_dir.display(), "Stores initialized");

    Ok(Arc::new(state))
}
