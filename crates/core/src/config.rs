use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub scorer: ScorerConfig,
    pub keep_alive: KeepAliveConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TASKMATE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TASKMATE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            storage: StorageConfig::from_env_profiled(p),
            scorer: ScorerConfig::from_env_profiled(p),
            keep_alive: KeepAliveConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}", self.server.host, self.server.port);
        tracing::info!("  storage:     data_dir={}", self.storage.data_dir.display());
        tracing::info!(
            "  scorer:      script={}, interpreters={:?}, timeout={}s",
            self.scorer.script_path.display(),
            self.scorer.interpreter_candidates(),
            self.scorer.timeout_secs
        );
        tracing::info!(
            "  keep_alive:  url={}, interval={}s",
            self.keep_alive.self_url.as_deref().unwrap_or("(disabled)"),
            self.keep_alive.interval_secs
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 4000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            data_dir: PathBuf::from(profiled_env_or(p, "DATA_DIR", "data")),
        }
    }
}

// ── External scorer ───────────────────────────────────────────

/// Interpreter names tried after the configured override, in order.
pub const DEFAULT_INTERPRETERS: &[&str] = &["python", "python3"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Explicit interpreter (`PYTHON_PATH`); tried before the defaults.
    pub interpreter: Option<String>,
    pub script_path: PathBuf,
    pub working_dir: PathBuf,
    pub timeout_secs: u64,
}

impl ScorerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            interpreter: profiled_env_opt(p, "PYTHON_PATH"),
            script_path: PathBuf::from(profiled_env_or(p, "SCORER_SCRIPT", "ml/predict.py")),
            working_dir: PathBuf::from(profiled_env_or(p, "SCORER_WORKDIR", ".")),
            timeout_secs: profiled_env_u64(p, "SCORER_TIMEOUT_SECS", 5),
        }
    }

    /// Ordered, deduplicated interpreter names: override first, then defaults.
    pub fn interpreter_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let all = self
            .interpreter
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_INTERPRETERS.iter().copied());
        for name in all {
            if !candidates.iter().any(|c| c == name) {
                candidates.push(name.to_string());
            }
        }
        candidates
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Keep-alive ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepAliveConfig {
    /// Public URL of this deployment (`RENDER_EXTERNAL_URL`). Pinger is off when unset.
    pub self_url: Option<String>,
    pub interval_secs: u64,
}

impl KeepAliveConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            self_url: profiled_env_opt(p, "RENDER_EXTERNAL_URL"),
            interval_secs: profiled_env_u64(p, "KEEP_ALIVE_INTERVAL_SECS", 14 * 60),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
