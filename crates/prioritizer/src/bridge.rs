//! Out-of-process scorer.
//!
//! One child process per classification: the normalized payload goes to stdin
//! as JSON, a single JSON object `{urgency, importance, priorityLabel}` is read
//! back from stdout. Interpreters are tried in order until one launches.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use taskmate_core::config::ScorerConfig;
use taskmate_core::{PriorityLabel, ScoreResult};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::input::ScoringInput;

#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("scorer script not found at {}", .0.display())]
    ScriptMissing(PathBuf),

    #[error("no scorer interpreter could be launched (tried: {})", .tried.join(", "))]
    NoInterpreter { tried: Vec<String> },

    #[error("scorer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode scorer payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("scorer exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("scorer timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed scorer output: {0}")]
    MalformedOutput(String),
}

/// Something that can score a task, possibly failing.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Whether the backing program exists at all. Checked before every call.
    fn is_available(&self) -> bool {
        true
    }

    async fn score(&self, input: &ScoringInput) -> Result<ScoreResult, ScorerError>;
}

/// Runs `<interpreter> <script>` and speaks JSON over stdio.
#[derive(Debug, Clone)]
pub struct ExternalScorerBridge {
    candidates: Vec<String>,
    script: PathBuf,
    working_dir: PathBuf,
    timeout: Duration,
}

impl ExternalScorerBridge {
    pub fn new(
        candidates: Vec<String>,
        script: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            candidates,
            script: script.into(),
            working_dir: working_dir.into(),
            timeout,
        }
    }

    /// Relative script paths resolve against the configured working directory.
    pub fn from_config(config: &ScorerConfig) -> Self {
        let script = if config.script_path.is_absolute() {
            config.script_path.clone()
        } else {
            config.working_dir.join(&config.script_path)
        };
        Self::new(
            config.interpreter_candidates(),
            script,
            config.working_dir.clone(),
            config.timeout(),
        )
    }

    pub fn script_path(&self) -> &Path {
        &self.script
    }

    /// Spawn the first interpreter that launches.
    fn spawn_first(&self) -> Result<(&str, Child), ScorerError> {
        for candidate in &self.candidates {
            let spawned = Command::new(candidate)
                .arg(&self.script)
                .current_dir(&self.working_dir)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn();
            match spawned {
                Ok(child) => return Ok((candidate.as_str(), child)),
                Err(e) => {
                    debug!(interpreter = %candidate, error = %e, "scorer interpreter failed to launch");
                }
            }
        }
        Err(ScorerError::NoInterpreter {
            tried: self.candidates.clone(),
        })
    }

    /// Write the payload, wait for exit, return stdout.
    async fn run(&self, payload: &[u8]) -> Result<Vec<u8>, ScorerError> {
        let (interpreter, mut child) = self.spawn_first()?;
        debug!(interpreter, script = %self.script.display(), "scorer process started");

        let stdin = child.stdin.take();
        let exchange = async move {
            if let Some(mut pipe) = stdin {
                // The scorer may exit without reading; its exit status decides.
                if let Err(e) = pipe.write_all(payload).await {
                    debug!(error = %e, "scorer closed stdin early");
                }
            }
            child.wait_with_output().await
        };

        // Dropping the future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => return Err(ScorerError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(ScorerError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl Scorer for ExternalScorerBridge {
    fn is_available(&self) -> bool {
        self.script.is_file()
    }

    async fn score(&self, input: &ScoringInput) -> Result<ScoreResult, ScorerError> {
        if !self.is_available() {
            return Err(ScorerError::ScriptMissing(self.script.clone()));
        }
        let payload = serde_json::to_vec(&input.payload())?;
        let stdout = self.run(&payload).await?;
        parse_output(&stdout)
    }
}

/// Validate and normalize the scorer's stdout.
///
/// Scores must be numbers and are clamped into `[0, 1]`; the label must be one
/// of the known labels.
pub fn parse_output(stdout: &[u8]) -> Result<ScoreResult, ScorerError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Err(ScorerError::MalformedOutput("empty output".to_string()));
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| ScorerError::MalformedOutput(format!("not JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| ScorerError::MalformedOutput("expected a JSON object".to_string()))?;

    let score = |field: &str| {
        object
            .get(field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .ok_or_else(|| ScorerError::MalformedOutput(format!("missing numeric '{field}'")))
    };
    let urgency = score("urgency")?;
    let importance = score("importance")?;

    let priority_label = object
        .get("priorityLabel")
        .and_then(Value::as_str)
        .ok_or_else(|| ScorerError::MalformedOutput("missing string 'priorityLabel'".to_string()))?
        .parse::<PriorityLabel>()
        .map_err(ScorerError::MalformedOutput)?;

    Ok(ScoreResult {
        urgency,
        importance,
        priority_label,
    })
}
