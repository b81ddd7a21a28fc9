//! Self-ping loop that keeps a free-tier host from idling the service.
//!
//! Hits `{self_url}/api/health` once on start and then every interval.
//! Ping failures are logged and never stop the loop.

use std::time::{Duration, Instant};

use serde::Serialize;
use taskmate_core::config::KeepAliveConfig;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "TaskMate-KeepAlive/1.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepAliveStatus {
    pub is_running: bool,
    pub ping_interval_secs: u64,
    pub self_url: Option<String>,
    /// Seconds until the next scheduled ping, when running.
    pub next_ping_in: Option<u64>,
}

pub struct KeepAlive {
    self_url: Option<String>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
    started_at: Option<Instant>,
}

impl KeepAlive {
    pub fn new(self_url: Option<String>, interval: Duration) -> Self {
        Self {
            self_url: self_url.map(|url| url.trim_end_matches('/').to_string()),
            interval,
            handle: None,
            started_at: None,
        }
    }

    pub fn from_config(config: &KeepAliveConfig) -> Self {
        Self::new(config.self_url.clone(), config.interval())
    }

    fn health_url(&self) -> Option<String> {
        self.self_url.as_ref().map(|url| format!("{}/api/health", url))
    }

    /// Spawn the ping loop. No-op without a self URL or when already running.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("keep-alive already running");
            return;
        }
        let Some(url) = self.health_url() else {
            info!("Keep-alive disabled: no self URL configured");
            return;
        };

        let client = match reqwest::Client::builder()
            .timeout(PING_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Keep-alive disabled: failed to build HTTP client");
                return;
            }
        };

        let interval = self.interval;
        info!(url = %url, interval_secs = interval.as_secs(), "Keep-alive started");
        self.started_at = Some(Instant::now());
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                ping(&client, &url).await;
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Keep-alive stopped");
        }
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn status(&self) -> KeepAliveStatus {
        let running = self.is_running();
        let next_ping_in = match (running, self.started_at) {
            (true, Some(started)) => Some(self.next_ping_in(started.elapsed())),
            _ => None,
        };
        KeepAliveStatus {
            is_running: running,
            ping_interval_secs: self.interval.as_secs(),
            self_url: self.self_url.clone(),
            next_ping_in,
        }
    }

    fn next_ping_in(&self, elapsed: Duration) -> u64 {
        let period = self.interval.as_millis().max(1);
        let into_period = elapsed.as_millis() % period;
        ((period - into_period) / 1000) as u64
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn ping(client: &reqwest::Client, url: &str) {
    let started = Instant::now();
    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => {
            info!(
                status = %resp.status(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Keep-alive ping ok"
            );
        }
        Ok(resp) => warn!(status = %resp.status(), "Keep-alive ping returned non-success status"),
        Err(e) => warn!(error = %e, "Keep-alive ping failed"),
    }
}
