mod api;
mod keep_alive;
mod router;
mod startup;
mod state;
mod store;

use tracing::info;
use tracing_subscriber::EnvFilter;

use taskmate_core::Task;
use taskmate_prioritizer::build_stats;

use crate::store::DocumentStore;

fn load_config() -> taskmate_core::Config {
    taskmate_core::config::load_dotenv();
    taskmate_core::Config::from_env()
}

/// Resolves on Ctrl-C, or SIGTERM on unix hosts.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

async fn serve(config: &taskmate_core::Config) -> anyhow::Result<()> {
    config.log_summary();

    let state = startup::build_app_state(config)?;
    let app = router::build_router(state.clone(), &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    state.keep_alive.lock().await.start();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.keep_alive.lock().await.stop();
    info!("Server stopped");
    Ok(())
}

fn stats(config: &taskmate_core::Config) -> anyhow::Result<()> {
    let store = DocumentStore::<Task>::open(&config.storage.data_dir)?;
    let tasks = store.list()?;
    let snapshot = build_stats(&tasks);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let config = load_config();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None | Some("serve") => serve(&config).await?,
        Some("stats") => stats(&config)?,
        Some(other) => {
            println!("taskmate-server v{}", env!("CARGO_PKG_VERSION"));
            println!("Unknown command: {}", other);
            println!("Usage: taskmate-server <command>");
            println!("  serve    Start HTTP server (default)");
            println!("  stats    Print task statistics as JSON");
        }
    }

    Ok(())
}
