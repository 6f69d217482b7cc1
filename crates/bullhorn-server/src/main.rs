use anyhow::Result;
use bullhorn_common::clock::SystemClock;
use bullhorn_server::config::ServerConfig;
use bullhorn_server::state::build_state;
use bullhorn_server::{app, seed};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    bullhorn_common::id::init(1, 1);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bullhorn=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => ServerConfig::load(path)?,
        None => {
            tracing::info!("No config file given, using defaults");
            ServerConfig::default()
        }
    };

    tracing::info!(
        http_port = config.http_port,
        reminder_tick_secs = config.reminder_tick_secs,
        reminder_loop = config.reminder_loop_enabled,
        "bullhorn-server starting"
    );

    let state = build_state(config.clone(), Arc::new(SystemClock));

    if config.seed_on_start {
        seed::seed_demo_data(&state);
    }

    // Background reminder loop
    let reminder_handle = if config.reminder_loop_enabled {
        let scheduler = state.scheduler.clone();
        let tick_secs = config.reminder_tick_secs.max(1);
        Some(tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(tick_secs));
            loop {
                tick.tick().await;
                scheduler.run_once().await;
            }
        }))
    } else {
        tracing::info!("Reminder loop disabled");
        None
    };

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let app = app::build_http_app(state);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    tracing::info!(http = %http_addr, "Server started");

    tokio::select! {
        result = axum::serve(listener, app)
            .with_graceful_shutdown(async { signal::ctrl_c().await.ok(); }) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server error");
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    if let Some(h) = reminder_handle {
        h.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}
