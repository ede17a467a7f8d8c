//! voice-cr-ws: ConversationRelay WebSocket service.
//!
//! This is the application entry point. It parses the command line, loads
//! configuration from TOML (falling back to built-in defaults), initializes
//! tracing, sets up the Axum router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voice_cr_ws::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use voice_cr_ws::http::start_server;
use voice_cr_ws::{create_router, AppState};

/// voice-cr-ws: WebSocket relay for Twilio ConversationRelay
#[derive(Parser, Debug)]
#[command(name = "voice-cr-ws", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "voice_cr_ws=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Listen address, overrides http.host
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides http.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config)?;
    config.apply_overrides(args.host, args.port)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let json = config.logging.is_json();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(
        config = %args.config,
        host = %config.http.host,
        port = config.http.port,
        max_message_bytes = config.relay.max_message_bytes,
        "Loaded configuration"
    );

    let state = AppState::new(config.clone())?;
    if state.leads.webhook_enabled() {
        tracing::info!("Lead webhook enabled");
    } else {
        tracing::warn!("No lead webhook configured, confirmed leads will only be logged");
    }

    let leads = state.leads.clone();
    let app = create_router(state);
    start_server(app, &config.http).await?;

    // Connections are drained; finish forwarding leads confirmed just before shutdown
    leads.drain().await;

    Ok(())
}
