//! Whisperbox
//!
//! Anonymous message drop box:
//! - rate-limited HTTP ingestion with fingerprint capture
//! - SQLite persistence with idempotent schema creation
//! - best-effort analytics event collection
//! - key-gated admin listing of captured messages

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::{middleware::rate_limit::RateLimitConfig, router, AppState};
use message_store::{MessageStore, StoreConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Allowed caller origin; `*` allows any
    #[serde(default = "default_cors_origin")]
    cors_origin: String,

    /// Shared secret for the admin read path. Empty disables it.
    #[serde(default)]
    admin_key: String,

    /// Accepted submissions per address per window
    #[serde(default = "default_rate_quota")]
    rate_quota: u32,

    /// Rate limit window in seconds
    #[serde(default = "default_rate_window_secs")]
    rate_window_secs: u64,

    #[serde(default)]
    store: StoreConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_rate_quota() -> u32 {
    whisper_core::limits::RATE_LIMIT_QUOTA
}

fn default_rate_window_secs() -> u64 {
    whisper_core::limits::RATE_LIMIT_WINDOW_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            admin_key: String::new(),
            rate_quota: default_rate_quota(),
            rate_window_secs: default_rate_window_secs(),
            store: StoreConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting whisperbox v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    if config.admin_key.is_empty() {
        tracing::warn!("No admin key configured; the admin listing is disabled");
    }

    // Opens the database and creates tables if absent.
    let store = Arc::new(
        MessageStore::connect(config.store.clone())
            .await
            .context("Failed to open message store")?,
    );

    let state = AppState::with_rate_limit(
        store,
        config.admin_key.clone(),
        RateLimitConfig {
            quota: config.rate_quota,
            window: std::time::Duration::from_secs(config.rate_window_secs),
        },
    )
    .with_cors_origin(config.cors_origin.clone());

    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Structured logging via tracing, optionally JSON for deployment.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_JSON")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Load configuration from defaults, optional file, and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("WHISPERBOX")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Nested store override; the config crate is unreliable with
    // underscored nested field names.
    if let Ok(path) = std::env::var("WHISPERBOX_STORE_PATH") {
        config.store.path = path;
    }
    if let Ok(key) = std::env::var("WHISPERBOX_ADMIN_KEY") {
        config.admin_key = key;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
