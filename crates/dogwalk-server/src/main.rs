//! Dogwalk API Server
//!
//! Serves the dog profile REST API from an in-memory store.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use dogwalk_core::tracing_init::init_tracing;
use dogwalk_server::{AppState, ServerConfig, build_router};

#[derive(Parser, Debug)]
#[command(name = "dogwalk-server")]
#[command(version, about = "Dogwalk API server - dog profiles, photos and bearer auth")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "DOGWALK_ADDR", default_value = "127.0.0.1:3002")]
    addr: SocketAddr,

    /// JWT signing secret.
    #[arg(long, env = "DOGWALK_JWT_SECRET", default_value = "dev-secret-change-me")]
    jwt_secret: String,

    /// Session token TTL in seconds.
    #[arg(long, env = "DOGWALK_TOKEN_TTL", default_value_t = 86400)]
    token_ttl: i64,

    /// Default page size for dog listings.
    #[arg(long, env = "DOGWALK_PAGE_SIZE", default_value_t = 12)]
    page_size: usize,

    /// Start with an empty store instead of the sample dogs.
    #[arg(long)]
    no_seed: bool,

    /// Prefix for synthesized photo URLs.
    #[arg(
        long,
        env = "DOGWALK_PHOTO_BASE_URL",
        default_value = "https://images.dog.ceo/breeds/uploads"
    )]
    photo_base_url: String,

    /// Milliseconds before an uploaded photo leaves `pending` (0 = immediately).
    #[arg(long, env = "DOGWALK_PHOTO_REVIEW_DELAY_MS", default_value_t = 1500)]
    photo_review_delay_ms: u64,

    /// Maximum accepted photo size in bytes.
    #[arg(long, env = "DOGWALK_MAX_PHOTO_BYTES", default_value_t = 10 * 1024 * 1024)]
    max_photo_bytes: usize,

    /// Build timestamp reported by /version.json.
    #[arg(long, env = "DOGWALK_BUILD_TIMESTAMP")]
    build_timestamp: Option<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr,
            jwt_secret: self.jwt_secret,
            token_ttl_secs: self.token_ttl,
            page_size: self.page_size,
            seed: !self.no_seed,
            photo_base_url: self.photo_base_url,
            photo_review_delay: Duration::from_millis(self.photo_review_delay_ms),
            max_photo_bytes: self.max_photo_bytes,
            build_timestamp: self.build_timestamp,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing("dogwalk_server=info,tower_http=info", args.log_json);
    let config = args.into_config();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.addr,
        seed = config.seed,
        "Starting dogwalk-server"
    );
    if config.jwt_secret == ServerConfig::default().jwt_secret {
        warn!("Using the default JWT secret; set DOGWALK_JWT_SECRET outside development");
    }

    let app = build_router(AppState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
