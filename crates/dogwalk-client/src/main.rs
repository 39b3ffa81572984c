//! Dogwalk CLI
//!
//! Manage dog profiles on a Dogwalk API server from the terminal.

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use dogwalk_client::DogApiClient;
use dogwalk_client::auth::{AuthContext, SessionStore, provider_for};
use dogwalk_client::auth_cmd::{self, AuthAction};
use dogwalk_client::config::{ClientConfig, Settings, load_config};
use dogwalk_client::dog_cmd::{self, DogAction};
use dogwalk_core::tracing_init::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "dogwalk")]
#[command(version, about = "Dogwalk CLI - manage dog profiles", long_about = None)]
struct Cli {
    /// API resource root, e.g. http://localhost:3002/api (overrides DOGWALK_API_BASE_URL and the settings file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Sign-in strategy: local or cognito
    #[arg(long, global = true)]
    auth_mode: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Auth(AuthAction),
    #[command(flatten)]
    Dog(DogAction),
    /// Check that the API server is reachable.
    Ping,
    /// Show client and server versions.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing("dogwalk_client=warn");

    let config = load_config(Settings {
        api_base_url: cli.api_url,
        auth_mode: cli.auth_mode,
        ..Settings::default()
    })?;
    debug!(?config, "Resolved configuration");

    let ctx = Arc::new(AuthContext::new(
        provider_for(&config)?,
        SessionStore::open_default()?,
    ));
    ctx.initialize().await;
    let client = DogApiClient::new(&config.api_base_url, ctx.clone())?;

    match cli.command {
        Commands::Auth(action) => auth_cmd::run(action, &ctx, &config).await?,
        Commands::Dog(action) => {
            ctx.require_session().await?;
            dog_cmd::run(action, Arc::new(client)).await?;
        }
        Commands::Ping => {
            let reply = client.ping().await?;
            writeln!(io::stdout(), "{reply}")?;
        }
        Commands::Version => version(&client, &config).await?,
    }

    Ok(())
}

async fn version(client: &DogApiClient, config: &ClientConfig) -> anyhow::Result<()> {
    let mut out = io::stdout();
    write!(out, "dogwalk {}", env!("CARGO_PKG_VERSION"))?;
    match &config.build_timestamp {
        Some(ts) => writeln!(out, " (built {ts})")?,
        None => writeln!(out)?,
    }
    match client.version().await {
        Ok(server) => writeln!(
            out,
            "server {} (built {}) at {}",
            server.version,
            server.build_timestamp,
            client.base_url()
        )?,
        Err(e) => writeln!(out, "server unreachable at {}: {e}", client.base_url())?,
    }
    Ok(())
}
