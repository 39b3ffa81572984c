//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use crate::auth::AuthContext;
use crate::config::{AuthMode, ClientConfig};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Sign in and remember the session.
    Login {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Password (ignored by the local development server).
        #[arg(short, long, env = "DOGWALK_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
    },
    /// Sign out and forget the session.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(action: AuthAction, ctx: &AuthContext, config: &ClientConfig) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AuthAction::Login { username, password } => {
            let session = ctx.sign_in(&username, &password).await?;
            writeln!(out, "Logged in as {} <{}>", session.username, session.email)?;
        }
        AuthAction::Logout => {
            ctx.sign_out().await?;
            writeln!(out, "Logged out")?;
        }
        AuthAction::Status => status(&mut out, ctx, config).await?,
    }
    Ok(())
}

async fn status(out: &mut impl Write, ctx: &AuthContext, config: &ClientConfig) -> io::Result<()> {
    match ctx.current().await {
        Some(session) => {
            writeln!(out, "Logged in as: {}", session.username)?;
            writeln!(out, "Email: {}", session.email)?;
        }
        None => writeln!(out, "Not logged in")?,
    }
    writeln!(out, "Server: {}", config.api_base_url)?;
    let provider = ctx.provider_name();
    match &config.auth {
        AuthMode::Local => writeln!(out, "Sign-in: {provider}")?,
        AuthMode::Cognito {
            region,
            user_pool_id,
            ..
        } => writeln!(out, "Sign-in: {provider} ({user_pool_id}, {region})")?,
    }
    Ok(())
}
