//! complaintdesk - command-line client for the Sunberry complaints tracker.
//!
//! Signs in against the complaints API, caches the session, and exposes the
//! dashboard, complaint detail, tagging and admin user screens as commands.

mod cli;
mod commands;
mod output;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use complaintdesk_core::auth::{
    FileSessionStore, IdleTimeout, KeyringSessionStore, Navigator, SessionStore, LOGIN_ROUTE,
};
use complaintdesk_core::{ApiClient, Config};

use cli::{Cli, Command};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Terminal equivalent of a hard redirect to the login screen: tell the
/// user once and let the failing command exit.
#[derive(Default)]
struct CliNavigator {
    notified: AtomicBool,
}

impl Navigator for CliNavigator {
    fn navigate(&self, route: &str) {
        if route == LOGIN_ROUTE && !self.notified.swap(true, Ordering::SeqCst) {
            eprintln!("Session expired. Run `complaintdesk login` to sign in again.");
        }
    }
}

/// Whether an idle session stops `command` from running. Only `login` and
/// `logout` still work; anything else would otherwise sign in again silently
/// from the cached credentials.
fn blocked_by_idle_timeout(idle: bool, command: &Command) -> bool {
    idle && !matches!(command, Command::Login { .. } | Command::Logout)
}

fn open_store(config: &Config, no_keyring: bool) -> Result<Arc<dyn SessionStore>> {
    let store = FileSessionStore::open(config.cache_dir()?)?;
    if no_keyring {
        Ok(Arc::new(store))
    } else {
        Ok(Arc::new(KeyringSessionStore::new(store)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    let base_url = cli.api_url.clone().unwrap_or_else(|| config.api_base_url());
    info!(base_url = %base_url, "complaintdesk starting");

    let store = open_store(&config, cli.no_keyring)?;
    let navigator = Arc::new(CliNavigator::default());
    let client = ApiClient::builder(base_url)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .session_store(store.clone())
        .navigator(navigator.clone())
        .build()?;

    if let Some(last_activity) = config.last_activity {
        let idle = IdleTimeout::with_last_activity(last_activity);
        idle.expire_if_idle(store.as_ref(), navigator.as_ref())?;
        if blocked_by_idle_timeout(idle.is_idle(), &cli.command) {
            bail!("Signed out after inactivity. Run `complaintdesk login` to continue.");
        }
    }

    let result = commands::run(&client, &mut config, cli.command).await;

    if result.is_ok() {
        config.last_activity = Some(Utc::now());
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
    result
}
