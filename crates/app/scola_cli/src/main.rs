// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use scola_api_client::ScolaClient;
use scola_core::auth::roles::{Role, role_destinations};
use scola_core::config::SessionConfig;
use scola_core::guard::{SessionGuard, SessionState};
use scola_core::login::LoginFlow;
use scola_core::models::auth::Credentials;
use scola_core::navigation::{NavigationMode, Navigator};
use scola_core::session::{CookieSessionStore, SessionStore};

mod cli;
mod logging;

/// Prints navigations instead of performing them.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str, mode: NavigationMode) {
        match mode {
            NavigationMode::Push => println!("push {path}"),
            NavigationMode::Replace => println!("replace {path}"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();
    let config = SessionConfig::from_env();
    let store = Arc::new(CookieSessionStore::open(args.session_path())?);
    let navigator = Arc::new(TerminalNavigator);
    let guard = SessionGuard::new(store.clone(), navigator.clone()).with_config(&config);

    match &args.command {
        Commands::Login { username, password } => {
            let password = password.clone().ok_or_else(|| {
                Error::Custom("password required (--password or SCOLA_PASSWORD)".into())
            })?;
            let client = ScolaClient::new(&args.api_url)?;
            let flow = LoginFlow::new(client, store, navigator).with_config(&config);
            flow.login(&Credentials::new(username.as_str(), password))
                .await
                .map_err(|e| {
                    log::debug!("login error: {e}");
                    Error::Custom(e.user_message().into())
                })?;
        }
        Commands::Check => {
            require_session(&guard).await?;
            println!("valid");
        }
        Commands::Whoami => {
            require_session(&guard).await?;
            let username = store
                .read()
                .and_then(|s| s.username)
                .ok_or(Error::NotAuthenticated)?;
            match Role::from_subject(&username) {
                Ok(role) => println!("{username} ({role})"),
                Err(_) => println!("{username}"),
            }
        }
        Commands::Logout => {
            let client = ScolaClient::new(&args.api_url)?;
            LoginFlow::new(client, store, navigator).logout()?;
            println!("logged out");
        }
        Commands::Get { path } => {
            require_session(&guard).await?;
            let client = ScolaClient::new(&args.api_url)?;
            let body: serde_json::Value = client.get_protected(path, &*store).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Routes => {
            for (suffix, role, home) in role_destinations() {
                println!("{suffix:<10} {:<8} {home}", role.as_str());
            }
        }
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Run the guard once; an invalid session has already been redirected.
async fn require_session(guard: &SessionGuard) -> Result<()> {
    match guard.mount().resolve().await {
        Some(SessionState::Valid) => Ok(()),
        _ => Err(Error::NotAuthenticated),
    }
}
