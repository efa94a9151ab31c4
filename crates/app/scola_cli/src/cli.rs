use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scola", version, about = "Scola portal session tool")]
pub struct Cli {
    /// Backend base URL.
    #[arg(
        long,
        global = true,
        env = "SCOLA_API_URL",
        default_value = "http://127.0.0.1:8080/api"
    )]
    pub api_url: String,

    /// Session cookie jar (defaults to `<data dir>/scola/session`).
    #[arg(long, global = true, env = "SCOLA_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and go to the role home page.
    Login {
        #[arg(long, short)]
        username: String,

        #[arg(long, short, env = "SCOLA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Run the session guard against the stored session.
    Check,
    /// Show the logged-in user.
    Whoami,
    /// Discard the stored session.
    Logout,
    /// GET a protected backend resource.
    Get { path: String },
    /// List role suffixes and their home pages.
    Routes,
    /// Print the version.
    Version,
}

impl Cli {
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("scola")
                .join("session")
        })
    }
}
