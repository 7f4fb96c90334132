use clap::{Parser, Subcommand};
use orgdesk_auth::AuthSessionManager;
use orgdesk_core::OrgdeskConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::serve::ServeArgs;
use commands::session::{LoginArgs, ProfileArgs, RegisterArgs, SetupArgs};

#[derive(Parser, Debug)]
#[command(name = "orgdesk", version, about = "Student organization admin dashboard")]
struct Cli {
    /// Configuration file.
    #[arg(long, short = 'c', global = true, default_value = "orgdesk.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web dashboard.
    Serve(ServeArgs),

    /// Sign in and persist the session for later commands.
    Login(LoginArgs),

    /// Sign out and clear the persisted session.
    Logout,

    /// Show the signed-in account.
    Whoami {
        /// Print the account as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Create an account and sign in as it.
    Register(RegisterArgs),

    /// Update fields of the signed-in account.
    Profile(ProfileArgs),

    /// Complete first-login profile setup.
    Setup(SetupArgs),

    /// Validate the configuration file.
    Check,

    /// Create the account table in Postgres if it is missing.
    InitDb,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config and start logging at its level.
fn prepare(config_path: &Path) -> anyhow::Result<OrgdeskConfig> {
    let config = commands::load_config(config_path)?;
    init_tracing(&config.logging.level);
    Ok(config)
}

/// Config, logging and a restored session manager.
async fn session(config_path: &Path) -> anyhow::Result<AuthSessionManager> {
    let config = prepare(config_path)?;
    commands::open_session(&config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.config.as_path();

    match cli.cmd {
        Command::Check => {
            init_tracing("warn");
            commands::check::run(path)?;
        }
        Command::Serve(args) => {
            let config = prepare(path)?;
            commands::check::run_pre_hook(path)?;
            commands::serve::run(config, args).await?;
        }
        Command::InitDb => {
            let config = prepare(path)?;
            commands::init_db::run(&config).await?;
        }
        Command::Login(args) => {
            commands::session::login(&session(path).await?, args).await?;
        }
        Command::Logout => commands::session::logout(&session(path).await?).await?,
        Command::Whoami { json } => {
            commands::session::whoami(&session(path).await?, json)?;
        }
        Command::Register(args) => {
            commands::session::register(&session(path).await?, args).await?;
        }
        Command::Profile(args) => {
            commands::session::profile(&session(path).await?, args).await?;
        }
        Command::Setup(args) => {
            commands::session::setup(&session(path).await?, args).await?;
        }
    }

    Ok(())
}
