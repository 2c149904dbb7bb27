//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use nexthire_core::role::Role;
use nexthire_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "nexthire")]
#[command(version)]
#[command(about = "Next Hire job board client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to open in the interactive client
    #[arg(long, default_value = "/")]
    path: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session credential
    Login {
        #[arg(long)]
        email: String,
        /// Account role (job_seeker or recruiter)
        #[arg(long)]
        role: Role,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "NEXTHIRE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Account role (job_seeker or recruiter)
        #[arg(long)]
        role: Role,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "NEXTHIRE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Clear the stored credential
    Logout,
    /// Show the identity behind the stored credential
    Whoami,
    /// Navigate to a path without the interactive client and print the result
    Visit {
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// List the routing table
    Routes,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, path } = cli;

    // These never touch the backend or the credential.
    match &command {
        Some(Commands::Config { command }) => {
            return match command {
                ConfigCommands::Path => {
                    commands::config::path();
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(),
            };
        }
        Some(Commands::Routes) => {
            commands::routes::run();
            return Ok(());
        }
        _ => {}
    }

    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    let Some(command) = command else {
        return commands::tui::run(&config, &path).await;
    };

    match command {
        Commands::Login {
            email,
            role,
            password,
        } => commands::auth::login(&config, email, role, password).await,
        Commands::Register {
            name,
            email,
            role,
            password,
        } => commands::auth::register(&config, name, email, role, password).await,
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Whoami => commands::auth::whoami(&config).await,
        Commands::Visit { path } => commands::visit::run(&config, &path).await,
        Commands::Routes | Commands::Config { .. } => Ok(()),
    }
}
