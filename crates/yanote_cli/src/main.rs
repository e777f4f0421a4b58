//! `yanote` command-line entry point.
//!
//! # Responsibility
//! - Merge the TOML config with command-line overrides.
//! - Initialize logging, open the database and run the HTTP server.
//! - Provide account bootstrap for the first administrator.

mod config;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use log::info;
use std::env;
use std::path::{Path, PathBuf};
use yanote_core::db::open_db;
use yanote_core::{
    default_log_level, init_console_logging, init_logging, AuthService, SqliteSessionRepository,
    SqliteUserRepository,
};
use yanote_web::{AppState, NotesServer};

#[derive(Debug, Parser)]
#[command(name = "yanote", about = "Personal notes web service")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8000.
        #[arg(long)]
        bind: Option<String>,
        /// SQLite database file.
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Create an administrator account.
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// SQLite database file.
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print the version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Command::Version = cli.command {
        println!("yanote {}", yanote_core::core_version());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    start_logging(&config)?;

    match cli.command {
        Command::Serve { bind, db } => {
            let bind = bind.unwrap_or_else(|| config.server.bind_address.clone());
            let db_path = db.unwrap_or_else(|| config.database.path.clone());
            serve(&config, &bind, &db_path)
        }
        Command::CreateSuperuser {
            username,
            password,
            db,
        } => {
            let db_path = db.unwrap_or_else(|| config.database.path.clone());
            create_superuser(&config, &db_path, &username, &password)
        }
        Command::Version => Ok(()),
    }
}

fn start_logging(config: &Config) -> Result<()> {
    let level = config
        .logging
        .level
        .as_deref()
        .unwrap_or(default_log_level());
    match &config.logging.dir {
        Some(dir) => {
            let dir = absolute(dir)?;
            init_logging(level, &dir.to_string_lossy())
        }
        None => init_console_logging(level),
    }
    .map_err(|message| anyhow!("logging init failed: {message}"))
}

fn serve(config: &Config, bind: &str, db_path: &Path) -> Result<()> {
    let conn = open_db(db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let state = AppState::new(conn, config.auth.password_cost());

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime
        .block_on(NotesServer::new(state, bind).run())
        .with_context(|| format!("server on {bind} stopped"))
}

fn create_superuser(config: &Config, db_path: &Path, username: &str, password: &str) -> Result<()> {
    let conn = open_db(db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let auth = AuthService::with_cost(
        SqliteUserRepository::try_new(&conn)?,
        SqliteSessionRepository::try_new(&conn)?,
        config.auth.password_cost(),
    )?;
    let user = auth.create_superuser(username, password)?;
    info!(
        "event=superuser_create module=cli status=ok user_id={}",
        user.id
    );
    println!("created superuser {} (id {})", user.username, user.id);
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(env::current_dir()
        .context("failed to resolve working directory")?
        .join(path))
}
