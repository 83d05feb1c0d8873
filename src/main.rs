//! breadgrid: the bread factory clerk's workstation.
//!
//! # Usage
//!
//! ```bash
//! # Open the default database (sqlite:bread_factory.db)
//! breadgrid
//!
//! # Another database, deleting rows by id instead of by full-row match
//! breadgrid --database sqlite:/srv/factory.db --delete-mode by-id
//!
//! # Print one table as JSON and exit
//! breadgrid --dump Ингредиенты
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use breadgrid::libs::terminal::{self, TerminalFrontend};
use breadgrid::{AppConfig, DeleteMode, Error, Store, Workbench};

/// Edit every table of a SQLite database as a grid
#[derive(Parser, Debug)]
#[command(name = "breadgrid", version, about)]
struct Args {
    /// Database URL, e.g. sqlite:bread_factory.db
    #[arg(short = 'd', long, env = "BREADGRID_DATABASE")]
    database: Option<String>,

    /// How a selected row is matched on delete
    #[arg(long, value_enum)]
    delete_mode: Option<DeleteModeArg>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the table as JSON and exit
    #[arg(long, value_name = "TABLE")]
    dump: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeleteModeArg {
    /// Match every displayed column (legacy behaviour)
    FullRow,
    /// Match the id column only
    ById,
}

impl From<DeleteModeArg> for DeleteMode {
    fn from(arg: DeleteModeArg) -> Self {
        match arg {
            DeleteModeArg::FullRow => DeleteMode::FullRow,
            DeleteModeArg::ById => DeleteMode::ById,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Ошибка: {e:#}").red());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = load_config(&args)?;

    let mut store = Store::new(config.database_url.clone(), config.delete_mode);
    store
        .connect()
        .await
        .context("Ошибка подключения к базе данных")?;

    let result = match &args.dump {
        Some(table) => dump(&store, table).await,
        None => interactive(&store, &config).await,
    };

    store.close().await;
    result
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("breadgrid=debug")
        } else {
            EnvFilter::new("breadgrid=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => AppConfig::load_default()?,
    };

    if let Some(url) = &args.database {
        config.database_url = url.clone();
    }
    if let Some(mode) = args.delete_mode {
        config.delete_mode = mode.into();
    }

    Ok(config)
}

async fn dump(store: &Store, table: &str) -> Result<()> {
    let json = store.fetch_json(table).await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn interactive(store: &Store, config: &AppConfig) -> Result<()> {
    let mut frontend = TerminalFrontend::new(config.title.clone());
    let mut workbench = match Workbench::open(store, &mut frontend).await {
        Ok(w) => w,
        // the operator has already been warned
        Err(Error::NoTables) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    info!(delete_mode = ?config.delete_mode, "session started");
    terminal::run(&mut workbench, &mut frontend).await?;
    Ok(())
}
