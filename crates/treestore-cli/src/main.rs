//! Treestore CLI - query and edit parent-linked item collections

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treestore_core::{Item, TreeStore};

mod commands;
mod config;
mod output;

use commands::{completions, edit, query};
use config::{config_file_path, Config};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "treestore")]
#[command(author, version, about = "Query and edit parent-linked item collections")]
pub struct Cli {
    /// Items file, a JSON array (stdin if omitted or "-")
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Config file
    #[arg(long, env = "TREESTORE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format: json, table (defaults to config)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Query(query::QueryCommands),
    #[command(flatten)]
    Edit(edit::EditCommands),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context shared by the item commands
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
    pub input: Option<PathBuf>,
}

impl AppContext {
    pub fn new(cli: &Cli, config: Config) -> Self {
        Self {
            format: cli.format.unwrap_or(config.format),
            input: cli.input.clone().filter(|path| path.as_os_str() != "-"),
            config,
        }
    }

    /// Read the input collection and index it
    ///
    /// Loading never rejects the file's contents; the configured options
    /// only apply to the mutations that follow.
    pub fn load_store(&self) -> anyhow::Result<TreeStore<Item>> {
        let content = match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let items = Item::list_from_json(&content)?;
        tracing::debug!("Loaded {} items from {:?}", items.len(), self.input);

        let mut store = TreeStore::new(items);
        store.set_options(self.config.store_options());
        Ok(store)
    }

    /// Write the collection back to the input file
    pub fn save_store(&self, store: &TreeStore<Item>) -> anyhow::Result<()> {
        let path = self
            .input
            .as_deref()
            .context("--write needs an input file (-i)")?;
        write_items(path, store.get_all())?;
        tracing::info!("Wrote {} items to {:?}", store.len(), path);
        Ok(())
    }
}

fn write_items(path: &Path, items: &[Item]) -> anyhow::Result<()> {
    let mut json = serde_json::to_string_pretty(items)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting treestore CLI");

    let config_path = config_file_path(cli.config.as_deref());

    match &cli.command {
        Commands::Config(args) => commands::config::run(args, &config_path)?,
        Commands::Completions(args) => completions::run(args)?,
        Commands::Query(command) => {
            let ctx = AppContext::new(&cli, Config::load(&config_path)?);
            query::run(command, &ctx)?
        }
        Commands::Edit(command) => {
            let ctx = AppContext::new(&cli, Config::load(&config_path)?);
            edit::run(command, &ctx)?
        }
    }

    Ok(())
}
