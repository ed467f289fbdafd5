//! Quicknotes CLI
//!
//! Runs the Quicknotes HTTP server and talks to it from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use quicknotes_core::Config;

mod client;
mod commands;
mod editor;
mod logging;
mod output;
mod server;

use client::NotesClient;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quicknotes")]
#[command(about = "Quicknotes - a tiny note-taking service")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Snapshot file (overrides config)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// List all notes
    #[command(alias = "ls")]
    List,
    /// Create a note
    Add {
        /// Note title
        title: String,
        /// Note content (opens editor if not provided)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Edit a note
    Edit {
        /// Note ID
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (snapshot_path, host, port, server_url, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even with a broken config file
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let mut config = Config::load_with_cli_override(config_path)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            snapshot,
        } => {
            apply_serve_overrides(&mut config, host, port, snapshot);
            logging::init(&config);
            server::start_server(&config).await
        }
        Commands::List => commands::note::list(&client(&config), &output).await,
        Commands::Add { title, content } => {
            commands::note::add(&client(&config), title, content, &output).await
        }
        Commands::Edit { id, title, content } => {
            commands::note::edit(&client(&config), id, title, content, &output).await
        }
        Commands::Delete { id, yes } => {
            commands::note::delete(&client(&config), id, yes, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn client(config: &Config) -> NotesClient {
    NotesClient::new(config.server_url.clone())
}

fn apply_serve_overrides(
    config: &mut Config,
    host: Option<String>,
    port: Option<u16>,
    snapshot: Option<PathBuf>,
) {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(snapshot) = snapshot {
        config.snapshot_path = snapshot;
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
