//! QuizSync CLI
//!
//! Command-line interface for syncing study data between two devices.
//!
//! # Commands
//!
//! - `serve` - Listen for a peer, merge its data, send back the result
//! - `sync` - Find a serving peer (or connect to an address) and sync
//! - `inspect` - Display statistics about a local store file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// QuizSync command-line sync tools.
#[derive(Parser)]
#[command(name = "quizsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the local store file (JSON)
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for a peer, merge its data, send back the result
    Serve {
        /// Port to listen on (0 picks an ephemeral port)
        #[arg(short, long, default_value_t = quizsync_protocol::DEFAULT_PORT)]
        port: u16,

        /// mDNS instance name shown to browsing peers
        #[arg(short, long, default_value = "quizsync")]
        name: String,

        /// Do not advertise over mDNS
        #[arg(long)]
        no_advertise: bool,
    },

    /// Find a serving peer (or connect to an address) and sync
    Sync {
        /// Connect to this address instead of browsing mDNS
        /// (host:port, or a bare IP for the default port)
        #[arg(short, long)]
        addr: Option<String>,

        /// How many seconds to browse before giving up
        #[arg(short, long, default_value = "10")]
        timeout: u64,
    },

    /// Display statistics about a local store file
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            port,
            name,
            no_advertise,
        } => {
            let store = cli.store.ok_or("Store path required for serve")?;
            commands::serve::run(&store, port, &name, !no_advertise)?;
        }
        Commands::Sync { addr, timeout } => {
            let store = cli.store.ok_or("Store path required for sync")?;
            commands::sync::run(&store, addr.as_deref(), timeout)?;
        }
        Commands::Inspect { format } => {
            let store = cli.store.ok_or("Store path required for inspect")?;
            commands::inspect::run(&store, &format)?;
        }
        Commands::Version => {
            println!("QuizSync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
