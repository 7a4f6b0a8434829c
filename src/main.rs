//! casket CLI - Command line interface for the casket blob store
//!
//! A thin consumer of the library: stores files (or stdin) under their
//! content key, streams blobs back out, and runs maintenance sweeps.

use casket::{BlobStore, FsBlobStore, Key};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "casket")]
#[command(about = "A content-addressed blob store")]
#[command(version)]
struct Cli {
    /// Root directory for blob storage
    #[arg(short, long, default_value = ".casket")]
    root: PathBuf,

    /// Number of directory-sharding levels
    #[arg(short, long, default_value_t = 3)]
    levels: u32,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file (or stdin) and print its key
    Put {
        /// File to store; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Write a blob's bytes to stdout
    Cat {
        /// The blob key (40 hex characters)
        key: String,
    },

    /// Remove a blob
    Rm {
        /// The blob key
        key: String,
    },

    /// Check whether a blob exists
    Exists {
        /// The blob key
        key: String,
    },

    /// Print the storage path for a key
    Path {
        /// The blob key
        key: String,
    },

    /// Delete temp files abandoned by interrupted stores
    Sweep {
        /// Only delete temp files older than this many seconds
        #[arg(long, default_value_t = 3600)]
        older_than_secs: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let store = FsBlobStore::new(&cli.root, cli.levels)?;

    match cli.command {
        Commands::Put { file } => {
            let key = match file {
                Some(path) => {
                    let mut input = File::open(&path)?;
                    store.store(&mut input)?
                }
                None => store.store(&mut io::stdin().lock())?,
            };
            output(&cli.format, &serde_json::json!({ "key": key.to_hex() }));
        }

        Commands::Cat { key } => {
            let key = parse_key(&key)?;
            let mut stream = store.retrieve(&key)?;
            io::copy(&mut stream, &mut io::stdout().lock())?;
        }

        Commands::Rm { key } => {
            let key = parse_key(&key)?;
            store.remove(&key)?;
            output(
                &cli.format,
                &serde_json::json!({ "status": "ok", "key": key.to_hex() }),
            );
        }

        Commands::Exists { key } => {
            let key = parse_key(&key)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key.to_hex(),
                    "exists": store.contains(&key)?
                }),
            );
        }

        Commands::Path { key } => {
            let key = parse_key(&key)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key.to_hex(),
                    "path": store.path_for(&key).display().to_string()
                }),
            );
        }

        Commands::Sweep { older_than_secs } => {
            let swept = store.sweep_orphans(Duration::from_secs(older_than_secs))?;
            output(&cli.format, &serde_json::json!({ "swept": swept }));
        }
    }

    Ok(())
}

fn parse_key(s: &str) -> anyhow::Result<Key> {
    Key::from_hex(s).map_err(|_| anyhow::anyhow!("Invalid key: {}", s))
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value).unwrap());
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
    }
}
