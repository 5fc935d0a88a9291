//! haystore CLI
//!
//! Command-line tool for working with a volume on disk: store files, fetch
//! them back, tombstone them, and run compaction.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use haystore::{Volume, VolumeConfig};

/// haystore CLI
#[derive(Parser, Debug)]
#[command(name = "haystore-cli")]
#[command(about = "CLI for the haystore small-object storage engine")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./haystore_data")]
    dir: PathBuf,

    /// Volume id to operate on
    #[arg(short, long, default_value = "1")]
    volume: u64,

    /// Volume capacity in MiB
    #[arg(short, long, default_value = "131072")]
    capacity_mb: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a file, printing the assigned id
    Put {
        /// Path of the file to store
        file: PathBuf,
    },

    /// Fetch an object's body by id
    Get {
        /// The id to fetch
        id: u64,

        /// Write the body here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tombstone an object by id
    Delete {
        /// The id to delete
        id: u64,
    },

    /// Rewrite the volume's data file, dropping tombstoned records
    Compact,

    /// Show the volume's cursor and remaining space
    Status,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,haystore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = VolumeConfig::builder()
        .dir(&args.dir)
        .capacity(args.capacity_mb * 1024 * 1024)
        .build();

    let volume = Volume::open(args.volume, config)?;

    match args.command {
        Commands::Put { file } => {
            let body = fs::read(&file)?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let id = volume.put_auto(&body, &filename)?;
            println!("{id}");
        }
        Commands::Get { id, output } => {
            let (body, ext) = volume.get_body(id)?;
            match output {
                Some(path) => {
                    fs::write(&path, &body)?;
                    tracing::info!(id, ext = %ext, bytes = body.len(), "wrote {}", path.display());
                }
                None => io::stdout().write_all(&body)?,
            }
        }
        Commands::Delete { id } => {
            volume.delete(id)?;
            tracing::info!(id, "tombstoned");
        }
        Commands::Compact => {
            let stats = volume.compact()?;
            println!(
                "live: {}, dropped: {}, reclaimed: {} bytes",
                stats.live_records, stats.dropped_records, stats.reclaimed_bytes
            );
        }
        Commands::Status => {
            println!(
                "volume {}: cursor {} bytes, {} bytes remaining",
                volume.id(),
                volume.current_offset(),
                volume.remaining_space()
            );
        }
    }

    Ok(())
}
