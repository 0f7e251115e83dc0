use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use voila::store::{DATA_KEY, FileKv, KvStore, Snapshot};

#[derive(Parser)]
#[command(name = "voila", version, about = "A gesture-driven task manager in your terminal")]
struct Cli {
    /// Data directory (defaults to ~/.voila)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the starter dataset into the data directory
    Init {
        /// Replace existing data
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let _log_guard = init_logging(&data_dir);

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = voila::tui::run(&data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init { force }) => {
            if let Err(e) = cmd_init(&data_dir, force) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".voila"),
        None => PathBuf::from(".voila"),
    }
}

fn cmd_init(data_dir: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut kv = FileKv::open(data_dir)?;
    if kv.get(DATA_KEY).is_some() && !force {
        return Err(format!(
            "{} already holds data; pass --force to replace it",
            data_dir.display()
        )
        .into());
    }
    kv.set(DATA_KEY, &Snapshot::default_data().encode()?)?;
    println!("seeded starter data in {}", data_dir.display());
    Ok(())
}

/// Log to a file in the data directory; stderr belongs to the TUI.
/// Returns the guard keeping the background writer alive.
fn init_logging(data_dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(data_dir).ok()?;
    let appender = tracing_appender::rolling::never(data_dir, "voila.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
