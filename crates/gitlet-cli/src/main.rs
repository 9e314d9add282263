mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{error::ErrorKind, Args, Parser};
use gitlet_hash::HashAlgorithm;
use gitlet_loose::{LooseObjectStore, StoreConfig};
use gitlet_object::DEFAULT_COMPRESSION_LEVEL;
use tracing::debug;

use commands::Commands;

#[derive(Parser)]
#[command(name = "gitlet", about = "A content-addressable object store", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set the path to the repository directory
    #[arg(long = "git-dir", env = "GITLET_DIR", default_value = ".git", global = true)]
    git_dir: PathBuf,

    /// Digest algorithm of the object store
    #[arg(
        long = "object-format",
        env = "GITLET_OBJECT_FORMAT",
        default_value_t = HashAlgorithm::Sha1,
        global = true
    )]
    object_format: HashAlgorithm,

    /// Zlib level for newly written objects
    #[arg(
        long = "compression-level",
        env = "GITLET_COMPRESSION_LEVEL",
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9),
        global = true
    )]
    compression_level: u32,

    #[command(flatten)]
    log: LogArgs,
}

#[derive(Args, Clone, Copy)]
pub struct LogArgs {
    /// More output per occurrence
    #[arg(short, long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    quiet: bool,
}

impl Cli {
    /// Open the object store under `<git-dir>/objects`.
    pub fn store(&self) -> LooseObjectStore {
        let config =
            StoreConfig::new(self.object_format).with_compression_level(self.compression_level);
        debug!(
            git_dir = %self.git_dir.display(),
            format = %self.object_format,
            level = self.compression_level,
            "opening object store"
        );
        LooseObjectStore::open(self.git_dir.join("objects"), config)
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(128),
            }
        }
    };

    logging::init(cli.log);

    match commands::run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("fatal: {e}");
            process::exit(128);
        }
    }
}
