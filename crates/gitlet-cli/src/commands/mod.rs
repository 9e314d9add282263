pub mod cat_file;
pub mod hash_object;

use anyhow::Result;
use clap::Subcommand;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Provide content or type and size information for stored objects
    CatFile(cat_file::CatFileArgs),
    /// Compute object ID and optionally store a blob from a file
    HashObject(hash_object::HashObjectArgs),
}

pub fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Commands::CatFile(args) => cat_file::run(args, cli),
        Commands::HashObject(args) => hash_object::run(args, cli),
    }
}
