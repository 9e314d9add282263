use std::io::{self, Write};

use anyhow::{anyhow, Result};
use clap::Args;
use gitlet_hash::ObjectId;
use gitlet_object::header::strip_header;

use crate::Cli;

#[derive(Args)]
pub struct CatFileArgs {
    /// Show object type
    #[arg(short = 't', conflicts_with_all = ["size", "pretty"])]
    type_only: bool,

    /// Show object size
    #[arg(short = 's', conflicts_with_all = ["type_only", "pretty"])]
    size: bool,

    /// Pretty-print the object content
    #[arg(short = 'p', conflicts_with_all = ["type_only", "size"])]
    pretty: bool,

    /// Full hex digest of the object
    #[arg(value_name = "object")]
    object: String,
}

pub fn run(args: &CatFileArgs, cli: &Cli) -> Result<i32> {
    let oid: ObjectId = args
        .object
        .parse()
        .map_err(|_| anyhow!("not a valid object name {}", args.object))?;
    let obj = cli.store().read(&oid)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.type_only {
        writeln!(out, "{}", obj.object_type())?;
    } else if args.size {
        writeln!(out, "{}", obj.payload().len())?;
    } else if args.pretty {
        out.write_all(&obj.render())?;
    } else {
        out.write_all(strip_header(obj.encoded())?)?;
    }
    out.flush()?;
    Ok(0)
}
