use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Args;
use gitlet_loose::LooseObjectStore;
use gitlet_object::{Object, ObjectType};

use crate::Cli;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Read the object from stdin
    #[arg(long)]
    stdin: bool,

    /// Actually write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// Object type
    #[arg(short = 't', default_value = "blob")]
    obj_type: ObjectType,

    /// Files to hash
    #[arg(value_name = "file", required_unless_present = "stdin")]
    files: Vec<String>,
}

pub fn run(args: &HashObjectArgs, cli: &Cli) -> Result<i32> {
    let store = cli.store();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.stdin {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        writeln!(out, "{}", hash_and_maybe_write(&store, args, &data)?)?;
    }

    for file in &args.files {
        let data = std::fs::read(file).with_context(|| format!("could not open '{file}'"))?;
        writeln!(out, "{}", hash_and_maybe_write(&store, args, &data)?)?;
    }

    Ok(0)
}

/// Returns the hex digest of `data` wrapped as `args.obj_type`.
fn hash_and_maybe_write(
    store: &LooseObjectStore,
    args: &HashObjectArgs,
    data: &[u8],
) -> Result<String> {
    let object = Object::decode_payload(args.obj_type, data, store.hash_algo())?;
    let lazy = store.prepare(object);
    if args.write {
        store.write(&lazy)?;
    }
    Ok(lazy.digest()?)
}
