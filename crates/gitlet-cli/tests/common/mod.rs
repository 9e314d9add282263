//! Process runner for gitlet integration tests. The environment is pinned
//! so outer `GITLET_*` or `RUST_LOG` settings cannot leak in.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured output from running the binary.
pub struct CommandResult {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim_end().to_string()
    }
}

fn command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gitlet"));
    cmd.args(args)
        .current_dir(dir)
        .env_remove("GITLET_DIR")
        .env_remove("GITLET_OBJECT_FORMAT")
        .env_remove("GITLET_COMPRESSION_LEVEL")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Run gitlet in `dir`, feeding `stdin_bytes` on stdin.
pub fn gitlet_stdin(dir: &Path, args: &[&str], stdin_bytes: &[u8]) -> CommandResult {
    run(command(dir, args), stdin_bytes)
}

pub fn gitlet(dir: &Path, args: &[&str]) -> CommandResult {
    gitlet_stdin(dir, args, b"")
}

/// Run gitlet with extra environment variables set.
pub fn gitlet_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> CommandResult {
    let mut cmd = command(dir, args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    run(cmd, b"")
}

fn run(mut cmd: Command, stdin_bytes: &[u8]) -> CommandResult {
    let mut child = cmd.spawn().expect("failed to run gitlet");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin_bytes)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    CommandResult {
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}
