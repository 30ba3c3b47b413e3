use aur_build_common::errors::*;
use std::env;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

/// `$PAGER` split into words, falling back to `less -R`
fn pager_command() -> Vec<String> {
    let pager = env::var("PAGER").unwrap_or_default();
    let cmd = pager
        .split_whitespace()
        .map(String::from)
        .collect::<Vec<_>>();
    if cmd.is_empty() {
        vec!["less".to_string(), "-R".to_string()]
    } else {
        cmd
    }
}

fn to_stdout(buf: &[u8]) -> Result<()> {
    match io::stdout().write_all(buf) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        res => res.context("Failed to write to stdout"),
    }
}

/// Page the raw database content when attached to a terminal.
pub fn show(buf: &[u8]) -> Result<()> {
    if !io::stdout().is_terminal() || env::var_os("NOPAGER").is_some() {
        return to_stdout(buf);
    }

    let cmd = pager_command();
    debug!("Using pager {:?}", cmd);
    let mut child = Command::new(&cmd[0])
        .args(&cmd[1..])
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| anyhow!("Failed to spawn pager {:?}", cmd[0]))?;

    if let Some(mut stdin) = child.stdin.take() {
        // the user may quit before reading everything
        stdin.write_all(buf).ok();
    }
    child.wait()?;
    Ok(())
}
