use aur_build_common::errors::*;
use std::ffi::OsStr;
use std::fmt;
use std::process::{Command, Stdio};

/// pacman exits with 1 if a search didn't match anything
pub const EXIT_NOT_FOUND: i32 = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    /// Let the child write to our stdout/stderr instead of capturing
    pub passthrough: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// `None` if the child was terminated by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Output {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn not_found(&self) -> bool {
        self.code == Some(EXIT_NOT_FOUND)
    }

    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exit={}", code),
            None => "killed by signal".to_string(),
        }
    }
}

/// Run `bin` to completion. Failing to start the process is an error, a
/// non-zero exit is not.
pub fn run<I, S>(bin: &str, args: I, opts: Options) -> Result<Output>
where
    I: IntoIterator<Item = S> + fmt::Debug,
    S: AsRef<OsStr>,
{
    info!("Running {:?} {:?}", bin, args);
    let mut cmd = Command::new(bin);
    cmd.args(args).stdin(Stdio::null());

    let output = if opts.passthrough {
        let status = cmd
            .status()
            .with_context(|| anyhow!("Failed to execute {:?}", bin))?;
        Output {
            code: status.code(),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    } else {
        let output = cmd
            .output()
            .with_context(|| anyhow!("Failed to execute {:?}", bin))?;
        Output {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    };

    debug!(
        "{:?} exited with {}, captured {} bytes",
        bin,
        output.describe(),
        output.stdout.len() + output.stderr.len()
    );
    Ok(output)
}

/// Split a configured command line into the binary and its leading arguments.
pub fn split_command(cmd: &[String]) -> Result<(&str, &[String])> {
    let (bin, args) = cmd
        .split_first()
        .ok_or_else(|| format_err!("Command is empty"))?;
    Ok((bin.as_str(), args))
}
