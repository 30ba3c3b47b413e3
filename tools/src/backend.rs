use crate::proc::{self, Options, Output};
use aur_build_common::config::BuilderConfig;
use aur_build_common::errors::*;
use std::ffi::OsStr;
use std::path::PathBuf;

/// The privileged package manager operations the build driver relies on.
pub trait PackageManager {
    /// Search the official repositories for `name`
    fn search(&self, name: &str) -> Result<Output>;

    fn build(&self, name: &str) -> Result<Output>;

    fn remove(&self, name: &str) -> Result<Output>;

    /// Wipe the temporary build directory; pamac leaves it behind.
    fn clean_build_dir(&self) -> Result<()>;
}

#[derive(Debug)]
pub struct Pamac {
    search: Vec<String>,
    build: Vec<String>,
    remove: Vec<String>,
    build_dir: PathBuf,
}

impl Pamac {
    pub fn new(config: &BuilderConfig, user: &str) -> Pamac {
        Pamac {
            search: config.search(),
            build: config.build(),
            remove: config.remove(),
            build_dir: config.build_dir(user),
        }
    }

    fn exec(cmd: &[String], name: &str, opts: Options) -> Result<Output> {
        let (bin, args) = proc::split_command(cmd)?;
        let mut args = args.to_vec();
        args.push(name.to_string());
        proc::run(bin, &args, opts)
    }
}

impl PackageManager for Pamac {
    fn search(&self, name: &str) -> Result<Output> {
        Self::exec(&self.search, name, Options::default())
    }

    fn build(&self, name: &str) -> Result<Output> {
        Self::exec(&self.build, name, Options { passthrough: true })
    }

    fn remove(&self, name: &str) -> Result<Output> {
        Self::exec(&self.remove, name, Options { passthrough: true })
    }

    fn clean_build_dir(&self) -> Result<()> {
        // parts of the build dir are unreadable for us, leave this to rm
        let args = [OsStr::new("-rf"), self.build_dir.as_os_str()];
        let output = proc::run("rm", args, Options::default())?;
        if !output.success() {
            bail!(
                "Failed to remove {:?} ({}): {}",
                self.build_dir,
                output.describe(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// Current effective user, used to locate pamac's build directory
pub fn current_user() -> Result<String> {
    let uid = nix::unistd::geteuid();
    let user = nix::unistd::User::from_uid(uid)
        .context("Failed to look up current user")?
        .ok_or_else(|| format_err!("No passwd entry for uid {}", uid))?;
    Ok(user.name)
}
