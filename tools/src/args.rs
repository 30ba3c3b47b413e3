use aur_build_common::errors::*;
use aur_build_common::Status;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Build all AUR packages via pamac")]
pub struct Args {
    /// Verbose logging
    #[arg(short, long, global = true, action(ArgAction::Count))]
    pub verbose: u8,
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Bypass tty detection and always use colors
    #[arg(short = 'C', long, global = true)]
    pub color: bool,

    /// Shorthand for -d -n -e
    #[arg(long, help_heading = "Actions")]
    pub run: bool,
    /// Initialize/clear database
    #[arg(short, long, help_heading = "Actions")]
    pub init_db: bool,
    /// Download packages list and update database
    #[arg(short, long, help_heading = "Actions")]
    pub download: bool,
    /// Build all packages in status NEW
    #[arg(short = 'n', long = "build-new-packages", help_heading = "Actions")]
    pub build_new: bool,
    /// Build all packages in status DOESNTBUILD
    #[arg(short = 'e', long = "build-packages-with-errors", help_heading = "Actions")]
    pub build_err: bool,
    /// Rebuild all packages in status BUILDS
    #[arg(short = 'r', long = "rebuild-built-packages", help_heading = "Actions")]
    pub rebuild: bool,
    /// Re/build all packages. Shorthand for -n -e -r
    #[arg(short = 'b', long, help_heading = "Actions")]
    pub build_all: bool,
    /// Print database content
    #[arg(long, help_heading = "Actions")]
    pub show_log: bool,
    /// Print database statistics
    #[arg(long, help_heading = "Actions")]
    pub stats: bool,

    /// Skip first n packages in db
    #[arg(long = "skip", value_name = "N")]
    pub skip_packages: Option<usize>,
    /// Analyse at most n packages in db (after skipped ones)
    #[arg(long = "max", value_name = "N")]
    pub max_packages: Option<usize>,

    #[command(subcommand)]
    pub subcommand: Option<SubCommand>,
}

impl Args {
    /// Expand the shorthand flags
    pub fn normalize(&mut self) {
        if self.run {
            self.download = true;
            self.build_new = true;
            self.build_err = true;
        }
        if self.build_all {
            self.build_new = true;
            self.build_err = true;
            self.rebuild = true;
        }
    }

    pub fn allowed_status(&self) -> Vec<Status> {
        let mut allowed = Vec::new();
        if self.build_new {
            allowed.push(Status::New);
        }
        if self.build_err {
            allowed.push(Status::DoesntBuild);
        }
        if self.rebuild {
            allowed.push(Status::Builds);
        }
        allowed
    }

    pub fn has_action(&self) -> bool {
        self.init_db
            || self.download
            || !self.allowed_status().is_empty()
            || self.show_log
            || self.stats
    }
}

#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate shell completions
    Completions(Completions),
}

#[derive(Debug, Parser)]
pub struct Completions {
    pub shell: Shell,
}

pub fn gen_completions(args: &Completions) -> Result<()> {
    clap_complete::generate(
        args.shell,
        &mut Args::command(),
        "aur-build",
        &mut io::stdout(),
    );
    Ok(())
}

pub fn print_help() -> Result<()> {
    Args::command().print_help()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut args = Args::try_parse_from(["aur-build"].iter().chain(args)).unwrap();
        args.normalize();
        args
    }

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_action() {
        let args = parse(&[]);
        assert!(!args.has_action());
        let args = parse(&["--skip", "10", "-v"]);
        assert!(!args.has_action());
    }

    #[test]
    fn run_shorthand() {
        let args = parse(&["--run"]);
        assert!(args.download);
        assert!(!args.init_db);
        assert_eq!(args.allowed_status(), [Status::New, Status::DoesntBuild]);
    }

    #[test]
    fn build_all_shorthand() {
        let args = parse(&["-b"]);
        assert!(!args.download);
        assert_eq!(
            args.allowed_status(),
            [Status::New, Status::DoesntBuild, Status::Builds]
        );
    }

    #[test]
    fn combined_short_flags() {
        let args = parse(&["-idn", "--max", "5", "--skip", "2"]);
        assert!(args.init_db);
        assert!(args.download);
        assert_eq!(args.allowed_status(), [Status::New]);
        assert_eq!(args.skip_packages, Some(2));
        assert_eq!(args.max_packages, Some(5));
    }

    #[test]
    fn rebuild_only() {
        let args = parse(&["--rebuild-built-packages", "--stats"]);
        assert_eq!(args.allowed_status(), [Status::Builds]);
        assert!(args.stats);
        assert!(args.has_action());
    }

    #[test]
    fn completions_subcommand() {
        let args = parse(&["completions", "zsh"]);
        assert!(matches!(args.subcommand, Some(SubCommand::Completions(_))));
        assert!(!args.has_action());
    }
}
