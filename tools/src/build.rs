use crate::backend::PackageManager;
use aur_build_common::db::Database;
use aur_build_common::errors::*;
use aur_build_common::utils;
use aur_build_common::{Package, Status, Table};
use glob::Pattern;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct BuildContext<'a> {
    pub db: &'a Database,
    pub pm: &'a dyn PackageManager,
    pub pkg_cache: PathBuf,
    pub artifact_suffix: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Limits {
    /// Leave the first n packages alone
    pub skip: Option<usize>,
    /// Stop after analysing n packages (after the skipped ones)
    pub max: Option<usize>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub not_requested: usize,
    pub official: usize,
    pub builds: usize,
    pub doesnt_build: usize,
}

pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.done * 100 / self.total
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packages processed out of {} ({}%)",
            self.done,
            self.total,
            self.percent()
        )
    }
}

fn readable_entries<I, E>(entries: I) -> impl Iterator<Item = PathBuf>
where
    I: IntoIterator<Item = Result<PathBuf, E>>,
    E: fmt::Display,
{
    entries.into_iter().filter_map(|entry| match entry {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("Ignoring unreadable artifact candidate: {}", err);
            None
        }
    })
}

fn round_minutes(duration: Duration) -> u64 {
    (duration.as_secs_f64() / 60.0).round() as u64
}

/// Newest artifact for `name` in the package cache.
///
/// The version isn't known here, so this picks the lexicographically last
/// match, which is not necessarily the highest version.
pub fn latest_artifact(cache: &Path, name: &str, suffix: &str) -> Result<Option<PathBuf>> {
    let pattern = format!(
        "{}/{}*{}",
        Pattern::escape(&cache.to_string_lossy()),
        Pattern::escape(name),
        suffix
    );
    trace!("Looking for artifacts matching {:?}", pattern);

    let entries = glob::glob(&pattern)
        .with_context(|| anyhow!("Invalid artifact pattern: {:?}", pattern))?;
    let latest = readable_entries(entries).max();
    Ok(latest)
}

/// Check if the package has made it into the official repositories.
pub fn check_official(pm: &dyn PackageManager, pkg: &mut Package) -> Result<bool> {
    let output = pm.search(&pkg.name)?;
    if output.success() {
        info!("Package {:?} is available from the official repositories", pkg.name);
        pkg.status = Status::Official;
        Ok(true)
    } else if output.not_found() {
        Ok(false)
    } else {
        bail!(
            "Failed to search repositories for {:?} ({}): {}",
            pkg.name,
            output.describe(),
            String::from_utf8_lossy(&output.stderr).trim()
        )
    }
}

/// Build the package, then remove it again so only the artifact remains.
pub fn attempt_build(ctx: &BuildContext, pkg: &mut Package) -> Result<()> {
    let start = Instant::now();
    pkg.filename = None;
    pkg.build_time = None;
    pkg.built_on = Some(utils::today());

    let output = ctx.pm.build(&pkg.name)?;
    if output.success() {
        pkg.filename = latest_artifact(&ctx.pkg_cache, &pkg.name, &ctx.artifact_suffix)?;
        if pkg.filename.is_none() {
            warn!("Build of {:?} succeeded but no artifact was found in {:?}", pkg.name, ctx.pkg_cache);
        }
        pkg.status = Status::Builds;
    } else {
        warn!("Build of {:?} failed ({})", pkg.name, output.describe());
        pkg.status = Status::DoesntBuild;
    }

    pkg.build_time = Some(round_minutes(start.elapsed()));

    if pkg.status == Status::Builds {
        let output = ctx.pm.remove(&pkg.name)?;
        if !output.success() {
            warn!("Cannot remove package {:?} ({})", pkg.name, output.describe());
        }
    }

    ctx.pm.clean_build_dir()?;
    Ok(())
}

enum Outcome {
    NotRequested(Status),
    Official,
    Built(Status),
}

/// Build every package whose status is in `allowed`, writing the database
/// after each package that changed.
pub fn run_builds(ctx: &BuildContext, table: &mut Table, allowed: &[Status], limits: Limits) -> Result<BuildSummary> {
    let total = table.len();
    let skip = limits.skip.unwrap_or(0);
    let mut summary = BuildSummary {
        total,
        ..Default::default()
    };

    for idx in 0..total {
        if let Some(max) = limits.max {
            if summary.processed >= max {
                info!("Stopping because {} packages have been analysed", summary.processed);
                break;
            }
        }

        let pkg = match table.at_mut(idx) {
            Some(pkg) => pkg,
            None => break,
        };
        info!("=== Reading package: {} =========", pkg.name);

        if summary.skipped < skip {
            debug!("Skipping.");
            summary.skipped += 1;
            continue;
        }
        summary.processed += 1;

        let outcome = if !pkg.status.is_buildable() || !allowed.contains(&pkg.status) {
            Outcome::NotRequested(pkg.status)
        } else if check_official(ctx.pm, pkg)? {
            Outcome::Official
        } else {
            attempt_build(ctx, pkg)?;
            Outcome::Built(pkg.status)
        };

        match outcome {
            Outcome::NotRequested(status) => {
                info!("Skipping, package has status {}", status);
                summary.not_requested += 1;
            }
            Outcome::Official => {
                ctx.db.write(table)?;
                summary.official += 1;
            }
            Outcome::Built(status) => {
                ctx.db.write(table)?;
                if status == Status::Builds {
                    summary.builds += 1;
                } else {
                    summary.doesnt_build += 1;
                }
            }
        }

        let progress = Progress {
            done: summary.skipped + summary.processed,
            total,
        };
        info!("{}", progress);
    }

    Ok(summary)
}
