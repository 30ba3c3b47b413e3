use crate::fancy::Fancy;
use aur_build_common::errors::*;
use aur_build_common::utils;
use aur_build_common::{Status, Table};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusStats {
    pub count: usize,
    /// Sum of all build times, in minutes
    pub build_time: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Stats {
    pub by_status: BTreeMap<Status, StatusStats>,
    pub max_build_time: u64,
    pub total_size: u64,
    pub max_size: u64,
}

pub fn summarize(table: &Table) -> Stats {
    let mut by_status = Status::ALL
        .iter()
        .map(|status| (*status, StatusStats::default()))
        .collect::<BTreeMap<_, _>>();
    let mut max_build_time: u64 = 0;
    let mut total_size: u64 = 0;
    let mut max_size: u64 = 0;

    for pkg in table.iter() {
        let build_time = pkg.build_time.unwrap_or(0);
        let entry = by_status.entry(pkg.status).or_default();
        entry.count += 1;
        entry.build_time += build_time;
        max_build_time = max_build_time.max(build_time);

        if let Some(filename) = &pkg.filename {
            match fs::metadata(filename) {
                Ok(md) => {
                    total_size += md.len();
                    max_size = max_size.max(md.len());
                }
                Err(err) => warn!("Failed to stat artifact {:?} of {:?}: {}", filename, pkg.name, err),
            }
        }
    }

    Stats {
        by_status,
        max_build_time,
        total_size,
        max_size,
    }
}

fn label(status: Status) -> &'static str {
    match status {
        Status::Builds => "Builds:",
        Status::DoesntBuild => "Doesn't build:",
        Status::New => "New:",
        Status::Deleted => "Deleted:",
        Status::Official => "Official:",
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:16}{:>8}  {:>14}", "", "Pckgs", "Build time")?;
        for status in [
            Status::Builds,
            Status::DoesntBuild,
            Status::New,
            Status::Deleted,
            Status::Official,
        ] {
            let stats = self.by_status.get(&status).copied().unwrap_or_default();
            // pad before coloring, escape codes would break the alignment
            let name = format!("{:16}", label(status));
            writeln!(
                f,
                "{}{:>8}  {:>14}",
                status.paint(&name),
                stats.count,
                utils::mins_to_human(stats.build_time)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total size of artifacts is {} MiB.", utils::bytes_to_mib(self.total_size))?;
        write!(
            f,
            "Max build time for a package is {} min. Max file size is {} MiB.",
            self.max_build_time,
            utils::bytes_to_mib(self.max_size)
        )
    }
}
