use crate::errors::*;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::str::FromStr;

pub mod config;
pub mod db;
pub mod errors;
pub mod http;
pub mod utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    New,
    DoesntBuild,
    Builds,
    Deleted,
    Official,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::DoesntBuild,
        Status::Builds,
        Status::Deleted,
        Status::Official,
    ];

    /// DELETED and OFFICIAL packages are never built again
    pub fn is_buildable(&self) -> bool {
        !matches!(self, Status::Deleted | Status::Official)
    }
}

impl Deref for Status {
    type Target = str;

    fn deref(&self) -> &'static str {
        match self {
            Status::New         => "NEW",
            Status::DoesntBuild => "DOESNTBUILD",
            Status::Builds      => "BUILDS",
            Status::Deleted     => "DELETED",
            Status::Official    => "OFFICIAL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Status> {
        match s {
            "NEW" => Ok(Status::New),
            "DOESNTBUILD" => Ok(Status::DoesntBuild),
            "BUILDS" => Ok(Status::Builds),
            "DELETED" => Ok(Status::Deleted),
            "OFFICIAL" => Ok(Status::Official),
            _ => bail!("Unknown status: {:?}", s),
        }
    }
}

/// A tracked package and the outcome of its last build attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub status: Status,
    /// Duration of the last build attempt, in minutes
    pub build_time: Option<u64>,
    pub built_on: Option<NaiveDate>,
    pub filename: Option<PathBuf>,
}

impl Package {
    pub fn new(name: String) -> Package {
        Package {
            name,
            status: Status::New,
            build_time: None,
            built_on: None,
            filename: None,
        }
    }
}

/// All tracked packages, iterated in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Table {
    pkgs: Vec<Package>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    pub fn len(&self) -> usize {
        self.pkgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pkgs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.index.get(name).map(|idx| &self.pkgs[*idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Package> {
        self.index.get(name).map(|idx| &mut self.pkgs[*idx])
    }

    /// Add a package, replacing any existing record with the same name in place.
    pub fn insert(&mut self, pkg: Package) {
        if let Some(idx) = self.index.get(&pkg.name) {
            self.pkgs[*idx] = pkg;
        } else {
            self.index.insert(pkg.name.clone(), self.pkgs.len());
            self.pkgs.push(pkg);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.pkgs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Package> {
        self.pkgs.iter_mut()
    }

    /// Package at position `idx` in iteration order
    pub fn at_mut(&mut self, idx: usize) -> Option<&mut Package> {
        self.pkgs.get_mut(idx)
    }

    pub fn sorted(&self) -> Vec<&Package> {
        let mut pkgs = self.pkgs.iter().collect::<Vec<_>>();
        pkgs.sort_by(|a, b| a.name.cmp(&b.name));
        pkgs
    }
}

impl FromIterator<Package> for Table {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Table {
        let mut table = Table::new();
        for pkg in iter {
            table.insert(pkg);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_forms() {
        for status in Status::ALL {
            let parsed = status.parse::<Status>().unwrap();
            assert_eq!(parsed, status);
        }
        assert_eq!(Status::DoesntBuild.to_string(), "DOESNTBUILD");
        assert!("UNKWN".parse::<Status>().is_err());
        assert!("new".parse::<Status>().is_err());
    }

    #[test]
    fn terminal_status_is_not_buildable() {
        assert!(Status::New.is_buildable());
        assert!(Status::DoesntBuild.is_buildable());
        assert!(Status::Builds.is_buildable());
        assert!(!Status::Deleted.is_buildable());
        assert!(!Status::Official.is_buildable());
    }

    #[test]
    fn table_keeps_insertion_order() {
        let table = ["zsh-theme", "aaa", "mmm"]
            .into_iter()
            .map(|n| Package::new(n.to_string()))
            .collect::<Table>();
        let names = table.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["zsh-theme", "aaa", "mmm"]);

        let sorted = table.sorted().into_iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(sorted, ["aaa", "mmm", "zsh-theme"]);
    }

    #[test]
    fn table_insert_replaces_in_place() {
        let mut table = Table::new();
        table.insert(Package::new("a".to_string()));
        table.insert(Package::new("b".to_string()));

        let mut pkg = Package::new("a".to_string());
        pkg.status = Status::Builds;
        table.insert(pkg);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a").unwrap().status, Status::Builds);
        assert_eq!(table.iter().next().unwrap().name, "a");
    }

    #[test]
    fn table_lookup() {
        let mut table = Table::new();
        assert!(table.is_empty());
        table.insert(Package::new("yay".to_string()));
        assert!(table.contains("yay"));
        assert!(!table.contains("paru"));
        table.get_mut("yay").unwrap().status = Status::Official;
        assert_eq!(table.get("yay").unwrap().status, Status::Official);
    }
}
