use aur_build_common::errors::*;
use aur_build_common::{Package, Status, Table};
use std::collections::HashSet;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub deleted: usize,
}

/// Mark packages missing from `fetched` as deleted and start tracking new ones.
///
/// Any package that disappeared upstream is marked DELETED, no matter its
/// previous status. Packages that reappear later are not revived.
pub fn reconcile(table: &mut Table, fetched: &HashSet<String>) -> SyncSummary {
    let mut summary = SyncSummary::default();

    for pkg in table.iter_mut() {
        if !fetched.contains(&pkg.name) && pkg.status != Status::Deleted {
            debug!("Package {:?} is gone from the list", pkg.name);
            pkg.status = Status::Deleted;
            summary.deleted += 1;
        }
    }

    let mut new = fetched
        .iter()
        .filter(|name| !table.contains(name))
        .cloned()
        .collect::<Vec<_>>();
    new.sort();

    summary.added = new.len();
    for name in new {
        table.insert(Package::new(name));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, status: Status) -> Package {
        let mut pkg = Package::new(name.to_string());
        pkg.status = status;
        pkg
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn add_and_delete() {
        let mut table = [pkg("A", Status::Builds), pkg("B", Status::New)]
            .into_iter()
            .collect::<Table>();
        let summary = reconcile(&mut table, &set(&["A", "C"]));

        assert_eq!(summary, SyncSummary { added: 1, deleted: 1 });
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A").unwrap().status, Status::Builds);
        assert_eq!(table.get("B").unwrap().status, Status::Deleted);
        assert_eq!(table.get("C").unwrap().status, Status::New);
    }

    #[test]
    fn deleted_overrides_terminal_status() {
        let mut table = [pkg("official", Status::Official), pkg("built", Status::Builds)]
            .into_iter()
            .collect::<Table>();
        let summary = reconcile(&mut table, &HashSet::new());
        assert_eq!(summary.deleted, 2);
        assert!(table.iter().all(|p| p.status == Status::Deleted));
    }

    #[test]
    fn reappearing_package_stays_deleted() {
        let mut table = [pkg("gone", Status::Deleted)].into_iter().collect::<Table>();
        let summary = reconcile(&mut table, &set(&["gone"]));
        assert_eq!(summary, SyncSummary::default());
        assert_eq!(table.get("gone").unwrap().status, Status::Deleted);
    }

    #[test]
    fn new_packages_appended_sorted() {
        let mut table = [pkg("m", Status::New)].into_iter().collect::<Table>();
        reconcile(&mut table, &set(&["z", "m", "b", "a"]));
        let names = table.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["m", "a", "b", "z"]);
    }

    #[test]
    fn keeps_build_results() {
        let mut built = pkg("yay", Status::DoesntBuild);
        built.build_time = Some(4);
        let mut table = [built.clone()].into_iter().collect::<Table>();
        reconcile(&mut table, &set(&["yay"]));
        assert_eq!(table.get("yay"), Some(&built));
    }
}
