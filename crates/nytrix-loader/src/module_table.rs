use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// One indexed `.ny` file: its canonical name, where it lives on disk, and
/// the package it belongs to (`spec.md` §3.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub name: String,
    pub path: PathBuf,
    pub package: String,
}

/// The in-memory name -> `{path, package}` mapping built by indexing the
/// standard-library roots. Sorted on first population so lookups and
/// bundle emission are reproducible across runs (`spec.md` §3.9).
#[derive(Debug, Default)]
pub struct ModuleTable {
    entries: Vec<ModuleEntry>,
    sorted: bool,
}

impl ModuleTable {
    pub fn new() -> ModuleTable {
        ModuleTable::default()
    }

    pub fn insert(&mut self, entry: ModuleEntry) {
        self.entries.push(entry);
        self.sorted = false;
    }

    /// Sorts by name if not already sorted; idempotent and cheap to call
    /// before every query.
    pub fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.entries.sort_by(|a, b| a.name.cmp(&b.name));
            self.sorted = true;
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Every module whose name begins with `<package>.` — used to resolve
    /// a bare package reference (`spec.md` §4.3 step 3c).
    pub fn package_members(&self, package: &str) -> Vec<&ModuleEntry> {
        let prefix = format!("{package}.");
        self.entries.iter().filter(|e| e.name.starts_with(&prefix)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries.iter()
    }
}

static TABLE: OnceLock<Mutex<ModuleTable>> = OnceLock::new();

/// The process-wide module table, lazily initialised on first access. A
/// concurrent embedding must still serialise its own first-touch indexing
/// through this lock (`SPEC_FULL.md` §4, `spec.md` §5 shared-resource
/// policy).
pub fn shared() -> &'static Mutex<ModuleTable> {
    TABLE.get_or_init(|| Mutex::new(ModuleTable::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, package: &str) -> ModuleEntry {
        ModuleEntry { name: name.to_string(), path: PathBuf::from(name), package: package.to_string() }
    }

    #[test]
    fn sorts_entries_by_name() {
        let mut table = ModuleTable::new();
        table.insert(entry("std.io", "std"));
        table.insert(entry("std.core", "std"));
        table.ensure_sorted();
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["std.core", "std.io"]);
    }

    #[test]
    fn package_members_filters_by_prefix() {
        let mut table = ModuleTable::new();
        table.insert(entry("std.collections.dict", "std"));
        table.insert(entry("std.collections.set", "std"));
        table.insert(entry("std.io", "std"));
        let members = table.package_members("std.collections");
        assert_eq!(members.len(), 2);
    }
}
