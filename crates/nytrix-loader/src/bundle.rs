use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoaderError;
use crate::module_table::ModuleTable;
use crate::scan::{extract_use_targets, UseRef};

/// How much of the standard library a bundle pulls in (`spec.md` §4.3
/// step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleMode {
    /// Every indexed module.
    Full,
    /// The fixed prelude union the user's direct `use` statements.
    Default,
    /// Same resolution as `Default`, named separately because callers may
    /// want to skip the prelude union and seed from `use` statements alone.
    UseList,
    /// Skip the standard library entirely.
    None,
}

/// The fixed prelude modules injected ahead of user code so unqualified
/// lookups resolve (`spec.md` §4.3 "Prelude").
pub const PRELUDE: &[&str] = &[
    "std.core",
    "std.core.error",
    "std.core.reflect",
    "std.collections",
    "std.collections.dict",
    "std.collections.set",
    "std.strings.str",
    "std.iter",
    "std.io",
];

/// A combined source buffer plus an offset-to-origin map, so diagnostics
/// produced against the bundle can still be attributed to the file the
/// offending text actually came from (`spec.md` §4.3 step 6, "`split_pos`
/// and `split_filename`").
pub struct Bundle {
    pub source: String,
    offsets: Vec<(usize, PathBuf)>,
}

impl Bundle {
    /// The path whose text covers `offset`, if the bundle recorded one —
    /// offsets are pushed in increasing order as each module/segment is
    /// appended, so a binary search over "largest offset <= target" suffices.
    pub fn path_for(&self, offset: usize) -> Option<&Path> {
        match self.offsets.binary_search_by_key(&offset, |(o, _)| *o) {
            Ok(i) => Some(&self.offsets[i].1),
            Err(0) => None,
            Err(i) => Some(&self.offsets[i - 1].1),
        }
    }
}

struct Builder {
    source: String,
    offsets: Vec<(usize, PathBuf)>,
}

impl Builder {
    fn new() -> Builder {
        Builder { source: String::new(), offsets: Vec::new() }
    }

    fn append(&mut self, text: &str, origin: &Path) {
        self.offsets.push((self.source.len(), origin.to_path_buf()));
        self.source.push_str(text);
        self.source.push('\n');
    }

    fn finish(self) -> Bundle {
        Bundle { source: self.source, offsets: self.offsets }
    }
}

/// Builds the standard-library + user-source bundle that the parser then
/// consumes in a single pass (`spec.md` §4.3).
///
/// `entry_path` is the user's own source file (or a synthetic path for
/// inline `-c` snippets), used both as the final segment and as the base
/// for resolving quoted-local `use` targets.
pub fn build(
    mode: BundleMode,
    user_source: &str,
    entry_path: &Path,
    table: &ModuleTable,
) -> Result<Bundle, LoaderError> {
    let mut resolved: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut unresolved: Vec<String> = Vec::new();

    let mut frontier: Vec<String> = match mode {
        BundleMode::Full => table.iter().map(|e| e.name.clone()).collect(),
        BundleMode::Default | BundleMode::UseList => {
            let mut names: Vec<String> = PRELUDE.iter().map(|s| s.to_string()).collect();
            for use_ref in extract_use_targets(user_source) {
                if let UseRef::Name(name) = use_ref {
                    names.push(name);
                }
            }
            names
        }
        BundleMode::None => Vec::new(),
    };

    while let Some(name) = frontier.pop() {
        if seen.contains(&name) {
            continue;
        }
        seen.insert(name.clone());

        if let Some(entry) = table.get(&name) {
            resolved.push(name.clone());
            if let Ok(text) = fs::read_to_string(&entry.path) {
                for use_ref in extract_use_targets(&text) {
                    if let UseRef::Name(n) = use_ref {
                        if !seen.contains(&n) {
                            frontier.push(n);
                        }
                    }
                }
            }
            continue;
        }

        let members = table.package_members(&name);
        if !members.is_empty() {
            for member in members {
                if !seen.contains(&member.name) {
                    frontier.push(member.name.clone());
                }
            }
            continue;
        }

        if mode == BundleMode::Full {
            return Err(LoaderError::UnresolvedPackage(name));
        }
        unresolved.push(name);
    }

    if !unresolved.is_empty() {
        log::warn!("unresolved modules left for the parser to diagnose: {}", unresolved.join(", "));
    }

    resolved.sort();

    let mut builder = Builder::new();
    if !matches!(mode, BundleMode::None) {
        for name in &resolved {
            builder.append(&format!("use {name};"), entry_path);
        }
        for name in &resolved {
            let entry = table.get(name).expect("resolved name must be in the table");
            let text = fs::read_to_string(&entry.path)
                .map_err(|source| LoaderError::Io { path: entry.path.clone(), source })?;
            let wrapped = wrap_if_unmodularized(&text, name);
            builder.append(&wrapped, &entry.path);
        }
    }
    builder.append(user_source, entry_path);

    Ok(builder.finish())
}

/// Wraps a module's source in `module <name> { ... }` unless it already
/// opens with a `module` declaration of its own (`spec.md` §4.3 step 5).
fn wrap_if_unmodularized(text: &str, name: &str) -> String {
    if text.trim_start().starts_with("module") {
        text.to_string()
    } else {
        format!("module {name} {{\n{text}\n}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module_table::ModuleEntry;
    use std::fs::{create_dir_all, File};
    use std::io::Write;

    fn scratch_table() -> (ModuleTable, PathBuf) {
        let dir = std::env::temp_dir().join(format!("nytrix-bundle-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        create_dir_all(&dir).unwrap();
        let core_path = dir.join("core.ny");
        File::create(&core_path).unwrap().write_all(b"def core_fn = 1;").unwrap();

        let mut table = ModuleTable::new();
        table.insert(ModuleEntry { name: "std.core".to_string(), path: core_path, package: "std".to_string() });
        table.ensure_sorted();
        (table, dir)
    }

    #[test]
    fn none_mode_only_contains_user_source() {
        let (table, dir) = scratch_table();
        let bundle = build(BundleMode::None, "def x = 1;", &dir.join("main.ny"), &table).unwrap();
        assert!(!bundle.source.contains("core_fn"));
        assert!(bundle.source.contains("def x = 1;"));
    }

    #[test]
    fn default_mode_wraps_and_pulls_in_prelude() {
        let (table, dir) = scratch_table();
        let bundle = build(BundleMode::Default, "def x = 1;", &dir.join("main.ny"), &table).unwrap();
        assert!(bundle.source.contains("use std.core;"));
        assert!(bundle.source.contains("module std.core {"));
        assert!(bundle.source.contains("core_fn"));
    }

    #[test]
    fn path_for_resolves_the_nearest_preceding_offset() {
        let (table, dir) = scratch_table();
        let bundle = build(BundleMode::None, "def x = 1;", &dir.join("main.ny"), &table).unwrap();
        assert_eq!(bundle.path_for(0), Some(dir.join("main.ny").as_path()));
    }
}
