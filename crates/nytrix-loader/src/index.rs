use std::fs;
use std::path::{Path, PathBuf};

use crate::canonical::{self, RootKind};
use crate::error::LoaderError;
use crate::module_table::{ModuleEntry, ModuleTable};

/// Depth-first walk of `root` collecting every `.ny` file, sorted by
/// relative path for deterministic indexing order (`spec.md` §4.3 step 1).
pub fn walk_ny_files(root: &Path) -> Result<Vec<PathBuf>, LoaderError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    walk_into(root, root, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk_into(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoaderError> {
    let read = fs::read_dir(dir).map_err(|source| LoaderError::Io { path: dir.to_path_buf(), source })?;
    for entry in read {
        let entry = entry.map_err(|source| LoaderError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.is_dir() {
            walk_into(root, &path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("ny") {
            out.push(path.strip_prefix(root).unwrap_or(&path).to_path_buf());
        }
    }
    Ok(())
}

/// Indexes one root directory into `table`, tagging every discovered file
/// with `kind`'s prefix. A missing root is not an error — std/lib roots are
/// probed in a fallback chain and most candidates won't exist
/// (`SPEC_FULL.md` §4).
pub fn index_root(table: &mut ModuleTable, root: &Path, kind: RootKind) -> Result<usize, LoaderError> {
    let files = walk_ny_files(root)?;
    let count = files.len();
    for relative in files {
        let name = canonical::module_name(&relative, kind);
        let package = canonical::package_of(&name).to_string();
        table.insert(ModuleEntry { name, path: root.join(&relative), package });
    }
    table.ensure_sorted();
    Ok(count)
}

/// The ordered list of candidate roots for a given kind: a `NYTRIX_ROOT`-
/// relative path first, then installation-prefix fallbacks. First existing
/// directory wins (`SPEC_FULL.md` §4).
pub fn candidate_roots(kind: RootKind) -> Vec<PathBuf> {
    let subdir = match kind {
        RootKind::Std => "src/std",
        RootKind::Lib => "src/lib",
    };
    let mut roots = Vec::new();
    if let Ok(nytrix_root) = std::env::var("NYTRIX_ROOT") {
        roots.push(PathBuf::from(nytrix_root).join(subdir));
    }
    roots.push(PathBuf::from("/usr/local/share/nytrix").join(subdir));
    roots.push(PathBuf::from("/usr/share/nytrix").join(subdir));
    roots
}

/// Indexes the first existing root of each kind, in fallback order, into
/// `table`. Returns without indexing anything if no root of a kind exists.
pub fn index_default_roots(table: &mut ModuleTable) -> Result<(), LoaderError> {
    for kind in [RootKind::Std, RootKind::Lib] {
        for root in candidate_roots(kind) {
            if root.is_dir() {
                index_root(table, &root, kind)?;
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};
    use std::io::Write;

    fn scratch_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nytrix-loader-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        create_dir_all(dir.join("collections")).unwrap();
        File::create(dir.join("core.ny")).unwrap().write_all(b"def x = 1;").unwrap();
        File::create(dir.join("collections/dict.ny")).unwrap().write_all(b"def y = 2;").unwrap();
        File::create(dir.join("collections/mod.ny")).unwrap().write_all(b"").unwrap();
        dir
    }

    #[test]
    fn walk_finds_all_ny_files_sorted() {
        let root = scratch_root();
        let files = walk_ny_files(&root).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn index_root_populates_table_with_std_prefix() {
        let root = scratch_root();
        let mut table = ModuleTable::new();
        let count = index_root(&mut table, &root, RootKind::Std).unwrap();
        assert_eq!(count, 3);
        assert!(table.get("std.core").is_some());
        assert!(table.get("std.collections.dict").is_some());
        assert!(table.get("std.collections").is_some());
    }
}
