use std::path::Path;

/// Which configured root kind a file was indexed under — `std.` and `lib.`
/// roots are searched separately and the prefix is chosen by root, not by
/// whatever the path happens to already say (`original_source/src/base/loader.c`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Std,
    Lib,
}

impl RootKind {
    fn prefix(self) -> &'static str {
        match self {
            RootKind::Std => "std.",
            RootKind::Lib => "lib.",
        }
    }
}

/// Derives a canonical dotted module name from a `.ny` file's path relative
/// to its indexed root (`spec.md` §3.9, §4.3 step 1).
///
/// `foo/bar.ny` -> `<prefix>foo.bar`; `foo/mod.ny` -> `<prefix>foo`. Any
/// `src.std.`/`src.lib.`/`std.`/`lib.` prefix already present in the
/// path-derived name is stripped before re-prefixing, so indexing the same
/// file twice under different root kinds can't double up.
pub fn module_name(relative_path: &Path, root: RootKind) -> String {
    let mut segments: Vec<String> = relative_path
        .with_extension("")
        .iter()
        .map(|os| os.to_string_lossy().into_owned())
        .collect();

    if segments.last().map(String::as_str) == Some("mod") {
        segments.pop();
    }

    let mut dotted = segments.join(".");
    for stale in ["src.std.", "src.lib.", "std.", "lib."] {
        if let Some(stripped) = dotted.strip_prefix(stale) {
            dotted = stripped.to_string();
            break;
        }
    }

    format!("{}{}", root.prefix(), dotted)
}

/// The package a module belongs to: everything before its first `.`.
pub fn package_of(module_name: &str) -> &str {
    module_name.split('.').next().unwrap_or(module_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_becomes_dotted_name() {
        assert_eq!(module_name(Path::new("collections/dict.ny"), RootKind::Std), "std.collections.dict");
    }

    #[test]
    fn mod_suffix_names_the_directory() {
        assert_eq!(module_name(Path::new("collections/mod.ny"), RootKind::Std), "std.collections");
    }

    #[test]
    fn lib_root_uses_lib_prefix() {
        assert_eq!(module_name(Path::new("json.ny"), RootKind::Lib), "lib.json");
    }

    #[test]
    fn pre_existing_prefix_is_not_doubled() {
        assert_eq!(module_name(Path::new("std/core.ny"), RootKind::Std), "std.core");
    }

    #[test]
    fn package_is_first_dotted_segment() {
        assert_eq!(package_of("std.collections.dict"), "std");
        assert_eq!(package_of("lib.json"), "lib");
    }
}
