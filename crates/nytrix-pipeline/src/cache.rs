//! The JIT IR cache (`spec.md` §4.5.8): keyed by a DJB2 hash of the
//! combined source, XORed with the mtime and path hash of the resolved
//! stdlib bundle, stored as bitcode under `$HOME/.cache/nytrix/jit`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

pub const CACHE_ENV_VAR: &str = "NYTRIX_JIT_CACHE";

/// Disabled by setting `NYTRIX_JIT_CACHE` to `0`/`off`/`false`; enabled by
/// default otherwise.
pub fn enabled() -> bool {
    match env::var(CACHE_ENV_VAR) {
        Ok(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "off" | "false"),
        Err(_) => true,
    }
}

pub fn djb2(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &b in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(b as u64);
    }
    hash
}

fn path_hash(path: &Path) -> u64 {
    djb2(path.to_string_lossy().as_bytes())
}

fn mtime_hash(path: &Path) -> u64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn cache_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache").join("nytrix").join("jit"))
}

/// `stdlib_origin` is whichever standard-library path actually fed the
/// bundle (a prebuilt bundle file or an indexed root) — mixed into the key
/// so a stdlib change invalidates the cache even if the user's own source
/// didn't change.
pub fn cache_path(combined_source: &str, stdlib_origin: Option<&Path>) -> Option<PathBuf> {
    let dir = cache_dir()?;
    let source_hash = djb2(combined_source.as_bytes());
    let stdlib_mix = stdlib_origin.map(|p| mtime_hash(p) ^ path_hash(p)).unwrap_or(0);
    let key = source_hash ^ stdlib_mix;
    Some(dir.join(format!("{source_hash:016x}_{key:016x}.bc")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn djb2_is_deterministic_and_distinguishes_input() {
        assert_eq!(djb2(b"hello"), djb2(b"hello"));
        assert_ne!(djb2(b"hello"), djb2(b"world"));
    }

    #[test]
    fn cache_enabled_respects_the_env_var() {
        env::set_var(CACHE_ENV_VAR, "off");
        assert!(!enabled());
        env::set_var(CACHE_ENV_VAR, "1");
        assert!(enabled());
        env::remove_var(CACHE_ENV_VAR);
        assert!(enabled());
    }

    #[test]
    fn cache_path_changes_when_source_changes() {
        let a = cache_path("def x = 1;", None);
        let b = cache_path("def x = 2;", None);
        assert_ne!(a, b);
    }
}
