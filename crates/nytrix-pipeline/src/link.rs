//! AOT linking via the system C driver (`spec.md` §4.5.7).
//!
//! The original compiles its runtime C source into one or two objects and
//! links the user's object against them. There is no C runtime here —
//! `nytrix-runtime`'s `extern "C"` surface is plain Rust — so the
//! counterpart step is linking against a prebuilt `staticlib` build of
//! that crate rather than compiling a `.c` file on the fly.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::PipelineError;
use crate::options::PipelineOptions;

pub const RUNTIME_LIB_VAR: &str = "NYTRIX_RUNTIME_LIB";
const RUNTIME_LIB_FILE: &str = "libnytrix_runtime.a";

fn cc_driver() -> String {
    env::var("NYTRIX_CC").or_else(|_| env::var("CC")).unwrap_or_else(|_| "cc".to_string())
}

/// Locates the prebuilt `nytrix-runtime` archive: an explicit
/// `NYTRIX_RUNTIME_LIB` override, or the conventional location next to the
/// running executable (where a packaging step drops it alongside the
/// `nytrix` binary).
fn runtime_lib_path() -> Result<PathBuf, PipelineError> {
    if let Ok(path) = env::var(RUNTIME_LIB_VAR) {
        return Ok(PathBuf::from(path));
    }
    let exe = env::current_exe().map_err(PipelineError::Io)?;
    let candidate = exe.parent().map(|dir| dir.join(RUNTIME_LIB_FILE));
    match candidate {
        Some(path) if path.is_file() => Ok(path),
        _ => Err(PipelineError::Link(format!(
            "could not locate {RUNTIME_LIB_FILE}; set {RUNTIME_LIB_VAR} to its path"
        ))),
    }
}

/// Links `object_path` into the executable at `out_path`, matching
/// `spec.md` §4.5.7's flag set: `-lm`, optional `-lreadline`/`-ldl`, user
/// `-L`/`-l` flags, `--gc-sections -O1`, symbol stripping on request, and
/// an rpath when a shared object was pulled into the link. The temporary
/// object is removed on both success and failure.
pub fn link(object_path: &Path, out_path: &Path, opts: &PipelineOptions) -> Result<(), PipelineError> {
    let result = link_inner(object_path, out_path, opts);
    let _ = std::fs::remove_file(object_path);
    result
}

fn link_inner(object_path: &Path, out_path: &Path, opts: &PipelineOptions) -> Result<(), PipelineError> {
    let runtime_lib = runtime_lib_path()?;

    let mut cmd = Command::new(cc_driver());
    cmd.arg(object_path).arg(&runtime_lib).arg("-o").arg(out_path).arg("-lm").arg("-ldl").arg("--gc-sections").arg("-O1");

    if env::var("NYTRIX_LINK_READLINE").as_deref() != Ok("0") {
        cmd.arg("-lreadline");
    }

    let mut used_shared_object = false;
    if let Ok(shared) = env::var("NYTRIX_SHARED_LIBS") {
        for so in shared.split(':').filter(|s| !s.is_empty()) {
            cmd.arg(so);
            used_shared_object = true;
        }
    }
    for dir in &opts.extra_lib_dirs {
        cmd.arg(format!("-L{dir}"));
    }
    for lib in &opts.extra_libs {
        cmd.arg(format!("-l{lib}"));
    }
    if opts.strip {
        cmd.arg("-s");
    }
    if used_shared_object {
        if let Some(dir) = object_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.arg(format!("-Wl,-rpath,{}", dir.display()));
        }
    }

    let status = cmd.status().map_err(PipelineError::Io)?;
    if !status.success() {
        return Err(PipelineError::Link(format!("{} exited with {status}", cc_driver())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cc_driver_falls_back_to_cc_when_unset() {
        env::remove_var("NYTRIX_CC");
        env::remove_var("CC");
        assert_eq!(cc_driver(), "cc");
    }

    #[test]
    fn cc_driver_prefers_nytrix_cc_over_cc() {
        env::set_var("CC", "gcc");
        env::set_var("NYTRIX_CC", "clang");
        assert_eq!(cc_driver(), "clang");
        env::remove_var("NYTRIX_CC");
        env::remove_var("CC");
    }
}
