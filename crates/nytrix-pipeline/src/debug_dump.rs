//! `build/debug/` dumps (`spec.md` §4.5.9): written whenever a pipeline
//! stage fails and `--dump-on-error` was passed, echoing the first ~14
//! lines of each to stderr. Mirrors the original's "always call the dump
//! function, let it decide" style — callers invoke these unconditionally
//! and the no-op lives inside, not at each call site.

use std::fs;
use std::path::PathBuf;

pub struct DebugDump {
    dir: PathBuf,
    enabled: bool,
}

impl DebugDump {
    pub fn new(enabled: bool) -> DebugDump {
        DebugDump { dir: PathBuf::from("build/debug"), enabled }
    }

    fn echo(label: &str, text: &str) {
        eprintln!("--- {label} (first 14 lines) ---");
        for line in text.lines().take(14) {
            eprintln!("{line}");
        }
    }

    fn write(&self, file_name: &str, text: &str) {
        if !self.enabled {
            return;
        }
        if fs::create_dir_all(&self.dir).is_ok() {
            let _ = fs::write(self.dir.join(file_name), text);
        }
        Self::echo(file_name, text);
    }

    pub fn dump_source(&self, source: &str) {
        self.write("last_source.ny", source);
    }

    pub fn dump_ir(&self, ir: &str) {
        self.write("last_ir.ll", ir);
    }

    pub fn dump_asm(&self, asm: &str) {
        self.write("last_asm.s", asm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_dump_does_not_create_the_directory() {
        let scratch = std::env::temp_dir().join(format!("nytrix-dump-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&scratch);
        let dump = DebugDump { dir: scratch.clone(), enabled: false };
        dump.dump_source("def x = 1;");
        assert!(!scratch.exists());
    }
}
