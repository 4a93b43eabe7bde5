//! CLI-facing configuration, built once from parsed flags and threaded
//! explicitly through every pipeline stage (`SPEC_FULL.md` §6) — there is
//! no global mutable options object, continuing `spec.md` §9's advice
//! about `g_*` globals generally.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptLevel {
    O0,
    O1,
    O2,
    O3,
}

impl OptLevel {
    pub fn level(self) -> u8 {
        match self {
            OptLevel::O0 => 0,
            OptLevel::O1 => 1,
            OptLevel::O2 => 2,
            OptLevel::O3 => 3,
        }
    }
}

/// `spec.md` §6 `-std {none|minimal|default|full}`. `Minimal` and
/// `Default` both resolve through [`nytrix_loader::BundleMode::Default`]
/// (the prelude union the user's `use` statements) — the distinction
/// between them is a stdlib-content concern the bundler's fixed
/// [`nytrix_loader::bundle::PRELUDE`] doesn't currently vary by, not a
/// different resolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdMode {
    None,
    Minimal,
    Default,
    Full,
}

impl StdMode {
    pub fn bundle_mode(self) -> nytrix_loader::BundleMode {
        match self {
            StdMode::None => nytrix_loader::BundleMode::None,
            StdMode::Minimal | StdMode::Default => nytrix_loader::BundleMode::Default,
            StdMode::Full => nytrix_loader::BundleMode::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    V,
    VV,
    VVV,
}

/// Which end-to-end path a single `nytrix file.ny ...` invocation takes
/// (`spec.md` §4.5.1). The REPL and LSP entry points are separate
/// `structopt` subcommands at the `nytrix-cli` layer and never construct
/// one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    RunJit,
    EmitObject,
    EmitIr,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: Option<PathBuf>,
    pub inline_source: Option<String>,
    pub output: Option<PathBuf>,
    pub emit_only: bool,
    pub opt_level: OptLevel,
    pub passes: Option<String>,
    pub std_mode: StdMode,
    pub verbosity: Verbosity,
    pub debug: bool,
    pub dump_ast: bool,
    pub dump_tokens: bool,
    pub dump_llvm: bool,
    pub verify_only: bool,
    pub dump_on_error: bool,
    pub extra_libs: Vec<String>,
    pub extra_lib_dirs: Vec<String>,
    pub strip: bool,
}

impl PipelineOptions {
    /// `output_file` implies `emit_only`; absence of an output file and
    /// absence of `emit_only` implies `run_jit` when input exists
    /// (`spec.md` §4.5.1). A bare dump/verify request with no `-o` stops
    /// at IR rather than linking anything.
    pub fn mode(&self) -> Mode {
        if self.dump_tokens || self.dump_ast || self.dump_llvm || self.verify_only {
            return Mode::EmitIr;
        }
        if self.output.is_some() || self.emit_only {
            return Mode::EmitObject;
        }
        Mode::RunJit
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            input: None,
            inline_source: None,
            output: None,
            emit_only: false,
            opt_level: OptLevel::O0,
            passes: None,
            std_mode: StdMode::Default,
            verbosity: Verbosity::Quiet,
            debug: false,
            dump_ast: false,
            dump_tokens: false,
            dump_llvm: false,
            verify_only: false,
            dump_on_error: false,
            extra_libs: Vec::new(),
            extra_lib_dirs: Vec::new(),
            strip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_output_and_no_emit_only_runs_jit() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.mode(), Mode::RunJit);
    }

    #[test]
    fn output_path_implies_emit_object() {
        let mut opts = PipelineOptions::default();
        opts.output = Some(PathBuf::from("a.out"));
        assert_eq!(opts.mode(), Mode::EmitObject);
    }

    #[test]
    fn dump_flag_implies_emit_ir_even_with_no_output() {
        let mut opts = PipelineOptions::default();
        opts.dump_ast = true;
        assert_eq!(opts.mode(), Mode::EmitIr);
    }
}
