//! `structopt`-based flag parsing (`spec.md` §6 "CLI surface"), the
//! teacher's own CLI dependency (`passerine-aspen/src/cli.rs`).

use std::path::PathBuf;

use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "nytrix", bin_name = "nytrix", about = "The Nytrix compiler, JIT, and REPL")]
pub struct Opt {
    /// Source file to compile or run.
    pub file: Option<PathBuf>,

    /// Inline source snippet instead of a file.
    #[structopt(short = "c", long = "command")]
    pub command: Option<String>,

    /// Optimisation level (0-3).
    #[structopt(short = "O", long = "opt-level", default_value = "0")]
    pub opt_level: u8,

    /// Explicit backend optimisation pass pipeline, e.g. "default<O2>".
    #[structopt(long = "passes")]
    pub passes: Option<String>,

    /// Force the JIT-and-run path even when an output path is given.
    #[structopt(long = "run")]
    pub run: bool,

    /// Stop after emitting an artifact; skip linking.
    #[structopt(long = "emit-only")]
    pub emit_only: bool,

    /// Output path for an emitted object or linked executable.
    #[structopt(short = "o", long = "output")]
    pub output: Option<PathBuf>,

    /// Launch the interactive read-eval-print loop.
    #[structopt(short = "i", long = "repl")]
    pub repl: bool,

    /// Launch the JSON-RPC LSP stub on stdin/stdout.
    #[structopt(long = "lsp")]
    pub lsp: bool,

    /// Increase verbosity: -v, -vv, -vvv.
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbosity: u8,

    /// Enable debug-mode diagnostics.
    #[structopt(long = "debug")]
    pub debug: bool,

    #[structopt(long = "dump-ast")]
    pub dump_ast: bool,

    #[structopt(long = "dump-llvm")]
    pub dump_llvm: bool,

    #[structopt(long = "dump-tokens")]
    pub dump_tokens: bool,

    /// Parse (and typecheck, where applicable) without running or emitting.
    #[structopt(long = "verify")]
    pub verify: bool,

    /// Write `build/debug/` dumps if a pipeline stage fails.
    #[structopt(long = "dump-on-error")]
    pub dump_on_error: bool,

    /// Standard-library inclusion level: none, minimal, default, full.
    #[structopt(long = "std", default_value = "default")]
    pub std: String,

    /// Shorthand for `--std none`.
    #[structopt(long = "no-std")]
    pub no_std: bool,

    /// When to colour status output: auto, always, never.
    #[structopt(long = "color", default_value = "auto")]
    pub color: String,

    /// Extra `-l` link libraries for an AOT build.
    #[structopt(short = "l", long = "lib")]
    pub libs: Vec<String>,

    /// Extra `-L` library search paths for an AOT build.
    #[structopt(short = "L", long = "lib-dir")]
    pub lib_dirs: Vec<String>,

    /// Strip symbols from the linked executable.
    #[structopt(long = "strip")]
    pub strip: bool,
}
