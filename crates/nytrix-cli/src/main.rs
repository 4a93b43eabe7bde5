//! The `nytrix` binary: flag parsing, mode dispatch, and process exit
//! codes (`spec.md` §6). Thin by design — every real decision lives in
//! `nytrix-pipeline`; this crate only translates CLI flags into a
//! [`nytrix_pipeline::PipelineOptions`] and reports the result.

mod backend_select;
mod cli;
mod lsp;
mod options;
mod repl;
mod status;

use std::path::PathBuf;

use structopt::StructOpt;

use nytrix_ast::Arena;
use nytrix_pipeline::{self as pipeline, Mode, PhaseTimings, Verbosity};
use nytrix_runtime::Runtime;

use backend_select::SelectedBackend;
use cli::Opt;
use status::Status;

fn init_logging(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Quiet => "warn",
        Verbosity::V => "info",
        Verbosity::VV => "debug",
        Verbosity::VVV => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Maps a pipeline outcome to the process exit code (`spec.md` §6): `0`
/// on success, `1` on a compile error, and for an executed program the
/// tagged value `__script_top` returned, untagged and truncated to 32
/// bits.
fn run_compiled(opt: &Opt) -> i32 {
    let options = options::pipeline_options(opt);
    let backend = SelectedBackend::default();
    let arena = Arena::new();
    let mut runtime = Runtime::new(std::env::args().collect());
    let mut timings = PhaseTimings::new();

    let outcome = match options.mode() {
        Mode::RunJit => {
            pipeline::run_jit(&backend, &options, &arena, &mut runtime, &mut timings).map(|v| v.as_int() as i32)
        }
        Mode::EmitObject => {
            let out_path = options.output.clone().unwrap_or_else(|| PathBuf::from("a.out"));
            pipeline::emit_object(&backend, &options, &arena, &out_path, &mut timings).map(|_| 0)
        }
        Mode::EmitIr => pipeline::emit_ir(&backend, &options, &arena, &mut timings).map(|dump| {
            if let Some(tokens) = &dump.tokens {
                println!("{tokens}");
            }
            if let Some(ast) = &dump.ast {
                println!("{ast}");
            }
            if let Some(ir) = &dump.ir {
                println!("{ir}");
            }
            0
        }),
    };

    if matches!(options.verbosity, Verbosity::VV | Verbosity::VVV) {
        timings.print_table();
    }

    match outcome {
        Ok(code) => code,
        Err(e) => {
            Status::fatal().log(&e.to_string());
            1
        }
    }
}

fn main() {
    let opt = Opt::from_args();
    init_logging(options::verbosity(opt.verbosity));
    status::apply_color_choice(&opt.color);

    if opt.lsp {
        lsp::run();
        return;
    }
    if opt.repl {
        let std_mode = options::pipeline_options(&opt).std_mode;
        repl::run(std_mode);
        return;
    }

    let code = run_compiled(&opt);
    std::process::exit(code);
}
