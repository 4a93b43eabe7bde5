//! The read-eval-print loop (`SPEC_FULL.md` §7): each line is fed through
//! the pipeline's JIT path against one persistent [`Runtime`] and the
//! tagged result printed via `to_str`. No history, completion, or syntax
//! highlighting — out of scope per `spec.md` §1 Non-goals.

use std::io::{self, BufRead, Write};

use nytrix_ast::Arena;
use nytrix_pipeline::{self as pipeline, PhaseTimings, PipelineOptions, StdMode};
use nytrix_runtime::{strings, Runtime, Value};

use crate::backend_select::SelectedBackend;
use crate::status::Status;

fn render(value: Value) -> String {
    let rendered = strings::to_str(value);
    unsafe { strings::as_str(rendered) }.to_string()
}

pub fn run(std_mode: StdMode) {
    let backend = SelectedBackend::default();
    let mut runtime = Runtime::new(vec!["nytrix".to_string()]);
    let stdin = io::stdin();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                Status::fatal().log(&e.to_string());
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        let arena = Arena::new();
        let options = PipelineOptions { inline_source: Some(line), std_mode, ..PipelineOptions::default() };
        let mut timings = PhaseTimings::new();
        match pipeline::run_jit(&backend, &options, &arena, &mut runtime, &mut timings) {
            Ok(value) => println!("{}", render(value)),
            Err(e) => Status::fatal().log(&e.to_string()),
        }
    }
}
