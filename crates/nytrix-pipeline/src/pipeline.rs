//! Wires source -> IR -> artifact through the mode-specific stages
//! (`spec.md` §4.5), generic over [`nytrix_backend::Backend`] so the
//! JIT/AOT dispatch in §4.5.1 can pick an implementation without this
//! module caring which one it got.

use std::fs;
use std::path::Path;

use nytrix_ast::{Arena, Program};
use nytrix_backend::Backend;
use nytrix_common::Source;
use nytrix_runtime::{Runtime, Value};

use crate::assemble::assemble;
use crate::cache;
use crate::debug_dump::DebugDump;
use crate::error::PipelineError;
use crate::options::PipelineOptions;
use crate::timing::{Phase, PhaseTimings};

/// A parsed program plus whether recoverable (non-fatal) diagnostics were
/// raised during parsing (`spec.md` §4.2.3 error recovery).
pub struct Parsed<'a> {
    pub program: &'a Program<'a>,
    pub had_warnings: bool,
}

/// Source assembly + parse/verify, the two stages shared by every mode
/// (`spec.md` §4.5.2, §4.5.3). On a parse error, dumps the offending
/// source (if `--dump-on-error` was passed) before returning.
pub fn assemble_and_parse<'a>(
    opts: &PipelineOptions,
    arena: &'a Arena,
    timings: &mut PhaseTimings,
) -> Result<Parsed<'a>, PipelineError> {
    let dump = DebugDump::new(opts.dump_on_error);
    let assembled = timings.time(Phase::Assemble, || assemble(opts))?;
    let combined = Source::new(&assembled.source, &assembled.entry_path);

    let result = timings.time(Phase::Parse, || nytrix_parser::parse(combined.clone(), arena));
    if result.had_error {
        dump.dump_source(&combined.contents);
        return Err(PipelineError::Parse(result.diagnostics));
    }
    let program = arena.alloc(result.program);
    Ok(Parsed { program, had_warnings: !result.diagnostics.is_empty() })
}

/// The JIT path (`spec.md` §4.5.6): consult the IR cache first, otherwise
/// assemble, parse, and emit, then call `__script_top` directly — never
/// `main`, the script's own top-level controls the process's exit.
pub fn run_jit<'a, B: Backend<'a>>(
    backend: &B,
    opts: &PipelineOptions,
    arena: &'a Arena,
    runtime: &mut Runtime,
    timings: &mut PhaseTimings,
) -> Result<Value, PipelineError> {
    let dump = DebugDump::new(opts.dump_on_error);
    let assembled = timings.time(Phase::Assemble, || assemble(opts))?;

    let cache_path = if cache::enabled() {
        cache::cache_path(&assembled.source, assembled.stdlib_origin.as_deref())
    } else {
        None
    };

    if let Some(path) = &cache_path {
        if path.is_file() {
            if let Ok(module) = backend.load_cache(path) {
                log::info!("jit cache hit: {}", path.display());
                let value = timings.time(Phase::LinkOrJit, || backend.run_jit(&module, runtime))?;
                return Ok(value);
            }
        }
    }

    let combined = Source::new(&assembled.source, &assembled.entry_path);
    let result = timings.time(Phase::Parse, || nytrix_parser::parse(combined.clone(), arena));
    if result.had_error {
        dump.dump_source(&combined.contents);
        return Err(PipelineError::Parse(result.diagnostics));
    }
    let program = arena.alloc(result.program);

    let module = timings.time(Phase::Emit, || backend.emit(program, arena))?;

    if let Some(text) = backend.dump_text(&module) {
        dump.dump_ir(&text);
    }

    if let Some(path) = &cache_path {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        if let Err(e) = backend.write_cache(&module, path) {
            log::debug!("not caching this module: {e}");
        }
    }

    Ok(timings.time(Phase::LinkOrJit, || backend.run_jit(&module, runtime))?)
}

/// The AOT path (`spec.md` §4.5.7): emit an object file, then hand off to
/// the system C driver unless the caller only asked to stop at the object
/// (`opts.emit_only` with no further link requested).
pub fn emit_object<'a, B: Backend<'a>>(
    backend: &B,
    opts: &PipelineOptions,
    arena: &'a Arena,
    out_path: &Path,
    timings: &mut PhaseTimings,
) -> Result<(), PipelineError> {
    let parsed = assemble_and_parse(opts, arena, timings)?;
    let module = timings.time(Phase::Emit, || backend.emit(parsed.program, arena))?;

    if opts.emit_only {
        timings.time(Phase::LinkOrJit, || backend.emit_object(&module, out_path))?;
        return Ok(());
    }

    let object_path = out_path.with_extension("o");
    timings.time(Phase::Emit, || backend.emit_object(&module, &object_path))?;
    timings.time(Phase::LinkOrJit, || crate::link::link(&object_path, out_path, opts))?;
    Ok(())
}

/// What `-dump-tokens`/`-dump-ast`/`-dump-llvm` asked to see (`spec.md`
/// §4.5.3 "optionally print tokens, AST, and IR per the user's dump
/// flags"). `-verify` alone produces none of these — it only wants the
/// parse/verify stage to run and report success or failure.
#[derive(Debug, Default)]
pub struct DumpOutput {
    pub tokens: Option<String>,
    pub ast: Option<String>,
    pub ir: Option<String>,
}

/// The IR/AST/token dump path (`spec.md` §4.5.1, §4.5.3): parse (and emit,
/// if `-dump-llvm` was requested and the backend has textual IR to show)
/// without linking or running anything.
pub fn emit_ir<'a, B: Backend<'a>>(
    backend: &B,
    opts: &PipelineOptions,
    arena: &'a Arena,
    timings: &mut PhaseTimings,
) -> Result<DumpOutput, PipelineError> {
    let mut out = DumpOutput::default();

    if opts.dump_tokens {
        let assembled = timings.time(Phase::Assemble, || assemble(opts))?;
        let combined = Source::new(&assembled.source, &assembled.entry_path);
        let tokens = timings.time(Phase::Parse, || nytrix_lexer::Lexer::lex(combined));
        out.tokens = Some(tokens.iter().map(|t| format!("{t:?}")).collect::<Vec<_>>().join("\n"));
    }

    if opts.verify_only && !opts.dump_ast && !opts.dump_llvm {
        assemble_and_parse(opts, arena, timings)?;
        return Ok(out);
    }

    if opts.dump_ast || opts.dump_llvm {
        let parsed = assemble_and_parse(opts, arena, timings)?;
        if opts.dump_ast {
            out.ast = Some(format!("{:#?}", parsed.program));
        }
        if opts.dump_llvm {
            let module = timings.time(Phase::Emit, || backend.emit(parsed.program, arena))?;
            out.ir = backend.dump_text(&module);
        }
    }

    Ok(out)
}
