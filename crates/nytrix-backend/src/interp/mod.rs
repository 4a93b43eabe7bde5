//! The default, always-available backend: a tree-walking evaluator over
//! the tagged-value runtime. Used for the test suite and the `-run`
//! fast path when the `llvm` feature is disabled or LLVM itself isn't
//! installed (`spec.md` §4.5.4, §4.5.6).
//!
//! Deliberately does not attempt AOT object emission — [`InterpBackend`]
//! answers [`BackendError::Unsupported`] for `emit_object`, and the
//! pipeline falls back to the `llvm` backend whenever `-emit-only`/linking
//! is requested.

mod control;
mod env;
mod eval;
mod value;

pub use control::Signal;
pub use value::InterpValue;

use nytrix_ast::{Arena, Program};
use nytrix_runtime::{Runtime, Value};

use crate::backend::Backend;
use crate::error::BackendError;
use env::EnvRef;

/// Grounded on `passerine::vm::VM::run`'s role as the single execution
/// entry point, generalised to walk a [`Program`] directly instead of a
/// compiled bytecode stream.
pub struct InterpBackend;

impl InterpBackend {
    pub fn new() -> Self {
        InterpBackend
    }
}

impl Default for InterpBackend {
    fn default() -> Self {
        InterpBackend::new()
    }
}

impl<'a> Backend<'a> for InterpBackend {
    /// Nothing to emit ahead of time; the module *is* the parsed program.
    type Module = &'a Program<'a>;

    fn name(&self) -> &'static str {
        "interp"
    }

    fn emit(&self, program: &'a Program<'a>, _arena: &'a Arena) -> Result<Self::Module, BackendError> {
        Ok(program)
    }

    fn run_jit(&self, module: &Self::Module, _runtime: &mut Runtime) -> Result<Value, BackendError> {
        let root = EnvRef::root();
        let statements: Vec<&'a nytrix_ast::Stmt<'a>> = module.statements.iter().copied().collect();
        match eval::eval_program(&statements, &root) {
            Ok(value) => value
                .as_scalar()
                .ok_or_else(|| BackendError::Runtime("program's final value is not a scalar".into())),
            Err(Signal::Panic(val)) => {
                let text = val
                    .as_scalar()
                    .map(|v| unsafe { nytrix_runtime::strings::as_str(nytrix_runtime::strings::to_str(v)) }.to_string())
                    .unwrap_or_else(|| "<non-scalar panic value>".to_string());
                Err(BackendError::Runtime(format!("uncaught panic: {text}")))
            }
            Err(Signal::Return(value)) => value
                .as_scalar()
                .ok_or_else(|| BackendError::Runtime("program's final value is not a scalar".into())),
            Err(Signal::Break) | Err(Signal::Continue) => {
                Err(BackendError::MisplacedControlFlow("break/continue outside a loop"))
            }
            Err(Signal::Error(e)) => Err(e),
        }
    }

    fn emit_object(&self, _module: &Self::Module, _out_path: &std::path::Path) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("the interp backend only supports JIT execution; use the llvm backend for AOT output"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nytrix_ast::Arena;
    use nytrix_common::Source;

    fn run_source(src: &str) -> Result<Value, BackendError> {
        let arena = Arena::new();
        let result = nytrix_parser::parse(Source::anonymous(src), &arena);
        assert!(!result.had_error, "unexpected parse errors: {:?}", result.diagnostics);
        let program = arena.alloc(result.program);
        let backend = InterpBackend::new();
        let mut runtime = Runtime::new(vec![]);
        let module = backend.emit(program, &arena)?;
        backend.run_jit(&module, &mut runtime)
    }

    #[test]
    fn evaluates_arithmetic_and_returns_the_trailing_expression() {
        let result = run_source("def x = 2\ndef y = 3\nx + y * 2\n").unwrap();
        assert_eq!(result.as_int(), 8);
    }

    #[test]
    fn calls_a_declared_function() {
        let src = "fn add(a, b) { a + b }\nadd(4, 5)\n";
        let result = run_source(src).unwrap();
        assert_eq!(result.as_int(), 9);
    }

    #[test]
    fn try_catch_recovers_from_a_panic() {
        let src = "try { panic(1) } catch e { e + 1 }\n";
        let result = run_source(src);
        assert!(result.is_ok());
    }

    #[test]
    fn defer_runs_after_its_block_falls_through() {
        let src = "def log = []\n{ defer { log.push(1) } }\nlog[0]\n";
        let result = run_source(src).unwrap();
        assert_eq!(result.as_int(), 1);
    }

    #[test]
    fn defers_run_most_recently_registered_first() {
        let src = "def log = []\n{ defer { log.push(1) } defer { log.push(2) } }\nlog[0]\n";
        let result = run_source(src).unwrap();
        assert_eq!(result.as_int(), 2);
    }

    #[test]
    fn defer_runs_even_when_its_block_returns_early() {
        let src = "def log = []\nfn f() { defer { log.push(1) } return 9 }\nf()\nlog[0]\n";
        let result = run_source(src).unwrap();
        assert_eq!(result.as_int(), 1);
    }
}
