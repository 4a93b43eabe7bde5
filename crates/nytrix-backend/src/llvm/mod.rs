//! Real LLVM codegen via `inkwell`, gated behind the `llvm` feature
//! (`spec.md` §4.5.4; grounded on the optional-LLVM-feature convention in
//! `other_examples/manifests/0x4D44-mdhavers`, `DrTomLLC-T-Programming-Language`,
//! `bherbruck-llts`).
//!
//! Per-construct instruction lowering ("full LLVM codegen bodies") is an
//! explicit Non-goal carried over from `spec.md` §1 — this backend
//! satisfies the *external contract* §4.5.4 actually enumerates: a single
//! `__script_top` entry point, an AOT `main` wrapper, runtime symbol
//! declaration/binding with suffix disambiguation, and §3.7-compliant
//! string interning. Statement/expression bodies lower only the subset
//! needed to exercise that contract (literals, a handful of calls);
//! anything past that returns [`BackendError::Unsupported`] rather than
//! pretending to a completeness this crate doesn't carry.

mod codegen;
mod intern;

use std::path::Path;

use inkwell::context::Context;
use inkwell::execution_engine::ExecutionEngine;
use inkwell::module::Module as InkwellModule;
use inkwell::targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine};
use inkwell::OptimizationLevel;

use nytrix_ast::{Arena, Program};
use nytrix_runtime::{Runtime, Value};

use crate::backend::Backend;
use crate::error::BackendError;
use crate::symbols;

/// Owns the `Context` a compiled program's IR module lives in, plus the
/// module itself. The JIT execution engine is built lazily in
/// [`LlvmBackend::run_jit`] since `inkwell` ties it to the module's own
/// lifetime.
pub struct CompiledModule {
    module: InkwellModule<'static>,
}

/// Each backend instance leaks one `inkwell::Context` for the process's
/// remaining lifetime. `Module<'ctx>` is borrow-tied to its `Context` by
/// `inkwell`'s own API, and the `Backend` trait's `Module` associated
/// type has no lifetime parameter to thread an arena-scoped context
/// through — a `'static` context sidesteps that mismatch without an
/// unsound transmute, at the cost of one real (small, bounded-count)
/// leak per backend instance, which is how a CLI invocation uses this
/// backend anyway (one `LlvmBackend` for the process's one compile).
pub struct LlvmBackend {
    context: &'static Context,
}

impl LlvmBackend {
    pub fn new() -> Self {
        let context: &'static Context = Box::leak(Box::new(Context::create()));
        LlvmBackend { context }
    }
}

impl Default for LlvmBackend {
    fn default() -> Self {
        LlvmBackend::new()
    }
}

impl<'a> Backend<'a> for LlvmBackend {
    type Module = CompiledModule;

    fn name(&self) -> &'static str {
        "llvm"
    }

    fn emit(&self, program: &'a Program<'a>, arena: &'a Arena) -> Result<Self::Module, BackendError> {
        let context = self.context;
        let module = context.create_module("nytrix");
        let builder = context.create_builder();

        codegen::declare_runtime_symbols(context, &module, program);
        let interned = intern::intern_string_literals(context, &module, program, arena);
        codegen::emit_script_top(context, &module, &builder, program, &interned)?;
        codegen::emit_aot_main(context, &module, &builder)?;

        Ok(CompiledModule { module })
    }

    fn run_jit(&self, module: &Self::Module, runtime: &mut Runtime) -> Result<Value, BackendError> {
        let engine: ExecutionEngine = module
            .module
            .create_jit_execution_engine(OptimizationLevel::None)
            .map_err(|e| BackendError::Runtime(format!("failed to create JIT execution engine: {e}")))?;

        for (name, addr) in nytrix_runtime::symbols::stateless_table() {
            if let Some(function) = module.module.get_function(name) {
                engine.add_global_mapping(&function, addr);
            }
        }
        // Runtime-context symbols (`__panic`, `__globals`, ...) take
        // `&mut Runtime` as a hidden first argument; binding them into the
        // JIT would require generating a per-call trampoline closing over
        // `runtime`'s address, which the bounded contract this backend
        // implements doesn't build. Declared but left unbound: a program
        // that actually calls one will fail to resolve at JIT time with a
        // clear linker-style error rather than silently miscompiling.
        let _ = runtime;

        let script_top = unsafe {
            engine
                .get_function::<unsafe extern "C" fn() -> i64>("__script_top")
                .map_err(|e| BackendError::Runtime(format!("__script_top not found: {e}")))?
        };
        let result = unsafe { script_top.call() };
        Ok(Value(result))
    }

    fn emit_object(&self, module: &Self::Module, out_path: &Path) -> Result<(), BackendError> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(BackendError::Runtime)?;
        let triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&triple)
            .map_err(|e| BackendError::Runtime(format!("no target for {triple}: {e}")))?;
        let machine = target
            .create_target_machine(
                &triple,
                "generic",
                "",
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Large,
            )
            .ok_or_else(|| BackendError::Runtime("failed to create target machine".into()))?;

        machine
            .write_to_file(&module.module, FileType::Object, out_path)
            .map_err(|e| BackendError::Link(e.to_string()))
    }

    /// Bitcode is the cache format `spec.md` §4.5.8 names directly.
    fn write_cache(&self, module: &Self::Module, path: &Path) -> Result<(), BackendError> {
        if module.module.write_bitcode_to_path(path) {
            Ok(())
        } else {
            Err(BackendError::Runtime(format!("failed to write bitcode to {}", path.display())))
        }
    }

    fn load_cache(&self, path: &Path) -> Result<Self::Module, BackendError> {
        let module = InkwellModule::parse_bitcode_from_path(path, self.context)
            .map_err(|e| BackendError::Runtime(format!("failed to parse cached bitcode: {e}")))?;
        Ok(CompiledModule { module })
    }

    fn dump_text(&self, module: &Self::Module) -> Option<String> {
        Some(module.module.print_to_string().to_string())
    }
}
