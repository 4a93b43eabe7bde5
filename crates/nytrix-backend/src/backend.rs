use nytrix_ast::{Arena, Program};
use nytrix_runtime::{Runtime, Value};

use crate::error::BackendError;

/// The external contract every code-generation backend satisfies
/// (`spec.md` §4.5.4). A backend turns a parsed [`Program`] into some
/// internal module representation (bytecode, a tree-walking closure, an
/// LLVM module — the type is opaque to callers), synthesising:
///
/// - a single `__script_top` entry point whose body is the linearised
///   top-level statements, returning the final expression as a tagged
///   value;
/// - for AOT output, a C-compatible `main` that sets up `argv`, calls
///   `__script_top`, and returns its untagged result as an exit code;
/// - bindings for every runtime symbol the program actually references,
///   resolving a backend-assigned disambiguation suffix (`__malloc.9`)
///   back to its base symbol first.
///
/// `nytrix-pipeline` is generic over this trait so the JIT/AOT dispatch
/// in §4.5.1 can select an implementation at startup without the rest of
/// the pipeline caring which one it got.
///
/// Parameterised over the arena lifetime `'a` the way a borrowed-AST
/// backend naturally is — the `interp` backend's `Module` is nothing more
/// than the `Program` reference it was handed, so it has no reason to
/// copy the tree into an owned form just to satisfy the trait.
pub trait Backend<'a> {
    /// The emitted module. Each implementation picks its own
    /// representation (the `interp` backend's is just the `Program`
    /// reference it was given; the `llvm` backend's is an `inkwell`
    /// `Module`).
    type Module;

    fn name(&self) -> &'static str;

    /// Emits `program` into this backend's module representation
    /// (`spec.md` §4.5.4).
    fn emit(&self, program: &'a Program<'a>, arena: &'a Arena) -> Result<Self::Module, BackendError>;

    /// Runs the emitted module's `__script_top` directly, the JIT path
    /// (`spec.md` §4.5.6) — "do not additionally call `main()`; the
    /// script's top-level controls exit."
    fn run_jit(&self, module: &Self::Module, runtime: &mut Runtime) -> Result<Value, BackendError>;

    /// Emits an object file for `module` at `out_path`, the AOT path
    /// (`spec.md` §4.5.7). Backends that can only JIT return
    /// [`BackendError::Unsupported`].
    fn emit_object(&self, module: &Self::Module, out_path: &std::path::Path) -> Result<(), BackendError>;

    /// Serialises `module` to `path` for the JIT IR cache (`spec.md`
    /// §4.5.8). Default: unsupported — a backend with no serialisable IR
    /// (the `interp` backend's "module" is just a borrowed `Program`)
    /// simply never gets cached; `nytrix-pipeline` treats this error as a
    /// cache miss, not a hard failure.
    fn write_cache(&self, _module: &Self::Module, _path: &std::path::Path) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("this backend has no serialisable module to cache"))
    }

    /// Deserialises a module previously written by [`Backend::write_cache`].
    fn load_cache(&self, _path: &std::path::Path) -> Result<Self::Module, BackendError> {
        Err(BackendError::Unsupported("this backend has no serialisable module to cache"))
    }

    /// Human-readable textual IR for `-dump-llvm`/debug dumps, when this
    /// backend has such a thing. Default: none.
    fn dump_text(&self, _module: &Self::Module) -> Option<String> {
        None
    }
}
