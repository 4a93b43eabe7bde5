//! Mode dispatch and stage orchestration for the Nytrix compiler
//! (`spec.md` §4.5): source assembly, parse/verify, backend emission, the
//! JIT IR cache, AOT linking, and debug dumps, wired together behind one
//! small surface `nytrix-cli` drives.
//!
//! Generic over [`nytrix_backend::Backend`] throughout, so neither this
//! crate nor its caller needs to know whether it's talking to the
//! tree-walking `interp` backend or the `llvm` one.

pub mod assemble;
pub mod cache;
pub mod debug_dump;
pub mod error;
pub mod link;
pub mod options;
pub mod pipeline;
pub mod timing;

pub use error::PipelineError;
pub use options::{Mode, OptLevel, PipelineOptions, StdMode, Verbosity};
pub use pipeline::{assemble_and_parse, emit_ir, emit_object, run_jit, DumpOutput, Parsed};
pub use timing::{Phase, PhaseTimings};
