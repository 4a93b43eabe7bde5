//! Code-generation backends sharing one external contract
//! (`spec.md` §4.5.4): [`Backend`]. `nytrix-pipeline` is generic over it
//! so mode dispatch can pick an implementation without the rest of the
//! pipeline caring which one it got.
//!
//! Two implementations ship: [`interp::InterpBackend`] (always available,
//! a tree-walking evaluator) and, behind the `llvm` feature,
//! [`llvm::LlvmBackend`] (real AOT/JIT codegen via `inkwell`).

mod backend;
mod error;
pub mod symbols;

pub mod interp;

#[cfg(feature = "llvm")]
pub mod llvm;

pub use backend::Backend;
pub use error::BackendError;
pub use interp::InterpBackend;

#[cfg(feature = "llvm")]
pub use llvm::LlvmBackend;
