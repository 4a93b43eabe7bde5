//! Picks the backend compiled into this binary: `llvm` when the feature
//! is enabled, `interp` otherwise. There is no runtime flag for this —
//! only one of the two is ever linked in, so selecting between them at
//! startup would have nothing to select.

#[cfg(feature = "llvm")]
pub use nytrix_backend::LlvmBackend as SelectedBackend;

#[cfg(not(feature = "llvm"))]
pub use nytrix_backend::InterpBackend as SelectedBackend;
