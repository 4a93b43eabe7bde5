use thiserror::Error;

use nytrix_backend::BackendError;
use nytrix_common::Diagnostic;
use nytrix_loader::LoaderError;

/// Failures surfaced anywhere in the pipeline, wrapping each stage's own
/// error type so `nytrix-cli` has one thing to match on regardless of
/// which stage actually failed (`spec.md` §7).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("parse failed with {} diagnostic(s)", .0.len())]
    Parse(Vec<Diagnostic>),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("link driver failed: {0}")]
    Link(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
