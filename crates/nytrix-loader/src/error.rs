use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced while indexing, resolving, or bundling modules.
///
/// Kept as a `thiserror` leaf enum rather than the parser's `Diagnostic`
/// struct: these errors have no source span to point at (they're about
/// filesystem/package state, not a location in a buffer) and are instead
/// printed as plain CLI-facing messages by `nytrix-cli`.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("standard library root {0} does not exist")]
    MissingRoot(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("module '{0}' could not be resolved")]
    UnresolvedModule(String),

    #[error("package '{0}' has no indexed modules")]
    UnresolvedPackage(String),

    #[error("manifest at {0} could not be parsed: {1}")]
    BadManifest(PathBuf, String),
}
