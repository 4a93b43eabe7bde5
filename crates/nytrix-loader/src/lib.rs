//! Standard-library indexing, module-name resolution, and source bundling:
//! combines the std/lib roots, transitively referenced user modules, and
//! the entry source into one buffer the parser consumes in a single pass
//! (`spec.md` §4.3).

pub mod bundle;
pub mod canonical;
pub mod error;
pub mod index;
pub mod manifest;
pub mod module_table;
pub mod scan;

pub use bundle::{Bundle, BundleMode, PRELUDE};
pub use canonical::RootKind;
pub use error::LoaderError;
pub use manifest::Manifest;
pub use module_table::{shared as shared_table, ModuleEntry, ModuleTable};

use std::path::Path;

/// Environment variable naming a prebuilt bundle file that short-circuits
/// indexing entirely (`spec.md` §4.3 "Failure handling").
pub const STD_PREBUILT_VAR: &str = "NYTRIX_STD_PREBUILT";

/// Ensures the shared module table is populated, honouring
/// `NYTRIX_STD_PREBUILT` if set. Returns `true` if indexing ran (a prebuilt
/// bundle short-circuits it, so the table stays empty in that case).
pub fn ensure_indexed() -> Result<bool, LoaderError> {
    if std::env::var(STD_PREBUILT_VAR).map(|p| Path::new(&p).is_file()).unwrap_or(false) {
        return Ok(false);
    }
    let mut table = shared_table().lock().expect("module table lock poisoned");
    if table.is_empty() {
        index::index_default_roots(&mut table)?;
    }
    Ok(true)
}
