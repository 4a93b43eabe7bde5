//! Source assembly (`spec.md` §4.5.2): load the user's source, union the
//! prelude, build the standard-library bundle, and concatenate
//! `prelude-uses || std-bundle || user-source` into one buffer the parser
//! consumes in a single pass.

use std::fs;
use std::path::PathBuf;

use crate::error::PipelineError;
use crate::options::{PipelineOptions, StdMode};

/// The combined buffer handed to the parser, plus enough provenance to
/// key the JIT cache (`spec.md` §4.5.8) and to name the file diagnostics
/// should ultimately point at.
pub struct Assembled {
    pub source: String,
    pub entry_path: PathBuf,
    /// Whichever standard-library origin actually fed this bundle — a
    /// prebuilt bundle file, or the first existing `std` root the loader
    /// indexed from. `None` under `-no-std`.
    pub stdlib_origin: Option<PathBuf>,
}

/// Strips a leading `#!...` line so a Nytrix script can be made directly
/// executable (`spec.md` §4.5.2 step 1).
fn strip_shebang(source: &str) -> &str {
    if source.starts_with("#!") {
        match source.find('\n') {
            Some(i) => &source[i + 1..],
            None => "",
        }
    } else {
        source
    }
}

pub fn assemble(opts: &PipelineOptions) -> Result<Assembled, PipelineError> {
    let (raw_source, entry_path) = match (&opts.inline_source, &opts.input) {
        (Some(code), _) => (code.clone(), PathBuf::from("<command-line>")),
        (None, Some(path)) => {
            let text = fs::read_to_string(path).map_err(PipelineError::Io)?;
            (text, path.clone())
        }
        (None, None) => (String::new(), PathBuf::from("<repl>")),
    };
    let user_source = strip_shebang(&raw_source).to_string();

    if opts.std_mode == StdMode::None {
        return Ok(Assembled { source: user_source, entry_path, stdlib_origin: None });
    }

    if let Ok(prebuilt) = std::env::var(nytrix_loader::STD_PREBUILT_VAR) {
        let prebuilt_path = PathBuf::from(&prebuilt);
        if prebuilt_path.is_file() {
            let std_text = fs::read_to_string(&prebuilt_path).map_err(PipelineError::Io)?;
            let combined = format!("{std_text}\n{user_source}");
            return Ok(Assembled { source: combined, entry_path, stdlib_origin: Some(prebuilt_path) });
        }
    }

    nytrix_loader::ensure_indexed()?;
    let table = nytrix_loader::shared_table().lock().expect("module table lock poisoned");
    let bundle = nytrix_loader::bundle::build(opts.std_mode.bundle_mode(), &user_source, &entry_path, &table)?;

    let stdlib_origin = nytrix_loader::index::candidate_roots(nytrix_loader::RootKind::Std)
        .into_iter()
        .find(|p| p.is_dir());

    Ok(Assembled { source: bundle.source, entry_path, stdlib_origin })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shebang_line_is_stripped() {
        assert_eq!(strip_shebang("#!/usr/bin/env nytrix\ndef x = 1;"), "def x = 1;");
    }

    #[test]
    fn source_without_shebang_is_unchanged() {
        assert_eq!(strip_shebang("def x = 1;"), "def x = 1;");
    }

    #[test]
    fn no_std_mode_skips_the_bundle_entirely() {
        let opts = PipelineOptions { std_mode: StdMode::None, inline_source: Some("def x = 1;".into()), ..PipelineOptions::default() };
        let assembled = assemble(&opts).unwrap();
        assert_eq!(assembled.source, "def x = 1;");
        assert!(assembled.stdlib_origin.is_none());
    }
}
