//! Translates the parsed [`crate::cli::Opt`] into a
//! [`nytrix_pipeline::PipelineOptions`] (`spec.md` §6).

use nytrix_pipeline::{OptLevel, PipelineOptions, StdMode, Verbosity};

use crate::cli::Opt;

fn opt_level(n: u8) -> OptLevel {
    match n {
        0 => OptLevel::O0,
        1 => OptLevel::O1,
        2 => OptLevel::O2,
        _ => OptLevel::O3,
    }
}

/// `-no-std` is a shorthand for `-std none` and wins if both are given.
fn std_mode(opt: &Opt) -> StdMode {
    if opt.no_std {
        return StdMode::None;
    }
    match opt.std.as_str() {
        "none" => StdMode::None,
        "minimal" => StdMode::Minimal,
        "full" => StdMode::Full,
        _ => StdMode::Default,
    }
}

pub fn verbosity(n: u8) -> Verbosity {
    match n {
        0 => Verbosity::Quiet,
        1 => Verbosity::V,
        2 => Verbosity::VV,
        _ => Verbosity::VVV,
    }
}

pub fn pipeline_options(opt: &Opt) -> PipelineOptions {
    PipelineOptions {
        input: opt.file.clone(),
        inline_source: opt.command.clone(),
        output: opt.output.clone(),
        emit_only: opt.emit_only,
        opt_level: opt_level(opt.opt_level),
        passes: opt.passes.clone(),
        std_mode: std_mode(opt),
        verbosity: verbosity(opt.verbosity),
        debug: opt.debug,
        dump_ast: opt.dump_ast,
        dump_tokens: opt.dump_tokens,
        dump_llvm: opt.dump_llvm,
        verify_only: opt.verify,
        dump_on_error: opt.dump_on_error,
        extra_libs: opt.libs.clone(),
        extra_lib_dirs: opt.lib_dirs.clone(),
        strip: opt.strip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base_opt() -> Opt {
        Opt {
            file: None, command: None, opt_level: 0, passes: None, run: false,
            emit_only: false, output: None, repl: false, lsp: false, verbosity: 0,
            debug: false, dump_ast: false, dump_llvm: false, dump_tokens: false,
            verify: false, dump_on_error: false, std: "default".into(), no_std: false,
            color: "auto".into(), libs: Vec::new(), lib_dirs: Vec::new(), strip: false,
        }
    }

    #[test]
    fn no_std_flag_overrides_std_string() {
        let mut opt = base_opt();
        opt.std = "full".into();
        opt.no_std = true;
        assert_eq!(std_mode(&opt), StdMode::None);
    }

    #[test]
    fn output_path_carries_through() {
        let mut opt = base_opt();
        opt.output = Some(PathBuf::from("a.out"));
        let options = pipeline_options(&opt);
        assert_eq!(options.output, Some(PathBuf::from("a.out")));
    }
}
