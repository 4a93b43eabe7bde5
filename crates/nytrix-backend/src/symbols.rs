//! Resolves the runtime symbol vocabulary a backend must declare and bind
//! (`spec.md` §4.5.4), on top of the addresses [`nytrix_runtime::symbols`]
//! actually exposes.

pub use nytrix_runtime::symbols::base_symbol_name;

/// Looks up `name` (after stripping any `.N` disambiguation suffix)
/// against the stateless runtime symbol table, returning its bound
/// address for an AOT/JIT backend to register as a global mapping.
pub fn resolve_stateless(name: &str) -> Option<usize> {
    let base = base_symbol_name(name);
    nytrix_runtime::symbols::stateless_table()
        .into_iter()
        .find(|(candidate, _)| *candidate == base)
        .map(|(_, addr)| addr)
}

/// Whether `name` (after suffix-stripping) requires a live `Runtime`
/// context pointer as a hidden first argument, rather than being
/// resolvable as a bare address (`spec.md` §9 "Global mutable state").
/// `__set_args`/`__argc`/`__argv` are process-wide instead (`spec.md`
/// §7.4), so they resolve through [`resolve_stateless`] like any other
/// stateless symbol.
pub fn needs_runtime_context(name: &str) -> bool {
    matches!(
        base_symbol_name(name),
        "__panic"
            | "__set_panic_env"
            | "__get_panic_val"
            | "__globals"
            | "__srand"
            | "__rand64"
            | "__push_defer"
            | "__open_defer_scope"
            | "__run_defers"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_stateless_symbol_by_base_name_after_suffix_strip() {
        assert!(resolve_stateless("__malloc.9").is_some());
        assert_eq!(resolve_stateless("__malloc.9"), resolve_stateless("__malloc"));
    }

    #[test]
    fn unknown_symbol_resolves_to_none() {
        assert!(resolve_stateless("__not_a_real_symbol").is_none());
    }

    #[test]
    fn runtime_context_symbols_are_identified() {
        assert!(needs_runtime_context("__panic"));
        assert!(needs_runtime_context("__globals.3"));
        assert!(needs_runtime_context("__srand"));
        assert!(needs_runtime_context("__run_defers"));
        assert!(!needs_runtime_context("__malloc"));
    }

    #[test]
    fn args_symbols_resolve_as_stateless() {
        assert!(resolve_stateless("__set_args").is_some());
        assert!(resolve_stateless("__argc").is_some());
        assert!(resolve_stateless("__argv").is_some());
        assert!(!needs_runtime_context("__set_args"));
    }

    #[test]
    fn call_symbols_cover_every_arity_through_15() {
        for arity in 0..=15 {
            assert!(resolve_stateless(&format!("__call{arity}")).is_some(), "missing __call{arity}");
        }
    }
}
