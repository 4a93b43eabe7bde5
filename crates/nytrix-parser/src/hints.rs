/// Cross-language mistakes the parser recognises when a primary expression
/// or statement keyword fails to match, turned into an actionable hint
/// rather than a bare "unexpected token" (`spec.md` §4.2.3, extended per
/// `original_source/src/parse/core.c`'s equivalent table).
const MISTAKES: &[(&str, &str)] = &[
    ("func", "did you mean 'fn'?"),
    ("function", "did you mean 'fn'?"),
    ("let", "did you mean 'def' (or 'mut' for a mutable binding)?"),
    ("var", "did you mean 'mut' (or 'def' for an immutable binding)?"),
    ("const", "did you mean 'def'?"),
    ("import", "did you mean 'use'?"),
    ("null", "did you mean 'nil'?"),
    ("None", "did you mean 'nil' or '0'?"),
    ("elseif", "did you mean 'elif'?"),
    ("def", "did you mean 'mut'?"),
];

/// Looks up a hint for a bareword the parser did not expect to see.
/// `def`/`var` alias to each other depending on context, so both entries
/// exist; the first match in `MISTAKES` wins.
pub fn lookup(lexeme: &str) -> Option<&'static str> {
    MISTAKES
        .iter()
        .find(|(bad, _)| *bad == lexeme)
        .map(|(_, hint)| *hint)
}

/// Suggests `==` for a bare `=` used in a condition position, the one hint
/// in `spec.md`'s own illustrative example that isn't a bareword lookup.
pub fn assign_in_condition_hint() -> &'static str {
    "did you mean '=='?"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_common_mistakes() {
        assert_eq!(lookup("func"), Some("did you mean 'fn'?"));
        assert_eq!(lookup("import"), Some("did you mean 'use'?"));
        assert_eq!(lookup("elseif"), Some("did you mean 'elif'?"));
    }

    #[test]
    fn unknown_lexeme_has_no_hint() {
        assert_eq!(lookup("whatever"), None);
    }
}
