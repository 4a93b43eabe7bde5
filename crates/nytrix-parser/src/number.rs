use nytrix_ast::{LiteralValue, TypeHint};
use nytrix_common::Span;

/// Recognised numeric-literal suffixes, checked longest-first so `i16`
/// isn't mistaken for `i1` followed by garbage (none of these overlap in
/// practice, but the order documents intent).
const SUFFIXES: &[(&str, TypeHint)] = &[
    ("i64", TypeHint::I64), ("i32", TypeHint::I32), ("i16", TypeHint::I16), ("i8", TypeHint::I8),
    ("u64", TypeHint::U64), ("u32", TypeHint::U32), ("u16", TypeHint::U16), ("u8", TypeHint::U8),
    ("f128", TypeHint::F128), ("f64", TypeHint::F64), ("f32", TypeHint::F32),
];

/// Splits a numeral lexeme into its digits and an optional case-insensitive
/// type suffix, then builds the literal value. Mirrors
/// `original_source/src/parse/expr.c`'s `parse_numeric_suffix` /
/// `check_int_range`, with one deliberate divergence: an integer literal
/// whose value exceeds `i64::MAX` is only accepted with an explicit `u64`
/// suffix (see `DESIGN.md` Open Question 3) instead of being silently
/// reinterpreted.
///
/// Note a pre-existing ambiguity inherited from the lexer: a hex literal's
/// greedy hex-digit scan can absorb a following `f32`/`f64`/`f128` suffix's
/// leading `f` as a hex digit. Decimal literals are unaffected.
pub fn parse_number(lexeme: &str, span: &Span) -> Result<(LiteralValue<'static>, TypeHint, bool), String> {
    let lower = lexeme.to_ascii_lowercase();
    let (suffix, hint) = SUFFIXES
        .iter()
        .find(|(s, _)| lower.ends_with(s))
        .map(|(s, h)| (*s, *h))
        .unwrap_or(("", TypeHint::None));
    let numeral = &lexeme[..lexeme.len() - suffix.len()];
    let hint_explicit = !suffix.is_empty();

    let is_hex = numeral.starts_with("0x") || numeral.starts_with("0X");
    let is_dotted = !is_hex && numeral.contains('.');

    if is_dotted && hint_explicit && !hint.is_float() {
        return Err(format!("integer suffix on a dotted literal at {span}"));
    }

    if is_dotted || (hint_explicit && hint.is_float() && !is_hex) {
        let value: f64 = numeral
            .parse()
            .map_err(|_| format!("invalid float literal '{lexeme}' at {span}"))?;
        return Ok((LiteralValue::Float(value), hint, hint_explicit));
    }

    let raw: i128 = if is_hex {
        i128::from_str_radix(&numeral[2..], 16)
            .map_err(|_| format!("invalid hex literal '{lexeme}' at {span}"))?
    } else {
        numeral
            .parse()
            .map_err(|_| format!("invalid integer literal '{lexeme}' at {span}"))?
    };

    if raw > i64::MAX as i128 && hint != TypeHint::U64 {
        return Err(format!(
            "integer literal '{lexeme}' at {span} exceeds i64::MAX; add an explicit 'u64' suffix"
        ));
    }

    Ok((LiteralValue::Int(raw as i64), hint, hint_explicit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nytrix_common::Source;

    fn span() -> Span {
        let source = Source::anonymous("0");
        Span::new(&source, 0, 1)
    }

    #[test]
    fn plain_decimal_has_no_hint() {
        let (value, hint, explicit) = parse_number("42", &span()).unwrap();
        assert!(matches!(value, LiteralValue::Int(42)));
        assert_eq!(hint, TypeHint::None);
        assert!(!explicit);
    }

    #[test]
    fn suffixed_integer() {
        let (value, hint, explicit) = parse_number("42u64", &span()).unwrap();
        assert!(matches!(value, LiteralValue::Int(42)));
        assert_eq!(hint, TypeHint::U64);
        assert!(explicit);
    }

    #[test]
    fn hex_literal() {
        let (value, _, _) = parse_number("0xFF", &span()).unwrap();
        assert!(matches!(value, LiteralValue::Int(255)));
    }

    #[test]
    fn dotted_with_float_suffix() {
        let (value, hint, _) = parse_number("1.5f32", &span()).unwrap();
        assert!(matches!(value, LiteralValue::Float(v) if (v - 1.5).abs() < f64::EPSILON));
        assert_eq!(hint, TypeHint::F32);
    }

    #[test]
    fn dotted_with_integer_suffix_is_error() {
        assert!(parse_number("1.5i32", &span()).is_err());
    }

    #[test]
    fn oversized_int_requires_u64_suffix() {
        assert!(parse_number("99999999999999999999", &span()).is_err());
        assert!(parse_number("99999999999999999999u64", &span()).is_ok());
    }
}
