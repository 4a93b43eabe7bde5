//! Datastructures shared across the Nytrix front end, loader, and pipeline:
//! source buffers, spans, and diagnostics.

pub mod diagnostic;
pub mod span;
pub mod source;

pub use diagnostic::{Diagnostic, Note};
pub use source::Source;
pub use span::{Span, Spanned};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_resolves_first_line() {
        let source = Source::anonymous("def x = 1\ndef y = 2");
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(4), (1, 5));
    }

    #[test]
    fn line_col_resolves_second_line() {
        let source = Source::anonymous("def x = 1\ndef y = 2");
        let second_line_start = source.contents.find('\n').unwrap() + 1;
        assert_eq!(source.line_col(second_line_start), (2, 1));
    }

    #[test]
    fn span_combine_spans_both() {
        let source = Source::anonymous("hello, world");
        let a = Span::new(&source, 0, 5);
        let b = Span::new(&source, 7, 12);
        let combined = Span::combine(&a, &b);
        assert_eq!(combined.contents(), "hello, world");
    }

    #[test]
    #[should_panic]
    fn span_combine_different_sources_panics() {
        let a_source = Source::anonymous("a");
        let b_source = Source::anonymous("a");
        let a = Span::new(&a_source, 0, 1);
        let b = Span::new(&b_source, 0, 1);
        Span::combine(&a, &b);
    }

    #[test]
    fn diagnostic_display_includes_location_and_hint() {
        let source = Source::anonymous("def x = func(1)\n");
        let span = Span::new(&source, 8, 12);
        let diag = Diagnostic::with_hint("unexpected identifier 'func'", span, "did you mean 'fn'?");
        let rendered = format!("{}", diag);
        assert!(rendered.contains("<repl>:1:9"));
        assert!(rendered.contains("did you mean 'fn'?"));
    }

    #[test]
    fn dedup_key_distinguishes_by_location() {
        let source = Source::anonymous("aa bb");
        let d1 = Diagnostic::new("bad token", Span::new(&source, 0, 2));
        let d2 = Diagnostic::new("bad token", Span::new(&source, 3, 5));
        assert_ne!(d1.dedup_key(), d2.dedup_key());
    }
}
