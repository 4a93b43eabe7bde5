use nytrix_ast::Program;
use nytrix_common::Diagnostic;

/// Summary of a parse, carrying a (possibly partial) AST alongside every
/// diagnostic raised during recovery (`SPEC_FULL.md` §3). Downstream
/// tooling (LSP stub, REPL) can still work with `program` even when
/// `had_error` is set, since the parser synchronises and keeps going
/// rather than aborting on the first error.
pub struct ParseResult<'a> {
    pub program: Program<'a>,
    pub diagnostics: Vec<Diagnostic>,
    pub had_error: bool,
}

impl<'a> ParseResult<'a> {
    pub fn new(program: Program<'a>, diagnostics: Vec<Diagnostic>, had_error: bool) -> ParseResult<'a> {
        ParseResult { program, diagnostics, had_error }
    }
}
