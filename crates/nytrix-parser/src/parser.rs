use std::collections::HashSet;
use std::rc::Rc;

use nytrix_ast::Arena;
use nytrix_common::{Diagnostic, Note, Source, Span};
use nytrix_lexer::{Token, TokenKind};

use crate::hints;

const ERROR_LIMIT: usize = 200;

/// Recursive-descent statement parser plus Pratt expression parser over a
/// token stream, sharing one arena with every node it allocates
/// (`spec.md` §4.2). Mirrors `passerine::compiler::parse::Parser`'s
/// token-cursor shape (`index` into a `Vec<Token>`, `peek`/`advance`), but
/// tracks additional ambient state (`current_module`, `loop_depth`) the
/// statement grammar needs.
pub struct Parser<'a> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) arena: &'a Arena,
    pub(crate) source: Rc<Source>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) seen: HashSet<(String, Option<(usize, usize)>)>,
    pub(crate) had_error: bool,
    pub(crate) error_count: usize,
    pub(crate) current_module: Vec<String>,
    pub(crate) loop_depth: usize,
    pub(crate) block_depth: usize,
    /// The `block_depth` each currently-open module's own top-level
    /// statement list sits at; a `def` is mangled only when
    /// `block_depth` matches the innermost entry (`spec.md` §4.2.2 "at
    /// block depth 0").
    pub(crate) module_mangle_depth: Vec<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, source: Rc<Source>, arena: &'a Arena) -> Parser<'a> {
        Parser {
            tokens,
            pos: 0,
            arena,
            source,
            diagnostics: Vec::new(),
            seen: HashSet::new(),
            had_error: false,
            error_count: 0,
            current_module: Vec::new(),
            loop_depth: 0,
            block_depth: 0,
            module_mangle_depth: Vec::new(),
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1).min(self.tokens.len() - 1)]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_eof() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    pub(crate) fn check_match(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.check(&kind) {
            self.advance()
        } else {
            let found = self.peek().clone();
            let message = format!("expected {}, found {}", what, found);
            match hints::lookup(found.lexeme()) {
                Some(hint) => self.error_with_hint(message, &found, hint),
                None => self.error(message, &found),
            }
            found
        }
    }

    pub(crate) fn span_since(&self, start: &Span) -> Span {
        Span::combine(start, &self.previous().span)
    }

    /// Records a diagnostic unless an equivalent one (same message +
    /// location) was already reported, and aborts parsing once
    /// `ERROR_LIMIT` is exceeded (`spec.md` §4.2.3).
    pub(crate) fn error(&mut self, message: impl Into<String>, at: &Token) {
        let diag = Diagnostic::new(message, at.span.clone());
        self.push_diagnostic(diag);
    }

    pub(crate) fn error_with_hint(&mut self, message: impl Into<String>, at: &Token, hint: impl Into<String>) {
        let diag = Diagnostic::with_hint(message, at.span.clone(), hint);
        self.push_diagnostic(diag);
    }

    /// Looks up the cross-language-mistake hint table for the offending
    /// token's lexeme and attaches it when present.
    pub(crate) fn error_unexpected(&mut self, context: &str, at: &Token) {
        match hints::lookup(at.lexeme()) {
            Some(hint) => self.error_with_hint(format!("unexpected {} in {}", at, context), at, hint),
            None => self.error(format!("unexpected {} in {}", at, context), at),
        }
    }

    fn push_diagnostic(&mut self, diag: Diagnostic) {
        self.had_error = true;
        if self.error_count >= ERROR_LIMIT {
            return;
        }
        if self.seen.insert(diag.dedup_key()) {
            self.error_count += 1;
            self.diagnostics.push(diag);
        }
    }

    /// After a failed statement, skips tokens until `;`/`}`/EOF, consuming
    /// a trailing `;` (`spec.md` §4.2.3).
    pub(crate) fn synchronize(&mut self) {
        while !self.is_eof() {
            if self.check(&TokenKind::Semi) {
                self.advance();
                return;
            }
            if self.check(&TokenKind::RBrace) {
                return;
            }
            self.advance();
        }
    }

    /// Bracket-depth-aware scan deciding whether a `?` encountered right
    /// after an operand starts a ternary or is the postfix `Try` operator
    /// (`spec.md` §4.2.1). Scans raw source text from just past the `?`
    /// looking for a `:` at bracket depth zero before an unescaped newline
    /// (not itself inside an open bracket) or a `;`.
    pub(crate) fn ternary_colon_ahead(&self) -> bool {
        let text = &self.source.contents[self.peek().span.start..];
        debug_assert!(text.starts_with('?'));
        let mut depth: i32 = 0;
        for c in text[1..].chars() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                ':' if depth <= 0 => return true,
                ';' if depth <= 0 => return false,
                '\n' if depth <= 0 => return false,
                _ => {}
            }
        }
        false
    }

    /// Matches any string token regardless of its `triple` flag — callers
    /// that need an arbitrary string literal (`asm`/`embed` operands)
    /// shouldn't care which quoting form was used.
    pub(crate) fn check_any_str(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Str { .. })
    }

    /// Consumes the current token if it is a string literal of either
    /// quoting form, else reports `what` as missing and returns the
    /// offending token without advancing.
    pub(crate) fn advance_if_str(&mut self, what: &str) -> Token {
        if self.check_any_str() {
            self.advance()
        } else {
            let found = self.peek().clone();
            self.error(format!("expected {}, found {}", what, found), &found);
            found
        }
    }

    pub(crate) fn note_here(&self) -> Note {
        Note::new(self.peek().span.clone())
    }

    /// Whether a `def` appearing right now would be mangled: inside at
    /// least one module, and at that module's own top-level statement
    /// depth (not nested inside a further block).
    pub(crate) fn at_module_mangle_point(&self) -> bool {
        self.module_mangle_depth.last() == Some(&self.block_depth)
    }

    pub(crate) fn mangled(&self, name: &str) -> String {
        if self.current_module.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.current_module.join("."), name)
        }
    }
}
