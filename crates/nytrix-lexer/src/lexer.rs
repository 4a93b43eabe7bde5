use std::rc::Rc;

use nytrix_common::{Source, Span};

use crate::token::{Keyword, Token, TokenKind};

/// Converts a source buffer into a lazy stream of [`Token`]s.
///
/// Mirrors `passerine::compiler::lex::Lexer`'s shape (a byte index into the
/// source plus a `strip`/`next_token` split), generalized to Nytrix's
/// token set and cross-checked against
/// `original_source/src/compiler/syntax/lexer.c` for exact scanning rules.
pub struct Lexer {
    source: Rc<Source>,
    index: usize,
}

const OP_START: &str = "+-*/%!=<>&|";

impl Lexer {
    pub fn new(source: Rc<Source>) -> Lexer {
        Lexer { source, index: 0 }
    }

    /// Lexes an entire source buffer eagerly, terminated by a single
    /// trailing `Eof` token. `next()` on an exhausted lexer would otherwise
    /// need to return the same sentinel indefinitely (`spec.md` §4.1); a
    /// `Vec` makes that contract explicit to callers.
    pub fn lex(source: Rc<Source>) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn remaining(&self) -> &str {
        &self.source.contents[self.index..]
    }

    fn peek(&self) -> char {
        self.remaining().chars().next().unwrap_or('\0')
    }

    fn peek_at(&self, nth: usize) -> char {
        self.remaining().chars().nth(nth).unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        if c != '\0' {
            self.index += c.len_utf8();
        }
        c
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let c = self.peek();
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' || c == '#' {
                while self.peek() != '\n' && self.peek() != '\0' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(&self.source, start, self.index)
    }

    fn scan_string(&mut self, quote: char) -> bool {
        let mut triple = false;
        if self.peek() == quote && self.peek_at(1) == quote {
            self.advance();
            self.advance();
            triple = true;
            loop {
                if self.peek() == '\0' {
                    break;
                }
                if self.peek() == quote && self.peek_at(1) == quote && self.peek_at(2) == quote {
                    self.advance();
                    self.advance();
                    self.advance();
                    break;
                }
                self.advance();
            }
        } else {
            while self.peek() != quote && self.peek() != '\0' {
                if self.peek() == '\\' && self.peek_at(1) != '\0' {
                    self.advance();
                }
                self.advance();
            }
            if self.peek() == quote {
                self.advance();
            }
        }
        triple
    }

    fn scan_identifier(&mut self) {
        loop {
            let c = self.peek();
            if c.is_alphanumeric() || c == '_' || c == '?' || (c == '!' && self.peek_at(1) != '=') {
                self.advance();
            } else if c == '-' && self.peek_at(1).is_alphabetic() {
                // kebab identifiers: `-` surrounded by letters (see
                // SPEC_FULL.md §8.1 — kept intentionally).
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) {
        if self.peek() == '0' && (self.peek_at(1) == 'x' || self.peek_at(1) == 'X') {
            self.advance();
            self.advance();
            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }
        } else {
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            if self.peek() == '.' && self.peek_at(1).is_ascii_digit() {
                self.advance();
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }
        // Trailing alphabetic/digit suffix run (`i32`, `u64`, `f128`, ...);
        // decomposed into a type hint by the parser.
        while self.peek().is_alphanumeric() {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        let start = self.index;
        let c = self.advance();

        if c == '\0' {
            return Token::new(TokenKind::Eof, self.span_from(start));
        }

        // f"..." / f'...' interpolated strings.
        if c == 'f' && (self.peek() == '"' || self.peek() == '\'') {
            let quote = self.advance();
            let triple = self.scan_string(quote);
            return Token::new(TokenKind::FString { triple }, self.span_from(start));
        }

        if c.is_alphabetic() || c == '_' {
            self.scan_identifier();
            let lexeme = &self.source.contents[start..self.index];
            let kind = match Keyword::lookup(lexeme) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Ident,
            };
            return Token::new(kind, self.span_from(start));
        }

        if c.is_ascii_digit() {
            self.scan_number();
            return Token::new(TokenKind::Number, self.span_from(start));
        }

        if c == '"' || c == '\'' {
            let triple = self.scan_string(c);
            return Token::new(TokenKind::Str { triple }, self.span_from(start));
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            '.' => {
                if self.matches('.') && self.matches('.') {
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            },
            '-' => {
                if self.matches('>') { TokenKind::Arrow }
                else if self.matches('=') { TokenKind::MinusEq }
                else { TokenKind::Minus }
            },
            '+' => if self.matches('=') { TokenKind::PlusEq } else { TokenKind::Plus },
            '*' => if self.matches('=') { TokenKind::StarEq } else { TokenKind::Star },
            '/' => if self.matches('=') { TokenKind::SlashEq } else { TokenKind::Slash },
            '%' => if self.matches('=') { TokenKind::PercentEq } else { TokenKind::Percent },
            '!' => if self.matches('=') { TokenKind::Neq } else { TokenKind::Not },
            '=' => if self.matches('=') { TokenKind::Eq } else { TokenKind::Assign },
            '<' => {
                if self.matches('=') { TokenKind::Le }
                else if self.matches('<') { TokenKind::Shl }
                else { TokenKind::Lt }
            },
            '>' => {
                if self.matches('=') { TokenKind::Ge }
                else if self.matches('>') { TokenKind::Shr }
                else { TokenKind::Gt }
            },
            '&' => if self.matches('&') { TokenKind::And } else { TokenKind::BitAnd },
            '|' => if self.matches('|') { TokenKind::Or } else { TokenKind::BitOr },
            '^' => TokenKind::BitXor,
            '~' => TokenKind::BitNot,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            _ if OP_START.contains(c) => TokenKind::Unknown,
            _ => TokenKind::Unknown,
        };

        Token::new(kind, self.span_from(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::lex(Source::anonymous(src))
    }

    #[test]
    fn lexes_keyword_and_ident() {
        let tokens = lex("def x");
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Def));
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].lexeme(), "x");
    }

    #[test]
    fn lexes_kebab_identifier() {
        let tokens = lex("my-var");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme(), "my-var");
    }

    #[test]
    fn question_mark_suffix_on_ident() {
        let tokens = lex("empty?");
        assert_eq!(tokens[0].lexeme(), "empty?");
    }

    #[test]
    fn bang_not_swallowed_before_eq() {
        let tokens = lex("nonnil! != 0");
        assert_eq!(tokens[0].lexeme(), "nonnil!");
        assert_eq!(tokens[1].kind, TokenKind::Neq);
    }

    #[test]
    fn hex_and_suffixed_numbers() {
        let tokens = lex("0xFFi32 123u64 1.5f32");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme(), "0xFFi32");
        assert_eq!(tokens[1].lexeme(), "123u64");
        assert_eq!(tokens[2].lexeme(), "1.5f32");
    }

    #[test]
    fn fstring_token() {
        let tokens = lex(r#"f"hi {name}""#);
        assert!(matches!(tokens[0].kind, TokenKind::FString { triple: false }));
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = lex("; this is a comment\n# also a comment\ndef x");
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Def));
    }

    #[test]
    fn longest_match_operators() {
        let tokens = lex("-> == != <= >= += -= *= /= %= << >> && || ...");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Arrow, TokenKind::Eq, TokenKind::Neq, TokenKind::Le,
                TokenKind::Ge, TokenKind::PlusEq, TokenKind::MinusEq, TokenKind::StarEq,
                TokenKind::SlashEq, TokenKind::PercentEq, TokenKind::Shl, TokenKind::Shr,
                TokenKind::And, TokenKind::Or, TokenKind::Ellipsis, TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn triple_quoted_string_spans_newlines() {
        let tokens = lex("\"\"\"line one\nline two\"\"\"");
        assert!(matches!(tokens[0].kind, TokenKind::Str { triple: true }));
        assert!(tokens[0].lexeme().contains('\n'));
    }

    #[test]
    fn eof_is_stable_sentinel() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn roundtrip_lexemes_cover_source() {
        let src = "def x = 1 + 2 ; trailing comment\n";
        let tokens = lex(src);
        for token in &tokens {
            if !token.is_eof() {
                assert!(src[token.span.start..token.span.end] == *token.lexeme());
            }
        }
    }
}
