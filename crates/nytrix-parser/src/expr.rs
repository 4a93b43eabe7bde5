use nytrix_ast::{
    Arg, BinaryOp, DictPair, Expr, ExprKind, FStringPart, LogicalOp, MatchArm, Param, TypeOrExpr,
    UnaryOp,
};
use nytrix_common::Span;
use nytrix_lexer::{Keyword, Token, TokenKind};

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Entry point for expression parsing; ternary sits below `||`
    /// (`spec.md` §4.2.1).
    pub(crate) fn parse_expression(&mut self) -> &'a Expr<'a> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let cond = self.parse_or();

        if self.check(&TokenKind::Question) && self.ternary_colon_ahead() {
            self.advance();
            let then_branch = self.parse_expression();
            self.expect(TokenKind::Colon, "':' in ternary expression");
            let else_branch = self.parse_expression();
            let span = self.span_since(&start);
            return self.arena.alloc(Expr::new(
                ExprKind::Ternary { cond, then_branch, else_branch },
                span,
            ));
        }
        cond
    }

    fn parse_or(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_and();
        while self.check_match(&TokenKind::Or) {
            let rhs = self.parse_and();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(
                ExprKind::Logical { op: LogicalOp::Or, lhs, rhs },
                span,
            ));
        }
        lhs
    }

    fn parse_and(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_equality();
        while self.check_match(&TokenKind::And) {
            let rhs = self.parse_equality();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(
                ExprKind::Logical { op: LogicalOp::And, lhs, rhs },
                span,
            ));
        }
        lhs
    }

    fn parse_equality(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_comparison();
        loop {
            let op = match self.peek().kind {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::Neq => BinaryOp::Neq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_comparison();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(ExprKind::Binary { op, lhs, rhs }, span));
        }
        lhs
    }

    fn parse_comparison(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_additive();
        loop {
            let op = match self.peek().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(ExprKind::Binary { op, lhs, rhs }, span));
        }
        lhs
    }

    fn parse_additive(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(ExprKind::Binary { op, lhs, rhs }, span));
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_bitwise();
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_bitwise();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(ExprKind::Binary { op, lhs, rhs }, span));
        }
        lhs
    }

    fn parse_bitwise(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut lhs = self.parse_unary();
        loop {
            let op = match self.peek().kind {
                TokenKind::BitOr => BinaryOp::BitOr,
                TokenKind::BitAnd => BinaryOp::BitAnd,
                TokenKind::BitXor => BinaryOp::BitXor,
                TokenKind::Shl => BinaryOp::Shl,
                TokenKind::Shr => BinaryOp::Shr,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary();
            let span = self.span_since(&start);
            lhs = self.arena.alloc(Expr::new(ExprKind::Binary { op, lhs, rhs }, span));
        }
        lhs
    }

    /// Right-associative unary `- ! ~`, binding tighter than the binary
    /// levels above but looser than the postfix chain below.
    fn parse_unary(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::BitNot => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary();
            let span = self.span_since(&start);
            return self.arena.alloc(Expr::new(ExprKind::Unary { op, operand }, span));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let mut expr = self.parse_primary();
        loop {
            expr = match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let name_tok = self.advance();
                    let name = self.arena.alloc_str(name_tok.lexeme());
                    if self.check(&TokenKind::LParen) {
                        let args = self.parse_call_args();
                        let span = self.span_since(&start);
                        self.arena.alloc(Expr::new(
                            ExprKind::MemberCall { target: expr, name, args },
                            span,
                        ))
                    } else {
                        let span = self.span_since(&start);
                        self.arena
                            .alloc(Expr::new(ExprKind::Member { target: expr, name }, span))
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let (lo, hi, step) = self.parse_slice_bounds();
                    self.expect(TokenKind::RBracket, "']'");
                    let span = self.span_since(&start);
                    self.arena.alloc(Expr::new(
                        ExprKind::Index { target: expr, start: lo, stop: hi, step },
                        span,
                    ))
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args();
                    let span = self.span_since(&start);
                    self.arena
                        .alloc(Expr::new(ExprKind::Call { callee: expr, args }, span))
                }
                TokenKind::Question if !self.ternary_colon_ahead() => {
                    self.advance();
                    let span = self.span_since(&start);
                    self.arena.alloc(Expr::new(ExprKind::Try(expr), span))
                }
                _ => break,
            };
        }
        expr
    }

    /// `[a:b:c]`, `[:b]`, `[a:]`, `[::c]`, or a plain `[i]` index.
    fn parse_slice_bounds(
        &mut self,
    ) -> (Option<&'a Expr<'a>>, Option<&'a Expr<'a>>, Option<&'a Expr<'a>>) {
        if self.check(&TokenKind::RBracket) {
            return (None, None, None);
        }
        let first = if self.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expression())
        };
        if !self.check_match(&TokenKind::Colon) {
            return (first, None, None);
        }
        let stop = if self.check(&TokenKind::Colon) || self.check(&TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expression())
        };
        if !self.check_match(&TokenKind::Colon) {
            return (first, stop, None);
        }
        let step = if self.check(&TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expression())
        };
        (first, stop, step)
    }

    fn parse_call_args(&mut self) -> nytrix_ast::ArenaVec<'a, Arg<'a>> {
        self.expect(TokenKind::LParen, "'('");
        let mut args = self.arena.vec::<Arg<'a>>();
        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            let name = if self.check(&TokenKind::Ident) && self.peek_at(1).kind == TokenKind::Assign {
                let tok = self.advance();
                self.advance();
                Some(self.arena.alloc_str(tok.lexeme()) as &str)
            } else {
                None
            };
            let value = self.parse_expression();
            args.push(Arg { name, value });
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'");
        args
    }

    fn parse_primary(&mut self) -> &'a Expr<'a> {
        let start = self.peek().span.clone();
        let token = self.peek().clone();

        match &token.kind {
            TokenKind::Number => {
                self.advance();
                let lexeme = token.lexeme();
                match crate::number::parse_number(lexeme, &token.span) {
                    Ok((value, type_hint, hint_explicit)) => self.arena.alloc(Expr::new(
                        ExprKind::Literal { value, type_hint, hint_explicit },
                        token.span,
                    )),
                    Err(message) => {
                        self.error(message, &token);
                        self.arena.alloc(Expr::new(
                            ExprKind::Literal {
                                value: nytrix_ast::LiteralValue::Int(0),
                                type_hint: nytrix_ast::TypeHint::None,
                                hint_explicit: false,
                            },
                            token.span,
                        ))
                    }
                }
            }
            TokenKind::Str { .. } => {
                self.advance();
                let raw = token.lexeme();
                let unescaped = unescape_string(raw);
                let value = self.arena.alloc_str(&unescaped);
                self.arena.alloc(Expr::new(
                    ExprKind::Literal {
                        value: nytrix_ast::LiteralValue::Str(value),
                        type_hint: nytrix_ast::TypeHint::None,
                        hint_explicit: false,
                    },
                    token.span,
                ))
            }
            TokenKind::FString { .. } => {
                self.advance();
                self.parse_fstring(&token)
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                self.arena.alloc(Expr::new(
                    ExprKind::Literal {
                        value: nytrix_ast::LiteralValue::Bool(true),
                        type_hint: nytrix_ast::TypeHint::None,
                        hint_explicit: false,
                    },
                    token.span,
                ))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                self.arena.alloc(Expr::new(
                    ExprKind::Literal {
                        value: nytrix_ast::LiteralValue::Bool(false),
                        type_hint: nytrix_ast::TypeHint::None,
                        hint_explicit: false,
                    },
                    token.span,
                ))
            }
            TokenKind::Ident => {
                self.advance();
                let name = self.arena.alloc_str(token.lexeme());
                self.arena.alloc(Expr::new(ExprKind::Ident(name), token.span))
            }
            TokenKind::Dot => {
                self.advance();
                let name_tok = self.advance();
                let name = self.arena.alloc_str(name_tok.lexeme());
                let span = self.span_since(&start);
                self.arena.alloc(Expr::new(ExprKind::InferredMember(name), span))
            }
            TokenKind::LParen => self.parse_paren_or_tuple(&start),
            TokenKind::LBracket => self.parse_list(&start),
            TokenKind::LBrace => self.parse_set_or_dict(&start),
            TokenKind::Keyword(Keyword::Match) => self.parse_match_expr(&start),
            TokenKind::Keyword(Keyword::Lambda) => self.parse_lambda(&start),
            TokenKind::Keyword(Keyword::Fn) => self.parse_fn_literal(&start),
            TokenKind::Keyword(Keyword::Asm) => self.parse_asm(&start),
            TokenKind::Keyword(Keyword::Embed) => self.parse_embed(&start),
            TokenKind::Keyword(Keyword::Sizeof) => self.parse_sizeof(&start),
            _ => {
                self.advance();
                self.error_unexpected("expression", &token);
                self.arena.alloc(Expr::new(
                    ExprKind::Literal {
                        value: nytrix_ast::LiteralValue::Int(0),
                        type_hint: nytrix_ast::TypeHint::None,
                        hint_explicit: false,
                    },
                    token.span,
                ))
            }
        }
    }

    fn parse_paren_or_tuple(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        if self.check_match(&TokenKind::RParen) {
            let span = self.span_since(start);
            return self.arena.alloc(Expr::new(ExprKind::Tuple(self.arena.vec()), span));
        }
        let first = self.parse_expression();
        if self.check(&TokenKind::Comma) {
            let mut elements = self.arena.vec::<&Expr<'a>>();
            elements.push(first);
            while self.check_match(&TokenKind::Comma) {
                if self.check(&TokenKind::RParen) {
                    break;
                }
                elements.push(self.parse_expression());
            }
            self.expect(TokenKind::RParen, "')'");
            let span = self.span_since(start);
            return self.arena.alloc(Expr::new(ExprKind::Tuple(elements), span));
        }
        self.expect(TokenKind::RParen, "')'");
        first
    }

    fn parse_list(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        let mut elements = self.arena.vec::<&Expr<'a>>();
        while !self.check(&TokenKind::RBracket) && !self.is_eof() {
            elements.push(self.parse_expression());
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "']'");
        let span = self.span_since(start);
        self.arena.alloc(Expr::new(ExprKind::List(elements), span))
    }

    /// `{…}` is a `Set` unless its first element is followed by `:`, in
    /// which case it is a `Dict` (`spec.md` §4.2.1).
    fn parse_set_or_dict(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        if self.check_match(&TokenKind::RBrace) {
            let span = self.span_since(start);
            return self.arena.alloc(Expr::new(ExprKind::Dict(self.arena.vec()), span));
        }
        let first_key = self.parse_expression();
        if self.check_match(&TokenKind::Colon) {
            let first_value = self.parse_expression();
            let mut pairs = self.arena.vec::<DictPair<'a>>();
            pairs.push(DictPair { key: first_key, value: first_value });
            while self.check_match(&TokenKind::Comma) {
                if self.check(&TokenKind::RBrace) {
                    break;
                }
                let key = self.parse_expression();
                self.expect(TokenKind::Colon, "':' in dict literal");
                let value = self.parse_expression();
                pairs.push(DictPair { key, value });
            }
            self.expect(TokenKind::RBrace, "'}'");
            let span = self.span_since(start);
            return self.arena.alloc(Expr::new(ExprKind::Dict(pairs), span));
        }
        let mut elements = self.arena.vec::<&Expr<'a>>();
        elements.push(first_key);
        while self.check_match(&TokenKind::Comma) {
            if self.check(&TokenKind::RBrace) {
                break;
            }
            elements.push(self.parse_expression());
        }
        self.expect(TokenKind::RBrace, "'}'");
        let span = self.span_since(start);
        self.arena.alloc(Expr::new(ExprKind::Set(elements), span))
    }

    fn parse_match_expr(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        let test = self.parse_expression();
        self.expect(TokenKind::LBrace, "'{' after match test");
        let mut arms = self.arena.vec::<MatchArm<'a>>();
        let mut default = None;
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Keyword(Keyword::Else)) {
                self.advance();
                self.expect(TokenKind::Arrow, "'->' after 'else'");
                default = Some(self.parse_expression());
                self.check_match(&TokenKind::Comma);
                continue;
            }
            let mut patterns = self.arena.vec::<&Expr<'a>>();
            patterns.push(self.parse_expression());
            while self.check_match(&TokenKind::Comma) {
                if self.check(&TokenKind::Arrow) {
                    break;
                }
                patterns.push(self.parse_expression());
            }
            self.expect(TokenKind::Arrow, "'->' after match pattern");
            let consequent = self.parse_expression();
            arms.push(MatchArm { patterns, consequent });
            self.check_match(&TokenKind::Comma);
        }
        self.expect(TokenKind::RBrace, "'}'");
        let span = self.span_since(start);
        self.arena
            .alloc(Expr::new(ExprKind::Match { test, arms, default }, span))
    }

    fn parse_params(&mut self) -> (nytrix_ast::ArenaVec<'a, Param<'a>>, bool) {
        self.expect(TokenKind::LParen, "'(' in parameter list");
        let mut params = self.arena.vec::<Param<'a>>();
        let mut variadic = false;
        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            if self.check_match(&TokenKind::Ellipsis) {
                variadic = true;
                break;
            }
            let name_tok = self.expect(TokenKind::Ident, "parameter name");
            let name = self.arena.alloc_str(name_tok.lexeme());
            let type_name = if self.check_match(&TokenKind::Colon) {
                let t = self.expect(TokenKind::Ident, "parameter type");
                Some(self.arena.alloc_str(t.lexeme()) as &str)
            } else {
                None
            };
            let default = if self.check_match(&TokenKind::Assign) {
                Some(self.parse_expression())
            } else {
                None
            };
            params.push(Param { name, type_name, default });
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' after parameter list");
        (params, variadic)
    }

    fn parse_return_type(&mut self) -> Option<&'a str> {
        if self.check_match(&TokenKind::Colon) {
            let t = self.expect(TokenKind::Ident, "return type");
            Some(self.arena.alloc_str(t.lexeme()) as &str)
        } else {
            None
        }
    }

    fn parse_lambda(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        let (params, variadic) = self.parse_params();
        let return_type = self.parse_return_type();
        self.expect(TokenKind::Arrow, "'->' before lambda body");
        let body = self.parse_expression();
        let span = self.span_since(start);
        self.arena.alloc(Expr::new(
            ExprKind::Lambda { params, return_type, body, variadic },
            span,
        ))
    }

    fn parse_fn_literal(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        let name = if self.check(&TokenKind::Ident) {
            let tok = self.advance();
            Some(self.arena.alloc_str(tok.lexeme()) as &str)
        } else {
            None
        };
        let (params, variadic) = self.parse_params();
        let return_type = self.parse_return_type();
        self.expect(TokenKind::LBrace, "'{' before function body");
        let body = self.parse_block_expr_body();
        let span = self.span_since(start);
        self.arena.alloc(Expr::new(
            ExprKind::Fn { name, params, return_type, body, variadic },
            span,
        ))
    }

    /// `Fn`/`Lambda` bodies are typed as a single expression; a `{ ... }`
    /// body evaluates to its trailing expression, or an empty tuple if the
    /// block holds none.
    fn parse_block_expr_body(&mut self) -> &'a Expr<'a> {
        let start = self.previous().span.clone();
        let mut last_expr: Option<&'a Expr<'a>> = None;
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            last_expr = Some(self.parse_expression());
            if !self.check_match(&TokenKind::Semi) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        last_expr.unwrap_or_else(|| {
            let span = self.span_since(&start);
            self.arena.alloc(Expr::new(ExprKind::Tuple(self.arena.vec()), span))
        })
    }

    fn parse_asm(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'asm'");
        let code_tok = self.advance_if_str("assembly string");
        let code = self.arena.alloc_str(&unescape_string(code_tok.lexeme()));
        let mut constraints = self.arena.vec::<&str>();
        let mut args = self.arena.vec::<&Expr<'a>>();
        while self.check_match(&TokenKind::Comma) {
            if self.check_any_str() {
                let tok = self.advance();
                constraints.push(self.arena.alloc_str(&unescape_string(tok.lexeme())));
            } else {
                args.push(self.parse_expression());
            }
        }
        self.expect(TokenKind::RParen, "')'");
        let span = self.span_since(start);
        self.arena
            .alloc(Expr::new(ExprKind::Asm { code, constraints, args }, span))
    }

    fn parse_embed(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'embed'");
        let path_tok = self.advance_if_str("embed path string");
        let path = self.arena.alloc_str(&unescape_string(path_tok.lexeme()));
        self.expect(TokenKind::RParen, "')'");
        let span = self.span_since(start);
        self.arena.alloc(Expr::new(ExprKind::Embed(path), span))
    }

    fn parse_sizeof(&mut self, start: &Span) -> &'a Expr<'a> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'sizeof'");
        let operand = if self.check(&TokenKind::Ident)
            && (self.peek_at(1).kind == TokenKind::RParen)
        {
            let tok = self.advance();
            TypeOrExpr::Type(self.arena.alloc_str(tok.lexeme()))
        } else {
            TypeOrExpr::Expr(self.parse_expression())
        };
        self.expect(TokenKind::RParen, "')'");
        let span = self.span_since(start);
        self.arena.alloc(Expr::new(ExprKind::Sizeof(operand), span))
    }

    /// Decomposes an `f"…"` token's raw text into alternating literal runs
    /// and `{ expr }` sub-parses, each re-lexed from the original source so
    /// its span stays anchored to the real byte offsets (`SPEC_FULL.md`
    /// §1).
    fn parse_fstring(&mut self, token: &Token) -> &'a Expr<'a> {
        let raw = token.lexeme();
        let inner_start_offset = raw.find(|c| c == '"' || c == '\'').map(|i| i + 1).unwrap_or(0);
        let inner_end_offset = raw.rfind(|c| c == '"' || c == '\'').unwrap_or(raw.len());
        let inner = &raw[inner_start_offset..inner_end_offset];
        let base = token.span.start + inner_start_offset;

        let mut parts = self.arena.vec::<FStringPart<'a>>();
        let mut literal_start = 0usize;
        let mut i = 0usize;
        let bytes = inner.as_bytes();
        while i < bytes.len() {
            if bytes[i] == b'{' {
                if literal_start < i {
                    let text = self.arena.alloc_str(&unescape_string(&inner[literal_start..i]));
                    parts.push(FStringPart::Str(text));
                }
                let expr_start = i + 1;
                let mut depth = 1;
                let mut j = expr_start;
                while j < bytes.len() && depth > 0 {
                    match bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    if depth > 0 {
                        j += 1;
                    }
                }
                let sub_source = &inner[expr_start..j];
                let sub_span = Span::new(&self.source, base + expr_start, base + j);
                parts.push(FStringPart::Expr(self.parse_sub_expression(sub_source, &sub_span)));
                i = j + 1;
                literal_start = i;
            } else {
                i += 1;
            }
        }
        if literal_start < inner.len() {
            let text = self.arena.alloc_str(&unescape_string(&inner[literal_start..]));
            parts.push(FStringPart::Str(text));
        }
        self.arena.alloc(Expr::new(ExprKind::FString(parts), token.span.clone()))
    }

    /// Re-lexes and parses an interpolation sub-expression in isolation,
    /// folding any diagnostics it raises into the outer parser.
    fn parse_sub_expression(&mut self, text: &str, span: &Span) -> &'a Expr<'a> {
        let mut sub_tokens = nytrix_lexer::Lexer::lex(nytrix_common::Source::new(text, &self.source.path));
        for tok in sub_tokens.iter_mut() {
            tok.span = Span::new(&self.source, span.start + tok.span.start, span.start + tok.span.end);
        }
        let mut sub_parser = Parser::new(sub_tokens, self.source.clone(), self.arena);
        let expr = sub_parser.parse_expression();
        self.diagnostics.extend(sub_parser.diagnostics);
        self.had_error |= sub_parser.had_error;
        expr
    }
}

/// Strips surrounding quotes and processes `\n \t \r \\ \' \" \xHH \ooo`
/// escapes (`spec.md` §4.1).
pub(crate) fn unescape_string(lexeme: &str) -> String {
    let stripped = strip_quotes(lexeme);
    let mut out = String::with_capacity(stripped.len());
    let mut chars = stripped.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('x') => {
                let hi = chars.next().unwrap_or('0');
                let lo = chars.next().unwrap_or('0');
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).unwrap_or(0);
                out.push(byte as char);
            }
            Some(d) if d.is_digit(8) => {
                let mut digits = String::new();
                digits.push(d);
                for _ in 0..2 {
                    if let Some(&next) = chars.peek() {
                        if next.is_digit(8) {
                            digits.push(next);
                            chars.next();
                            continue;
                        }
                    }
                    break;
                }
                let byte = u8::from_str_radix(&digits, 8).unwrap_or(0);
                out.push(byte as char);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn strip_quotes(lexeme: &str) -> &str {
    if lexeme.len() >= 6
        && (lexeme.starts_with("\"\"\"") || lexeme.starts_with("'''"))
    {
        &lexeme[3..lexeme.len() - 3]
    } else if lexeme.len() >= 2 {
        &lexeme[1..lexeme.len() - 1]
    } else {
        lexeme
    }
}
