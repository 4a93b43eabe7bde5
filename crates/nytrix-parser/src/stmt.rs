use nytrix_ast::{
    Arg, EnumItem, Expr, ExprKind, Field, ImportItem, MatchArmStmt, Param, SrcRange, Stmt,
    StmtKind,
};
use nytrix_common::Span;
use nytrix_lexer::{Keyword, TokenKind};

use crate::parser::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_program_statements(&mut self) -> nytrix_ast::ArenaVec<'a, &'a Stmt<'a>> {
        let mut statements = self.arena.vec::<&Stmt<'a>>();
        while !self.is_eof() {
            statements.push(self.parse_declaration());
        }
        statements
    }

    /// Top-level dispatch; recovers by synchronising after a failed
    /// statement rather than propagating (`spec.md` §4.2.3).
    pub(crate) fn parse_declaration(&mut self) -> &'a Stmt<'a> {
        let errors_before = self.error_count;
        let stmt = self.parse_statement();
        if self.error_count > errors_before && !self.check(&TokenKind::Semi) {
            self.synchronize();
        }
        stmt
    }

    fn parse_statement(&mut self) -> &'a Stmt<'a> {
        let start = self.peek().span.clone();
        match &self.peek().kind {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Keyword(Keyword::Use) => self.parse_use(&start),
            TokenKind::Keyword(Keyword::Def) => self.parse_var(&start, true, false),
            TokenKind::Keyword(Keyword::Mut) => self.parse_var(&start, true, true),
            TokenKind::Keyword(Keyword::Undef) => self.parse_undef(&start),
            TokenKind::Keyword(Keyword::If) => self.parse_if(&start),
            TokenKind::Keyword(Keyword::While) => self.parse_while(&start),
            TokenKind::Keyword(Keyword::For) => self.parse_for(&start),
            TokenKind::Keyword(Keyword::Try) => self.parse_try(&start),
            TokenKind::Keyword(Keyword::Fn) => self.parse_func(&start),
            TokenKind::Keyword(Keyword::Extern) => self.parse_extern(&start),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(&start),
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                self.check_loop_depth("break", &start);
                self.finish_simple(StmtKind::Break, &start)
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                self.check_loop_depth("continue", &start);
                self.finish_simple(StmtKind::Continue, &start)
            }
            TokenKind::Keyword(Keyword::Goto) => self.parse_goto(&start),
            TokenKind::Keyword(Keyword::Defer) => self.parse_defer(&start),
            TokenKind::Keyword(Keyword::Struct) => self.parse_struct_or_layout(&start, false),
            TokenKind::Keyword(Keyword::Layout) => self.parse_struct_or_layout(&start, true),
            TokenKind::Keyword(Keyword::Enum) => self.parse_enum(&start),
            TokenKind::Keyword(Keyword::Match) => self.parse_match_stmt(&start),
            TokenKind::Keyword(Keyword::Module) => self.parse_module(&start),
            TokenKind::Ident if self.peek_at(1).kind == TokenKind::Colon
                && self.peek_at(2).kind != TokenKind::Colon =>
            {
                self.parse_label(&start)
            }
            TokenKind::Ident
                if matches!(self.peek_at(1).kind, TokenKind::LBrace)
                    || (self.peek_at(1).kind == TokenKind::LParen && self.looks_like_macro_call()) =>
            {
                self.parse_macro_stmt(&start)
            }
            _ if self.check(&TokenKind::Ident) && self.peek().lexeme() == "export" => {
                self.parse_export(&start)
            }
            _ => self.parse_expr_or_assign_stmt(&start),
        }
    }

    fn finish_simple(&mut self, kind: StmtKind<'a>, start: &Span) -> &'a Stmt<'a> {
        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(kind, span))
    }

    fn check_loop_depth(&mut self, what: &str, at: &Span) {
        if self.loop_depth == 0 {
            let tok = self.previous().clone();
            self.error(format!("'{what}' outside a loop"), &tok);
            let _ = at;
        }
    }

    fn parse_block(&mut self) -> &'a Stmt<'a> {
        let start = self.peek().span.clone();
        self.advance();
        self.block_depth += 1;
        let mut statements = self.arena.vec::<&Stmt<'a>>();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            statements.push(self.parse_declaration());
        }
        self.block_depth -= 1;
        self.expect(TokenKind::RBrace, "'}'");
        let span = self.span_since(&start);
        self.arena.alloc(Stmt::new(StmtKind::Block(statements), span))
    }

    /// `use std.io`, `use "./rel/path"`, `use mod *`, `use mod (a, b as c)`,
    /// `use mod as m`. `*` and the import list are mutually exclusive with
    /// `as` (`spec.md` §4.2.2).
    fn parse_use(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let (module_name, is_local) = if self.check_any_str() {
            let tok = self.advance();
            (self.arena.alloc_str(&crate::expr::unescape_string(tok.lexeme())) as &str, true)
        } else {
            let mut segments = Vec::new();
            segments.push(self.expect(TokenKind::Ident, "module name").lexeme().to_string());
            while self.check_match(&TokenKind::Dot) {
                segments.push(self.expect(TokenKind::Ident, "module name segment").lexeme().to_string());
            }
            (self.arena.alloc_str(&segments.join(".")) as &str, false)
        };

        let mut alias = None;
        let mut import_all = false;
        let mut imports = self.arena.vec::<ImportItem<'a>>();

        if self.check_match(&TokenKind::Star) {
            import_all = true;
        } else if self.check_match(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) && !self.is_eof() {
                let name_tok = self.expect(TokenKind::Ident, "imported name");
                let name = self.arena.alloc_str(name_tok.lexeme());
                let item_alias = if self.check_match(&TokenKind::Keyword(Keyword::As)) {
                    let a = self.expect(TokenKind::Ident, "import alias");
                    Some(self.arena.alloc_str(a.lexeme()) as &str)
                } else {
                    None
                };
                imports.push(ImportItem { name, alias: item_alias });
                if !self.check_match(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'");
        } else if self.check_match(&TokenKind::Keyword(Keyword::As)) {
            let a = self.expect(TokenKind::Ident, "module alias");
            alias = Some(self.arena.alloc_str(a.lexeme()) as &str);
        }

        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Use { module_name, alias, is_local, import_all, imports },
            span,
        ))
    }

    /// `def`/`mut` binding, with optional `[a, b, c] = ...` destructuring
    /// and per-name `: Type` annotations (`spec.md` §4.2.2). A binding
    /// directly at a module's top-level statement list (not nested in a
    /// further block) is mangled `<module>.<name>`, applied once even
    /// across nested modules since `current_module` already carries the
    /// full dotted path.
    fn parse_var(&mut self, start: &Span, is_decl: bool, is_mut: bool) -> &'a Stmt<'a> {
        self.advance();
        let should_mangle = is_decl && self.at_module_mangle_point();
        let mut names = self.arena.vec::<&str>();
        let mut types = self.arena.vec::<Option<&str>>();
        let is_destructure = self.check(&TokenKind::LBracket);

        let push_name = |parser: &Parser<'a>, lexeme: &str| -> &'a str {
            if should_mangle {
                parser.arena.alloc_str(&parser.mangled(lexeme))
            } else {
                parser.arena.alloc_str(lexeme)
            }
        };

        if is_destructure {
            self.advance();
            while !self.check(&TokenKind::RBracket) && !self.is_eof() {
                let name_tok = self.expect(TokenKind::Ident, "binding name");
                let name = push_name(self, name_tok.lexeme());
                names.push(name);
                types.push(None);
                if !self.check_match(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBracket, "']'");
        } else {
            loop {
                let name_tok = self.expect(TokenKind::Ident, "binding name");
                let name = push_name(self, name_tok.lexeme());
                names.push(name);
                let type_name = if self.check_match(&TokenKind::Colon) {
                    let t = self.expect(TokenKind::Ident, "type annotation");
                    Some(self.arena.alloc_str(t.lexeme()) as &str)
                } else {
                    None
                };
                types.push(type_name);
                if !self.check_match(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let mut exprs = self.arena.vec::<&Expr<'a>>();
        if self.check_match(&TokenKind::Assign) {
            exprs.push(self.parse_expression());
            while self.check_match(&TokenKind::Comma) {
                exprs.push(self.parse_expression());
            }
        }

        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Var { names, types, exprs, is_decl, is_undef: false, is_mut, is_destructure },
            span,
        ))
    }

    fn parse_undef(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let mut names = self.arena.vec::<&str>();
        let mut types = self.arena.vec::<Option<&str>>();
        loop {
            let name_tok = self.expect(TokenKind::Ident, "binding name");
            names.push(self.arena.alloc_str(name_tok.lexeme()));
            types.push(None);
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Var {
                names,
                types,
                exprs: self.arena.vec(),
                is_decl: true,
                is_undef: true,
                is_mut: false,
                is_destructure: false,
            },
            span,
        ))
    }

    fn parse_if(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let test = self.parse_expression();
        let then_branch = self.parse_block();
        let else_branch = if self.check(&TokenKind::Keyword(Keyword::Elif)) {
            let elif_start = self.peek().span.clone();
            Some(self.parse_if_as_elif(&elif_start))
        } else if self.check_match(&TokenKind::Keyword(Keyword::Else)) {
            Some(self.parse_block())
        } else {
            None
        };
        let span = self.span_since(start);
        self.arena
            .alloc(Stmt::new(StmtKind::If { test, then_branch, else_branch }, span))
    }

    /// `elif` reuses the `if` node shape, nested as the parent's
    /// `else_branch`.
    fn parse_if_as_elif(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let test = self.parse_expression();
        let then_branch = self.parse_block();
        let else_branch = if self.check(&TokenKind::Keyword(Keyword::Elif)) {
            let elif_start = self.peek().span.clone();
            Some(self.parse_if_as_elif(&elif_start))
        } else if self.check_match(&TokenKind::Keyword(Keyword::Else)) {
            Some(self.parse_block())
        } else {
            None
        };
        let span = self.span_since(start);
        self.arena
            .alloc(Stmt::new(StmtKind::If { test, then_branch, else_branch }, span))
    }

    fn parse_while(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let test = self.parse_expression();
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::While { test, body }, span))
    }

    fn parse_for(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let iter_tok = self.expect(TokenKind::Ident, "loop variable");
        let iter_var = self.arena.alloc_str(iter_tok.lexeme());
        self.expect(TokenKind::Keyword(Keyword::In), "'in'");
        let iterable = self.parse_expression();
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        let span = self.span_since(start);
        self.arena
            .alloc(Stmt::new(StmtKind::For { iter_var, iterable, body }, span))
    }

    /// `try { } catch [(name)|name]? { }`.
    fn parse_try(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let body = self.parse_block();
        self.expect(TokenKind::Keyword(Keyword::Catch), "'catch'");
        let error_name = if self.check_match(&TokenKind::LParen) {
            let n = self.expect(TokenKind::Ident, "error name");
            self.expect(TokenKind::RParen, "')'");
            Some(self.arena.alloc_str(n.lexeme()) as &str)
        } else if self.check(&TokenKind::Ident) {
            let n = self.advance();
            Some(self.arena.alloc_str(n.lexeme()) as &str)
        } else {
            None
        };
        let handler = self.parse_block();
        let span = self.span_since(start);
        self.arena
            .alloc(Stmt::new(StmtKind::Try { body, error_name, handler }, span))
    }

    /// `fn name(params): RetType? { body } | ;` with an optional
    /// `@attribute(args)` list.
    fn parse_func(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let attributes = self.parse_attributes();
        let name_tok = self.expect(TokenKind::Ident, "function name");
        let raw_name = name_tok.lexeme().to_string();
        let (params, variadic) = self.parse_fn_params();
        let return_type = self.parse_fn_return_type();

        let doc = None;
        let name = self.arena.alloc_str(&raw_name);
        if self.check_match(&TokenKind::Semi) {
            let span = self.span_since(start);
            return self.arena.alloc(Stmt::new(
                StmtKind::Func {
                    name,
                    params,
                    return_type,
                    body: None,
                    doc,
                    variadic,
                    attributes,
                    src_range: SrcRange::new(span.start, span.end),
                },
                span,
            ));
        }

        let body_start = self.peek().span.start;
        let body = self.parse_block();
        let body_end = self.previous().span.end;
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Func {
                name,
                params,
                return_type,
                body: Some(body),
                doc,
                variadic,
                attributes,
                src_range: SrcRange::new(body_start, body_end),
            },
            span,
        ))
    }

    fn parse_attributes(&mut self) -> nytrix_ast::ArenaVec<'a, &'a str> {
        let mut attributes = self.arena.vec::<&str>();
        self.parse_attribute_list(&mut attributes);
        attributes
    }

    /// `@attribute(args)` lists preceding a `fn` declaration. The lexer
    /// has no dedicated `@` token, so an attribute is recognised
    /// structurally instead: an `Ident '(' ... ')'` run immediately
    /// followed by `fn` is consumed as an attribute rather than as the
    /// start of an expression statement.
    fn parse_attribute_list(&mut self, attributes: &mut nytrix_ast::ArenaVec<'a, &'a str>) {
        while self.check(&TokenKind::Ident) && self.peek_at(1).kind == TokenKind::LParen {
            let checkpoint = self.pos;
            let name_tok = self.advance();
            let name = name_tok.lexeme().to_string();
            self.advance(); // '('
            let mut depth = 1;
            while depth > 0 && !self.is_eof() {
                match self.peek().kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => depth -= 1,
                    _ => {}
                }
                self.advance();
            }
            if self.check(&TokenKind::Keyword(Keyword::Fn)) {
                attributes.push(self.arena.alloc_str(&name));
            } else {
                self.pos = checkpoint;
                break;
            }
        }
    }

    fn parse_fn_params(&mut self) -> (nytrix_ast::ArenaVec<'a, Param<'a>>, bool) {
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

    fn parse_fn_return_type(&mut self) -> Option<&'a str> {
        if self.check_match(&TokenKind::Colon) {
            let t = self.expect(TokenKind::Ident, "return type");
            Some(self.arena.alloc_str(t.lexeme()) as &str)
        } else {
            None
        }
    }

    /// `extern fn name(params): Ret? [as linkname]`.
    fn parse_extern(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        self.expect(TokenKind::Keyword(Keyword::Fn), "'fn' after 'extern'");
        let name_tok = self.expect(TokenKind::Ident, "extern function name");
        let name = self.arena.alloc_str(name_tok.lexeme());
        let (params, variadic) = self.parse_fn_params();
        let return_type = self.parse_fn_return_type();
        let link_name = if self.check_match(&TokenKind::Keyword(Keyword::As)) {
            let l = self.expect(TokenKind::Ident, "link name");
            Some(self.arena.alloc_str(l.lexeme()) as &str)
        } else {
            None
        };
        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Extern { name, params, return_type, link_name, variadic },
            span,
        ))
    }

    fn parse_return(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let value = if self.check(&TokenKind::Semi) || self.check(&TokenKind::RBrace) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Return(value), span))
    }

    fn parse_goto(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let name_tok = self.expect(TokenKind::Ident, "label name");
        let name = self.arena.alloc_str(name_tok.lexeme());
        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Goto(name), span))
    }

    fn parse_label(&mut self, start: &Span) -> &'a Stmt<'a> {
        let name_tok = self.advance();
        let name = self.arena.alloc_str(name_tok.lexeme());
        self.advance(); // ':'
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Label(name), span))
    }

    fn parse_defer(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let body = self.parse_block();
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Defer(body), span))
    }

    /// `struct`/`layout name [align(N)] [pack(N)] { field: Type [align(N)], ... }`.
    fn parse_struct_or_layout(&mut self, start: &Span, is_layout: bool) -> &'a Stmt<'a> {
        self.advance();
        let name_tok = self.expect(TokenKind::Ident, "struct name");
        let name = self.arena.alloc_str(name_tok.lexeme());

        let mut align_override = None;
        let mut pack = false;
        loop {
            if self.check(&TokenKind::Ident) && self.peek().lexeme() == "align" {
                self.advance();
                self.expect(TokenKind::LParen, "'(' after 'align'");
                let n = self.expect(TokenKind::Number, "alignment value");
                align_override = n.lexeme().parse::<u32>().ok();
                self.expect(TokenKind::RParen, "')'");
            } else if self.check(&TokenKind::Ident) && self.peek().lexeme() == "pack" {
                self.advance();
                self.expect(TokenKind::LParen, "'(' after 'pack'");
                self.expect(TokenKind::Number, "pack value");
                self.expect(TokenKind::RParen, "')'");
                pack = true;
            } else {
                break;
            }
        }

        self.expect(TokenKind::LBrace, "'{' to open struct body");
        let mut fields = self.arena.vec::<Field<'a>>();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let field_name_tok = self.expect(TokenKind::Ident, "field name");
            let field_name = self.arena.alloc_str(field_name_tok.lexeme());
            self.expect(TokenKind::Colon, "':' before field type");
            let type_tok = self.expect(TokenKind::Ident, "field type");
            let type_name = self.arena.alloc_str(type_tok.lexeme());
            let explicit_align = if self.check(&TokenKind::Ident) && self.peek().lexeme() == "align" {
                self.advance();
                self.expect(TokenKind::LParen, "'(' after 'align'");
                let n = self.expect(TokenKind::Number, "alignment value");
                let value = n.lexeme().parse::<u32>().ok();
                self.expect(TokenKind::RParen, "')'");
                value
            } else {
                None
            };
            fields.push(Field { name: field_name, type_name, explicit_align });
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        let span = self.span_since(start);
        let kind = if is_layout {
            StmtKind::Layout { name, fields, align_override, pack }
        } else {
            StmtKind::Struct { name, fields, align_override, pack }
        };
        self.arena.alloc(Stmt::new(kind, span))
    }

    fn parse_enum(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let name_tok = self.expect(TokenKind::Ident, "enum name");
        let name = self.arena.alloc_str(name_tok.lexeme());
        self.expect(TokenKind::LBrace, "'{' to open enum body");
        let mut items = self.arena.vec::<EnumItem<'a>>();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let item_tok = self.expect(TokenKind::Ident, "enum variant name");
            let item_name = self.arena.alloc_str(item_tok.lexeme());
            let value = if self.check_match(&TokenKind::Assign) {
                Some(self.parse_expression())
            } else {
                None
            };
            items.push(EnumItem { name: item_name, value });
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Enum { name, items }, span))
    }

    /// `match test { pattern [, pattern ...] -> expr | { block }  ... else block }`.
    fn parse_match_stmt(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let test = self.parse_expression();
        self.expect(TokenKind::LBrace, "'{' after match test");
        let mut arms = self.arena.vec::<MatchArmStmt<'a>>();
        let mut default = None;
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Keyword(Keyword::Else)) {
                self.advance();
                self.expect(TokenKind::Arrow, "'->' after 'else'");
                default = Some(self.parse_match_consequent());
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
            let consequent = self.parse_match_consequent();
            arms.push(MatchArmStmt { patterns, consequent });
        }
        self.expect(TokenKind::RBrace, "'}'");
        let span = self.span_since(start);
        self.arena
            .alloc(Stmt::new(StmtKind::Match { test, arms, default }, span))
    }

    fn parse_match_consequent(&mut self) -> &'a Stmt<'a> {
        if self.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            let start = self.peek().span.clone();
            let expr = self.parse_expression();
            self.check_match(&TokenKind::Comma);
            let span = self.span_since(&start);
            self.arena.alloc(Stmt::new(StmtKind::ExprStmt(expr), span))
        }
    }

    /// `module name [*] [( body ) | { body }]`; `def` declarations at block
    /// depth 0 inside are mangled `<module>.<name>` exactly once
    /// (`spec.md` §4.2.2).
    fn parse_module(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let name_tok = self.expect(TokenKind::Ident, "module name");
        let name = self.arena.alloc_str(name_tok.lexeme());
        let export_all = self.check_match(&TokenKind::Star);

        self.current_module.push(name.to_string());
        let body_start = self.peek().span.start;
        let body = if self.check(&TokenKind::LParen) {
            // No `parse_block` here, so `block_depth` doesn't change: the
            // module's own top-level sits at the current depth.
            self.module_mangle_depth.push(self.block_depth);
            self.advance();
            let mut statements = self.arena.vec::<&Stmt<'a>>();
            while !self.check(&TokenKind::RParen) && !self.is_eof() {
                statements.push(self.parse_declaration());
            }
            self.expect(TokenKind::RParen, "')'");
            let span = self.span_since(start);
            self.arena.alloc(Stmt::new(StmtKind::Block(statements), span))
        } else {
            // `parse_block` increments `block_depth` for its own duration,
            // so the module's top-level sits one level deeper than now.
            self.module_mangle_depth.push(self.block_depth + 1);
            self.parse_block()
        };
        self.module_mangle_depth.pop();
        let body_end = self.previous().span.end;
        self.current_module.pop();

        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Module { name, body, export_all, src_range: SrcRange::new(body_start, body_end) },
            span,
        ))
    }

    fn parse_export(&mut self, start: &Span) -> &'a Stmt<'a> {
        self.advance();
        let mut names = self.arena.vec::<&str>();
        loop {
            let name_tok = self.expect(TokenKind::Ident, "exported name");
            names.push(self.arena.alloc_str(name_tok.lexeme()));
            if !self.check_match(&TokenKind::Comma) {
                break;
            }
        }
        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Export(names), span))
    }

    /// An identifier directly followed by `{` or `(args) {` that is not one
    /// of the statement-introducing keywords above is a generic macro
    /// invocation (`spec.md` §4.2.2).
    fn looks_like_macro_call(&self) -> bool {
        let mut depth = 0;
        let mut i = 1;
        loop {
            match self.peek_at(i).kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_at(i + 1).kind == TokenKind::LBrace;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
            if i > 64 {
                return false;
            }
        }
    }

    fn parse_macro_stmt(&mut self, start: &Span) -> &'a Stmt<'a> {
        let name_tok = self.advance();
        let name = self.arena.alloc_str(name_tok.lexeme());
        let mut args = self.arena.vec::<&Expr<'a>>();
        if self.check_match(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) && !self.is_eof() {
                args.push(self.parse_expression());
                if !self.check_match(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'");
        }
        let body = self.parse_block();
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::Macro { name, args, body }, span))
    }

    /// Plain expression statements, compound assignments, and index
    /// assignment rewriting (`spec.md` §4.2.2). A bare `name = expr` or
    /// `name op= expr` is represented as a non-declaring [`StmtKind::Var`]
    /// (`is_decl: false`) rather than a dedicated assignment node, since
    /// the data model has none; `a[i] = v` rewrites to a call
    /// `set_idx(a, i, v)`.
    fn parse_expr_or_assign_stmt(&mut self, start: &Span) -> &'a Stmt<'a> {
        let expr = self.parse_expression();

        if let ExprKind::Index { target, start: idx_start, stop, step } = &expr.kind {
            if self.check(&TokenKind::Assign) && idx_start.is_some() && stop.is_none() && step.is_none() {
                self.advance();
                let value = self.parse_expression();
                self.check_match(&TokenKind::Semi);
                let callee_name = self.arena.alloc_str("set_idx");
                let callee = self.arena.alloc(Expr::new(ExprKind::Ident(callee_name), expr.span.clone()));
                let mut args = self.arena.vec::<Arg<'a>>();
                args.push(Arg { name: None, value: target });
                args.push(Arg { name: None, value: idx_start.unwrap() });
                args.push(Arg { name: None, value });
                let span = self.span_since(start);
                let call = self.arena.alloc(Expr::new(ExprKind::Call { callee, args }, span.clone()));
                return self.arena.alloc(Stmt::new(StmtKind::ExprStmt(call), span));
            }
        }

        if let ExprKind::Ident(name) = expr.kind {
            let compound = match self.peek().kind {
                TokenKind::PlusEq => Some(nytrix_ast::BinaryOp::Add),
                TokenKind::MinusEq => Some(nytrix_ast::BinaryOp::Sub),
                TokenKind::StarEq => Some(nytrix_ast::BinaryOp::Mul),
                TokenKind::SlashEq => Some(nytrix_ast::BinaryOp::Div),
                TokenKind::PercentEq => Some(nytrix_ast::BinaryOp::Mod),
                _ => None,
            };
            if let Some(op) = compound {
                self.advance();
                let rhs = self.parse_expression();
                self.check_match(&TokenKind::Semi);
                let binary = self.arena.alloc(Expr::new(
                    ExprKind::Binary { op, lhs: expr, rhs },
                    expr.span.clone(),
                ));
                return self.finish_assign(name, binary, start);
            }
            if self.check_match(&TokenKind::Assign) {
                let rhs = self.parse_expression();
                self.check_match(&TokenKind::Semi);
                return self.finish_assign(name, rhs, start);
            }
        }

        self.check_match(&TokenKind::Semi);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(StmtKind::ExprStmt(expr), span))
    }

    fn finish_assign(&mut self, name: &'a str, value: &'a Expr<'a>, start: &Span) -> &'a Stmt<'a> {
        let mut names = self.arena.vec::<&str>();
        names.push(name);
        let mut types = self.arena.vec::<Option<&str>>();
        types.push(None);
        let mut exprs = self.arena.vec::<&Expr<'a>>();
        exprs.push(value);
        let span = self.span_since(start);
        self.arena.alloc(Stmt::new(
            StmtKind::Var {
                names,
                types,
                exprs,
                is_decl: false,
                is_undef: false,
                is_mut: false,
                is_destructure: false,
            },
            span,
        ))
    }
}
