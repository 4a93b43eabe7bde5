//! Builds an AST from a Nytrix token stream; reports structured
//! diagnostics and recovers after errors so a single parse yields as many
//! of them as possible (`spec.md` §4.2).

mod expr;
mod hints;
mod number;
mod parser;
mod result;
mod stmt;

use std::rc::Rc;

use nytrix_ast::{Arena, ExprKind, LiteralValue, Program, StmtKind};
use nytrix_common::Source;
use nytrix_lexer::Lexer;

pub use parser::Parser;
pub use result::ParseResult;

/// Lexes and parses an entire source buffer into a [`Program`].
///
/// The leading top-level statement is checked for the bare string-literal
/// shape that marks a module doc string (`SPEC_FULL.md` §2); if present it
/// is extracted into `Program::doc` rather than kept as a statement.
pub fn parse<'a>(source: Rc<Source>, arena: &'a Arena) -> ParseResult<'a> {
    let tokens = Lexer::lex(source.clone());
    let mut parser = Parser::new(tokens, source, arena);

    let mut statements = arena.vec();
    let mut doc = None;

    if !parser.is_eof() {
        let first = parser.parse_declaration();
        match &first.kind {
            StmtKind::ExprStmt(expr) => match &expr.kind {
                ExprKind::Literal { value: LiteralValue::Str(s), .. } => doc = Some(*s),
                _ => statements.push(first),
            },
            _ => statements.push(first),
        }
    }
    while !parser.is_eof() {
        statements.push(parser.parse_declaration());
    }

    let program = Program::new(doc, statements);
    ParseResult::new(program, parser.diagnostics, parser.had_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_src(src: &str) -> ParseResult<'static> {
        let arena = Box::leak(Box::new(Arena::new()));
        parse(Source::anonymous(src), arena)
    }

    #[test]
    fn parses_simple_var_decl() {
        let result = parse_src("def x = 1 + 2;");
        assert!(!result.had_error);
        assert_eq!(result.program.statements.len(), 1);
        assert!(matches!(result.program.statements[0].kind, StmtKind::Var { .. }));
    }

    #[test]
    fn extracts_leading_doc_string() {
        let result = parse_src("\"a module doc\" def x = 1;");
        assert_eq!(result.program.doc, Some("a module doc"));
        assert_eq!(result.program.statements.len(), 1);
    }

    #[test]
    fn ternary_binds_below_logical_and() {
        let result = parse_src("def x = a && b ? c : d;");
        assert!(!result.had_error);
        let StmtKind::Var { exprs, .. } = &result.program.statements[0].kind else {
            panic!("expected Var");
        };
        match &exprs[0].kind {
            ExprKind::Ternary { cond, .. } => {
                assert!(matches!(cond.kind, ExprKind::Logical { .. }));
            }
            other => panic!("expected Ternary, got {:?}", other),
        }
    }

    #[test]
    fn postfix_try_when_no_colon_follows() {
        let result = parse_src("def x = risky()?;");
        assert!(!result.had_error);
        let StmtKind::Var { exprs, .. } = &result.program.statements[0].kind else {
            panic!("expected Var");
        };
        assert!(matches!(exprs[0].kind, ExprKind::Try(_)));
    }

    #[test]
    fn if_elif_else_chain() {
        let result = parse_src("if a { } elif b { } else { }");
        assert!(!result.had_error);
        assert!(matches!(result.program.statements[0].kind, StmtKind::If { .. }));
    }

    #[test]
    fn func_records_src_range() {
        let result = parse_src("fn add(a, b): i32 { return a + b; }");
        assert!(!result.had_error);
        match &result.program.statements[0].kind {
            StmtKind::Func { name, src_range, .. } => {
                assert_eq!(*name, "add");
                assert!(src_range.end > src_range.start);
            }
            other => panic!("expected Func, got {:?}", other),
        }
    }

    #[test]
    fn module_mangles_top_level_def_once() {
        let result = parse_src("module m { def x = 1; }");
        assert!(!result.had_error);
        let StmtKind::Module { body, .. } = &result.program.statements[0].kind else {
            panic!("expected Module");
        };
        let StmtKind::Block(stmts) = &body.kind else {
            panic!("expected Block");
        };
        match &stmts[0].kind {
            StmtKind::Var { names, .. } => assert_eq!(names[0], "m.x"),
            other => panic!("expected Var, got {:?}", other),
        }
    }

    #[test]
    fn module_does_not_mangle_fn_name() {
        let result = parse_src("module m { fn f() { } }");
        assert!(!result.had_error);
        let StmtKind::Module { body, .. } = &result.program.statements[0].kind else {
            panic!("expected Module");
        };
        let StmtKind::Block(stmts) = &body.kind else {
            panic!("expected Block");
        };
        match &stmts[0].kind {
            StmtKind::Func { name, .. } => assert_eq!(*name, "f"),
            other => panic!("expected Func, got {:?}", other),
        }
    }

    #[test]
    fn module_does_not_mangle_def_nested_in_inner_block() {
        let result = parse_src("module m { if true { def x = 1; } }");
        assert!(!result.had_error);
        let StmtKind::Module { body, .. } = &result.program.statements[0].kind else {
            panic!("expected Module");
        };
        let StmtKind::Block(stmts) = &body.kind else {
            panic!("expected Block");
        };
        let StmtKind::If { then_branch, .. } = &stmts[0].kind else {
            panic!("expected If");
        };
        let StmtKind::Block(inner) = &then_branch.kind else {
            panic!("expected Block");
        };
        match &inner[0].kind {
            StmtKind::Var { names, .. } => assert_eq!(names[0], "x"),
            other => panic!("expected Var, got {:?}", other),
        }
    }

    #[test]
    fn index_assignment_rewrites_to_set_idx_call() {
        let result = parse_src("a[i] = v;");
        assert!(!result.had_error);
        match &result.program.statements[0].kind {
            StmtKind::ExprStmt(expr) => match &expr.kind {
                ExprKind::Call { callee, args } => {
                    assert!(matches!(callee.kind, ExprKind::Ident("set_idx")));
                    assert_eq!(args.len(), 3);
                }
                other => panic!("expected Call, got {:?}", other),
            },
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn break_outside_loop_is_diagnosed() {
        let result = parse_src("break;");
        assert!(result.had_error);
    }

    #[test]
    fn unknown_primary_reports_hint_for_known_mistake() {
        let result = parse_src("extern func add(a): i32;");
        assert!(result.had_error);
        assert!(result.diagnostics.iter().any(|d| d
            .notes
            .iter()
            .any(|n| n.hint.as_deref() == Some("did you mean 'fn'?"))));
    }
}
