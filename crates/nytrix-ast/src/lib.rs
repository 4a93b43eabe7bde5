//! Arena-allocated AST node types produced by `nytrix-parser` (`spec.md`
//! §3.2–3.5).

pub mod arena;
pub mod expr;
pub mod literal;
pub mod program;
pub mod stmt;

pub use arena::{Arena, ArenaVec};
pub use expr::{
    Arg, BinaryOp, DictPair, Expr, ExprKind, FStringPart, LogicalOp, MatchArm, Param, TypeOrExpr,
    UnaryOp,
};
pub use literal::{LiteralValue, TypeHint};
pub use program::Program;
pub use stmt::{EnumItem, Field, ImportItem, MatchArmStmt, SrcRange, Stmt, StmtKind};

#[cfg(test)]
mod tests {
    use super::*;
    use nytrix_common::Source;

    #[test]
    fn builds_binary_expr_tree() {
        let source = Source::anonymous("1 + 2");
        let arena = Arena::new();
        let span = nytrix_common::Span::new(&source, 0, 5);

        let one = arena.alloc(Expr::new(
            ExprKind::Literal {
                value: LiteralValue::Int(1),
                type_hint: TypeHint::None,
                hint_explicit: false,
            },
            nytrix_common::Span::new(&source, 0, 1),
        ));
        let two = arena.alloc(Expr::new(
            ExprKind::Literal {
                value: LiteralValue::Int(2),
                type_hint: TypeHint::None,
                hint_explicit: false,
            },
            nytrix_common::Span::new(&source, 4, 5),
        ));
        let sum = Expr::new(
            ExprKind::Binary { op: BinaryOp::Add, lhs: one, rhs: two },
            span,
        );

        match sum.kind {
            ExprKind::Binary { op: BinaryOp::Add, lhs, rhs } => {
                assert!(matches!(lhs.kind, ExprKind::Literal { value: LiteralValue::Int(1), .. }));
                assert!(matches!(rhs.kind, ExprKind::Literal { value: LiteralValue::Int(2), .. }));
            }
            _ => panic!("expected Binary"),
        }
    }

    #[test]
    fn index_missing_bounds_are_none() {
        let source = Source::anonymous("xs[:]");
        let arena = Arena::new();
        let target = arena.alloc(Expr::new(
            ExprKind::Ident("xs"),
            nytrix_common::Span::new(&source, 0, 2),
        ));
        let index = ExprKind::Index { target, start: None, stop: None, step: None };
        assert!(matches!(index, ExprKind::Index { start: None, stop: None, step: None, .. }));
    }

    #[test]
    fn block_holds_arena_vec_of_statements() {
        let source = Source::anonymous("break; continue;");
        let arena = Arena::new();

        let brk = arena.alloc(Stmt::new(StmtKind::Break, nytrix_common::Span::new(&source, 0, 5)));
        let cont = arena.alloc(Stmt::new(StmtKind::Continue, nytrix_common::Span::new(&source, 7, 15)));

        let mut statements = arena.vec::<&Stmt<'_>>();
        statements.push(brk);
        statements.push(cont);

        let block = StmtKind::Block(statements);
        match block {
            StmtKind::Block(stmts) => {
                assert_eq!(stmts.len(), 2);
                assert!(matches!(stmts[0].kind, StmtKind::Break));
                assert!(matches!(stmts[1].kind, StmtKind::Continue));
            }
            _ => panic!("expected Block"),
        }
    }

    #[test]
    fn program_carries_optional_doc_string() {
        let source = Source::anonymous("\"module doc\"");
        let arena = Arena::new();
        let statements = arena.vec::<&Stmt<'_>>();
        let program = Program::new(Some("module doc"), statements);
        assert_eq!(program.doc, Some("module doc"));
        assert!(program.statements.is_empty());
        let _ = source;
    }
}
