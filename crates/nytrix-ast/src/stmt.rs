use nytrix_common::Span;

use crate::arena::ArenaVec;
use crate::expr::Expr;

/// Byte offsets into the assembled source buffer bracketing a function or
/// module body, so downstream tools (REPL source-printing, doc
/// generation) can slice the original text back out (`spec.md` §4.2.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcRange {
    pub start: usize,
    pub end: usize,
}

impl SrcRange {
    pub fn new(start: usize, end: usize) -> SrcRange {
        SrcRange { start, end }
    }
}

#[derive(Debug, Clone)]
pub struct ImportItem<'a> {
    pub name: &'a str,
    pub alias: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Field<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    pub explicit_align: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct EnumItem<'a> {
    pub name: &'a str,
    pub value: Option<&'a Expr<'a>>,
}

#[derive(Debug, Clone)]
pub struct MatchArmStmt<'a> {
    pub patterns: ArenaVec<'a, &'a Expr<'a>>,
    pub consequent: &'a Stmt<'a>,
}

/// `spec.md` §3.4. `Func`/`Module` record a [`SrcRange`] into the
/// assembled source bundle; every other node's provenance is tracked by
/// the enclosing [`Stmt`]'s `span`.
#[derive(Debug, Clone)]
pub enum StmtKind<'a> {
    Block(ArenaVec<'a, &'a Stmt<'a>>),
    Use {
        module_name: &'a str,
        alias: Option<&'a str>,
        is_local: bool,
        import_all: bool,
        imports: ArenaVec<'a, ImportItem<'a>>,
    },
    /// A single statement may bind multiple names in parallel, e.g.
    /// `def a, b = 1, 2`.
    Var {
        names: ArenaVec<'a, &'a str>,
        types: ArenaVec<'a, Option<&'a str>>,
        exprs: ArenaVec<'a, &'a Expr<'a>>,
        is_decl: bool,
        is_undef: bool,
        is_mut: bool,
        is_destructure: bool,
    },
    ExprStmt(&'a Expr<'a>),
    If {
        test: &'a Expr<'a>,
        then_branch: &'a Stmt<'a>,
        else_branch: Option<&'a Stmt<'a>>,
    },
    While {
        test: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    For {
        iter_var: &'a str,
        iterable: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    Try {
        body: &'a Stmt<'a>,
        error_name: Option<&'a str>,
        handler: &'a Stmt<'a>,
    },
    Func {
        name: &'a str,
        params: ArenaVec<'a, crate::expr::Param<'a>>,
        return_type: Option<&'a str>,
        body: Option<&'a Stmt<'a>>,
        doc: Option<&'a str>,
        variadic: bool,
        attributes: ArenaVec<'a, &'a str>,
        src_range: SrcRange,
    },
    Extern {
        name: &'a str,
        params: ArenaVec<'a, crate::expr::Param<'a>>,
        return_type: Option<&'a str>,
        link_name: Option<&'a str>,
        variadic: bool,
    },
    Return(Option<&'a Expr<'a>>),
    Break,
    Continue,
    Label(&'a str),
    Goto(&'a str),
    Defer(&'a Stmt<'a>),
    Struct {
        name: &'a str,
        fields: ArenaVec<'a, Field<'a>>,
        align_override: Option<u32>,
        pack: bool,
    },
    Layout {
        name: &'a str,
        fields: ArenaVec<'a, Field<'a>>,
        align_override: Option<u32>,
        pack: bool,
    },
    Enum {
        name: &'a str,
        items: ArenaVec<'a, EnumItem<'a>>,
    },
    Match {
        test: &'a Expr<'a>,
        arms: ArenaVec<'a, MatchArmStmt<'a>>,
        default: Option<&'a Stmt<'a>>,
    },
    Module {
        name: &'a str,
        body: &'a Stmt<'a>,
        export_all: bool,
        src_range: SrcRange,
    },
    Export(ArenaVec<'a, &'a str>),
    /// Generic `name { ... }` or `name(args) { ... }` macro invocation.
    Macro {
        name: &'a str,
        args: ArenaVec<'a, &'a Expr<'a>>,
        body: &'a Stmt<'a>,
    },
}

#[derive(Debug, Clone)]
pub struct Stmt<'a> {
    pub kind: StmtKind<'a>,
    pub span: Span,
}

impl<'a> Stmt<'a> {
    pub fn new(kind: StmtKind<'a>, span: Span) -> Stmt<'a> {
        Stmt { kind, span }
    }
}
