use crate::arena::ArenaVec;
use crate::stmt::Stmt;

/// `spec.md` §3.5. Owns the ordered top-level statements of a parsed
/// (and, after module assembly, fully bundled) source buffer.
#[derive(Debug, Clone)]
pub struct Program<'a> {
    pub doc: Option<&'a str>,
    pub statements: ArenaVec<'a, &'a Stmt<'a>>,
}

impl<'a> Program<'a> {
    pub fn new(doc: Option<&'a str>, statements: ArenaVec<'a, &'a Stmt<'a>>) -> Program<'a> {
        Program { doc, statements }
    }
}
