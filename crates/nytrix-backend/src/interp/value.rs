use std::cell::RefCell;
use std::rc::Rc;

use nytrix_ast::{Expr, Param, Stmt};
use nytrix_runtime::Value;

use super::env::EnvRef;

/// The body a closure runs when called. `spec.md` §3.3/§3.4 gives
/// functions two distinct shapes: a top-level `Func` statement carries a
/// full statement body (its own `return`s propagate as
/// [`super::control::Signal::Return`]), while a `Lambda`/`Fn` *expression*
/// is always a single trailing expression — `parse_block_expr_body`
/// desugars a `{ ... }` lambda body down to that at parse time, so the
/// interpreter never needs to walk statements to call one.
pub enum Body<'a> {
    Stmt(&'a Stmt<'a>),
    Expr(&'a Expr<'a>),
}

/// A user-defined function or lambda, closed over the scope it was
/// declared in (`spec.md` §3.3 `Lambda`/`Fn`).
pub struct Closure<'a> {
    pub name: Option<&'a str>,
    pub params: Vec<Param<'a>>,
    pub variadic: bool,
    pub body: Body<'a>,
    pub env: EnvRef<'a>,
}

/// The interpreter's own runtime value representation. Scalars
/// (integers, floats, strings, booleans, `nil`) round-trip through the
/// real tagged [`Value`] so arithmetic and string primitives can be
/// reused verbatim from `nytrix-runtime`; compound and callable values
/// (lists, tuples, sets, dicts, closures) are kept as native Rust objects
/// behind `Rc` instead of hand-rolling their heap layout a second time —
/// the tree-walker's whole purpose is a fast, simple evaluation path, not
/// byte-for-byte parity with the AOT heap representation an embedder
/// might mmap.
#[derive(Clone)]
pub enum InterpValue<'a> {
    Scalar(Value),
    Closure(Rc<Closure<'a>>),
    /// A resolved extern/native function, tagged by its runtime symbol
    /// name for diagnostics.
    Native(&'a str, usize),
    List(Rc<RefCell<Vec<InterpValue<'a>>>>),
    Tuple(Rc<Vec<InterpValue<'a>>>),
    Set(Rc<RefCell<Vec<InterpValue<'a>>>>),
    Dict(Rc<RefCell<Vec<(InterpValue<'a>, InterpValue<'a>)>>>),
}

impl<'a> InterpValue<'a> {
    pub fn nil() -> Self {
        InterpValue::Scalar(nytrix_runtime::value::NIL)
    }

    pub fn bool(b: bool) -> Self {
        InterpValue::Scalar(Value::from_bool(b))
    }

    pub fn int(n: i64) -> Self {
        InterpValue::Scalar(Value::from_int(n))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            InterpValue::Scalar(v) => v.is_truthy(),
            InterpValue::List(items) => !items.borrow().is_empty(),
            InterpValue::Set(items) => !items.borrow().is_empty(),
            InterpValue::Dict(items) => !items.borrow().is_empty(),
            InterpValue::Tuple(items) => !items.is_empty(),
            InterpValue::Closure(_) | InterpValue::Native(..) => true,
        }
    }

    pub fn as_scalar(&self) -> Option<Value> {
        match self {
            InterpValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            InterpValue::Scalar(_) => "scalar",
            InterpValue::Closure(_) => "function",
            InterpValue::Native(..) => "native function",
            InterpValue::List(_) => "list",
            InterpValue::Tuple(_) => "tuple",
            InterpValue::Set(_) => "set",
            InterpValue::Dict(_) => "dict",
        }
    }
}
