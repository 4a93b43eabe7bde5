use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use nytrix_ast::Stmt;

use super::value::InterpValue;

struct Scope<'a> {
    vars: HashMap<String, InterpValue<'a>>,
    parent: Option<EnvRef<'a>>,
    defers: RefCell<Vec<&'a Stmt<'a>>>,
}

/// A lexical scope chain, shared by reference so a closure can outlive
/// the block that created it (`spec.md` §3.3 "`Lambda`" captures its
/// defining environment).
#[derive(Clone)]
pub struct EnvRef<'a>(Rc<RefCell<Scope<'a>>>);

impl<'a> EnvRef<'a> {
    pub fn root() -> Self {
        EnvRef(Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: None,
            defers: RefCell::new(Vec::new()),
        })))
    }

    pub fn child(&self) -> Self {
        EnvRef(Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: Some(self.clone()),
            defers: RefCell::new(Vec::new()),
        })))
    }

    /// Declares `name` in this scope only, shadowing an outer binding of
    /// the same name (`def`/`mut` semantics, `spec.md` §4.2.2).
    pub fn declare(&self, name: &str, value: InterpValue<'a>) {
        self.0.borrow_mut().vars.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<InterpValue<'a>> {
        let scope = self.0.borrow();
        if let Some(v) = scope.vars.get(name) {
            return Some(v.clone());
        }
        scope.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Assigns to the nearest enclosing binding of `name`, walking up the
    /// chain; returns `false` if no such binding exists anywhere.
    pub fn assign(&self, name: &str, value: InterpValue<'a>) -> bool {
        let mut scope = self.0.borrow_mut();
        if scope.vars.contains_key(name) {
            scope.vars.insert(name.to_string(), value);
            return true;
        }
        match &scope.parent {
            Some(p) => p.assign(name, value),
            None => false,
        }
    }

    /// Registers `body` to run when this scope exits, in declaration order
    /// (`spec.md` §4.4.7). Scoped to `self` directly, not the chain, so a
    /// `defer` inside a nested block runs at that block's own exit rather
    /// than its enclosing function's.
    pub fn push_defer(&self, body: &'a Stmt<'a>) {
        self.0.borrow().defers.borrow_mut().push(body);
    }

    /// Drains this scope's deferred bodies, most recently registered first
    /// — the order they should run in on exit.
    pub fn take_defers(&self) -> Vec<&'a Stmt<'a>> {
        let mut defers = self.0.borrow().defers.borrow_mut();
        let mut taken = std::mem::take(&mut *defers);
        taken.reverse();
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scope_sees_parent_bindings() {
        let root = EnvRef::root();
        root.declare("x", InterpValue::int(1));
        let child = root.child();
        assert!(matches!(child.get("x"), Some(InterpValue::Scalar(_))));
    }

    #[test]
    fn child_declare_shadows_without_mutating_parent() {
        let root = EnvRef::root();
        root.declare("x", InterpValue::int(1));
        let child = root.child();
        child.declare("x", InterpValue::int(2));
        assert_eq!(child.get("x").unwrap().as_scalar().unwrap().as_int(), 2);
        assert_eq!(root.get("x").unwrap().as_scalar().unwrap().as_int(), 1);
    }

    #[test]
    fn assign_walks_up_to_the_declaring_scope() {
        let root = EnvRef::root();
        root.declare("x", InterpValue::int(1));
        let child = root.child();
        assert!(child.assign("x", InterpValue::int(9)));
        assert_eq!(root.get("x").unwrap().as_scalar().unwrap().as_int(), 9);
    }

    #[test]
    fn assign_to_unbound_name_fails() {
        let root = EnvRef::root();
        assert!(!root.assign("missing", InterpValue::int(0)));
    }

    #[test]
    fn take_defers_drains_in_reverse_of_push_order() {
        use nytrix_ast::{Stmt, StmtKind};
        use nytrix_common::{Source, Span};

        let source = Source::anonymous("break; continue;");
        let a = Stmt::new(StmtKind::Break, Span::new(&source, 0, 5));
        let b = Stmt::new(StmtKind::Continue, Span::new(&source, 7, 15));
        let root = EnvRef::root();
        root.push_defer(&a);
        root.push_defer(&b);
        let drained = root.take_defers();
        assert!(matches!(drained[0].kind, StmtKind::Continue));
        assert!(matches!(drained[1].kind, StmtKind::Break));
        assert!(root.take_defers().is_empty());
    }
}
