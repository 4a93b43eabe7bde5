use crate::value::Value;

/// A stack of `defer` scopes (`spec.md` §4.4.7: "`defer` blocks are pushed
/// and popped through runtime-exported helpers so that defer semantics can
/// span JIT, AOT, and cross-module boundaries"), analogous to
/// [`crate::panic::PanicStack`]: compiled code opens a scope on block/
/// function entry, pushes a callee for every `defer` it evaluates, and
/// closes the scope — on both normal and panicking exit — to get back the
/// callees to run, most recently deferred first.
#[derive(Debug, Default)]
pub struct DeferStack {
    scopes: Vec<Vec<Value>>,
}

impl DeferStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Adds `callee` to the innermost open scope. A no-op outside any scope,
    /// mirroring [`crate::panic::PanicStack::panic`] targeting an empty
    /// stack being the caller's bug, not this module's to paper over.
    pub fn push(&mut self, callee: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(callee);
        }
    }

    /// Closes the innermost scope and returns its callees in run order
    /// (last deferred, first run).
    pub fn close_scope(&mut self) -> Vec<Value> {
        let mut callees = self.scopes.pop().unwrap_or_default();
        callees.reverse();
        callees
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_scope_runs_most_recently_deferred_first() {
        let mut stack = DeferStack::new();
        stack.open_scope();
        stack.push(Value::from_int(1));
        stack.push(Value::from_int(2));
        assert_eq!(stack.close_scope(), vec![Value::from_int(2), Value::from_int(1)]);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn scopes_nest_independently() {
        let mut stack = DeferStack::new();
        stack.open_scope();
        stack.push(Value::from_int(1));
        stack.open_scope();
        stack.push(Value::from_int(2));
        assert_eq!(stack.close_scope(), vec![Value::from_int(2)]);
        assert_eq!(stack.close_scope(), vec![Value::from_int(1)]);
    }

    #[test]
    fn push_outside_any_scope_is_a_no_op() {
        let mut stack = DeferStack::new();
        stack.push(Value::from_int(1));
        assert_eq!(stack.depth(), 0);
    }
}
