use crate::error::BackendError;

use super::value::InterpValue;

/// Non-local control transfer the tree-walker threads through `eval_*`
/// via `Result`'s error channel — `return`/`break`/`continue` all need to
/// unwind past an arbitrary number of enclosing expression evaluations
/// without the caller needing a fallible signature for the common case.
pub enum Signal<'a> {
    Return(InterpValue<'a>),
    Break,
    Continue,
    /// A `panic()` call that found no enclosing `try`/`catch` frame to
    /// land in (`spec.md` §4.4.7) — propagated up to `run_jit`'s caller,
    /// mirroring the original's "uncaught panic aborts the process."
    Panic(InterpValue<'a>),
    Error(BackendError),
}

pub type Flow<'a, T> = Result<T, Signal<'a>>;

impl<'a> From<BackendError> for Signal<'a> {
    fn from(e: BackendError) -> Self {
        Signal::Error(e)
    }
}
