use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("undefined name '{0}'")]
    UndefinedName(String),

    #[error("'{0}' is not callable")]
    NotCallable(String),

    #[error("wrong number of arguments to '{name}': expected {expected}, got {got}")]
    Arity { name: String, expected: usize, got: usize },

    #[error("{0}")]
    Runtime(String),

    #[error("control flow escaped its enclosing construct: {0}")]
    MisplacedControlFlow(&'static str),

    #[error("backend does not support this operation: {0}")]
    Unsupported(&'static str),

    #[error("link driver failed: {0}")]
    Link(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
