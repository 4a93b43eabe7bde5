//! The Nytrix tagged-value runtime: the ABI every compiled program and the
//! standard library link against. Deliberately low-level — this crate has
//! no notion of modules, parsing, or compilation; it is the load-bearing
//! slab underneath [`nytrix_backend`] and [`nytrix_pipeline`].

pub mod arith;
pub mod defer;
pub mod dynlink;
pub mod ffi;
pub mod float;
pub mod heap;
pub mod memory;
pub mod panic;
pub mod runtime;
pub mod strings;
pub mod symbols;
pub mod threads;
pub mod value;

pub use runtime::Runtime;
pub use value::{Tag, Value};
