//! Tree-walking interpreter
//!
//! Values, scopes, the evaluator and its builtin library.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod value;

pub use env::{Environment, Scope};
pub use eval::{Interpreter, apply, eval};
pub use value::{Builtin, BuiltinFn, Closure, ErrorKind, Function, LispError, Value};
