//! Lispy: a small Lisp with quoted lists, closures and currying
//!
//! Every runtime value is a [`Value`]. Lists are live code and evaluate as
//! calls; wrapping a list in braces (`{1 2 3}`) defers it, so it can be passed
//! around as data and turned back into code with `eval`. Functions defined
//! with `lambda` are curried: applying one to fewer arguments than it has
//! formals returns a new function waiting for the rest.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Reader → Value → Evaluator (Environment) → Value → Display
//! ```
//!
//! # Example
//!
//! ```
//! let value = lispy::interpret("(def {add} (lambda {x y} {+ x y})) ((add 1) 2)").unwrap();
//! assert_eq!(value.to_string(), "3");
//! ```

pub mod common;
pub mod diagnostics;
pub mod interp;
pub mod lexer;
pub mod reader;
pub mod repl;

pub use diagnostics::{ReadError, SourceFile};
pub use interp::{Environment, ErrorKind, Interpreter, Value};

/// Interpreter version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interpret source code in a fresh interpreter
///
/// Top-level expressions are evaluated in order; the value of the last one is
/// returned (the empty list for empty input). Language errors are values and
/// come back as `Ok(Value::Error(..))`.
pub fn interpret(source: &str) -> miette::Result<Value> {
    let values = reader::read_program(source)?;
    let mut interpreter = Interpreter::new();
    let mut last = Value::list();
    for value in values {
        last = interpreter.eval(value);
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_interpret_empty_source() {
        assert!(interpret("").unwrap().is_unit());
    }
}
