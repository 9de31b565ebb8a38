//! Runtime values for the interpreter

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use super::env::{Environment, Scope};

/// Signature of a host-provided primitive
pub type BuiltinFn = fn(&mut Environment, Vec<Value>) -> Value;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Number(i64),
    /// Error raised during evaluation
    Error(LispError),
    /// Name resolved against an environment
    Symbol(String),
    /// Live code: elements are evaluated with the list
    List(Vec<Value>),
    /// Quoted value, never evaluated in place
    Deferred(Box<Value>),
    /// Builtin or closure
    Function(Function),
}

/// Kind of a language-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnboundSymbol,
    BadNumber,
    BadType,
    BadArity,
    TooManyArguments,
    ArityMismatch,
    DivisionByZero,
    NotCallable,
    EmptyList,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnboundSymbol => "unbound-symbol",
            ErrorKind::BadNumber => "bad-number",
            ErrorKind::BadType => "bad-type",
            ErrorKind::BadArity => "bad-arity",
            ErrorKind::TooManyArguments => "too-many-arguments",
            ErrorKind::ArityMismatch => "arity-mismatch",
            ErrorKind::DivisionByZero => "division-by-zero",
            ErrorKind::NotCallable => "not-callable",
            ErrorKind::EmptyList => "empty-list-operation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error carried as a value
///
/// Errors propagate through evaluation as ordinary results. The first error
/// produced wins; the evaluator never aggregates them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LispError {
    pub kind: ErrorKind,
    pub message: String,
}

impl Diagnostic for LispError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("lispy::{}", self.kind)))
    }
}

/// A callable value
#[derive(Clone)]
pub enum Function {
    Builtin(Builtin),
    Closure(Closure),
}

/// Named host primitive
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

/// User-defined function
///
/// `formals` shrinks as arguments are bound into `scope`, so a partially
/// applied closure carries its own bound arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub formals: Vec<String>,
    pub body: Box<Value>,
    pub scope: Scope,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(b) => write!(f, "{:?}", b),
            Function::Closure(c) => write!(f, "{:?}", c),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Builtin(a), Function::Builtin(b)) => a == b,
            (Function::Closure(a), Function::Closure(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn number(n: i64) -> Self {
        Value::Number(n)
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Value::Error(LispError {
            kind,
            message: message.into(),
        })
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Empty list, the unit value
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    pub fn deferred(value: Value) -> Self {
        Value::Deferred(Box::new(value))
    }

    pub fn builtin(name: &'static str, func: BuiltinFn) -> Self {
        Value::Function(Function::Builtin(Builtin { name, func }))
    }

    /// Closure with a fresh, empty captured scope
    pub fn closure(formals: Vec<String>, body: Value) -> Self {
        Value::Function(Function::Closure(Closure {
            formals,
            body: Box::new(body),
            scope: Scope::new(),
        }))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Error(_) => "Error",
            Value::Symbol(_) => "Symbol",
            Value::List(_) => "S-Expression",
            Value::Deferred(_) => "Q-Expression",
            Value::Function(_) => "Function",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Check for the empty list
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    /// Try to get as integer
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as symbol name
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the error payload
    pub fn as_error(&self) -> Option<&LispError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Items of a list, or of the list inside a deferred value
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            Value::Deferred(inner) => match &**inner {
                Value::List(items) => Some(items),
                _ => None,
            },
            _ => None,
        }
    }

    // ==================== LIST SURGERY ====================
    //
    // Internal to the value model: calling these on a non-list is a defect in
    // the core, never a user-facing condition.

    fn items_mut(&mut self) -> &mut Vec<Value> {
        match self {
            Value::List(items) => items,
            other => panic!("list operation on {}", other.type_name()),
        }
    }

    /// Append `value` to the end of this list
    pub fn append(&mut self, value: Value) -> &mut Self {
        self.items_mut().push(value);
        self
    }

    /// Remove the element at `index`, shifting the rest down
    pub fn remove_at(&mut self, index: usize) -> Value {
        let items = self.items_mut();
        let value = items.remove(index);
        items.shrink_to_fit();
        value
    }

    /// Remove the element at `index` and drop the rest of the list
    pub fn take_at(mut self, index: usize) -> Value {
        self.remove_at(index)
    }

    /// Move every element of `other` onto the end of this list
    pub fn concat(mut self, other: Value) -> Value {
        match other {
            Value::List(rest) => self.items_mut().extend(rest),
            other => panic!("list operation on {}", other.type_name()),
        }
        self
    }

    /// Quote this value
    pub fn defer(self) -> Value {
        Value::deferred(self)
    }

    /// Unquote a deferred value, handing its contents to the caller
    pub fn undefer(self) -> Value {
        match self {
            Value::Deferred(inner) => *inner,
            other => panic!("undefer on {}", other.type_name()),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "(")?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, ")")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Error(e) => write!(f, "Error: {}", e.message),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => write_seq(f, items),
            Value::Deferred(inner) => write!(f, "'{}", inner),
            Value::Function(Function::Builtin(b)) => write!(f, "<builtin {}>", b.name),
            Value::Function(Function::Closure(c)) => {
                write!(f, "(lambda (")?;
                for (i, name) in c.formals.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", name)?;
                }
                write!(f, ") {})", c.body)
            }
        }
    }
}
