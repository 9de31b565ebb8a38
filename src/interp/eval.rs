//! Tree-walking evaluator

use tracing::{debug, trace};

use super::builtins;
use super::env::Environment;
use super::value::{Closure, ErrorKind, Function, Value};

/// Tree-walking interpreter
///
/// Owns the global environment for the lifetime of a session.
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    /// Create an interpreter with every builtin registered
    pub fn new() -> Self {
        let mut env = Environment::new();
        builtins::register(&mut env);
        Interpreter { env }
    }

    /// Evaluate a value against the global environment
    pub fn eval(&mut self, value: Value) -> Value {
        eval(&mut self.env, value)
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce `value` in `env`
pub fn eval(env: &mut Environment, value: Value) -> Value {
    match value {
        Value::Symbol(name) => env.lookup(&name),
        Value::List(items) => eval_list(env, items),
        Value::Number(_) | Value::Error(_) | Value::Deferred(_) | Value::Function(_) => value,
    }
}

/// Evaluate a list as an application
fn eval_list(env: &mut Environment, items: Vec<Value>) -> Value {
    let mut items: Vec<Value> = items.into_iter().map(|item| eval(env, item)).collect();

    if let Some(pos) = items.iter().position(Value::is_error) {
        return items.swap_remove(pos);
    }

    match items.len() {
        0 => return Value::List(items),
        1 => return Value::List(items).take_at(0),
        _ => {}
    }

    let head = items.remove(0);
    match head {
        Value::Function(func) => apply(env, func, items),
        other => Value::error(
            ErrorKind::NotCallable,
            format!(
                "S-Expression starts with incorrect type. Got {}, Expected Function.",
                other.type_name()
            ),
        ),
    }
}

/// Apply a function to already-evaluated arguments
pub fn apply(env: &mut Environment, func: Function, args: Vec<Value>) -> Value {
    match func {
        Function::Builtin(builtin) => {
            trace!(builtin = builtin.name, argc = args.len(), "apply builtin");
            (builtin.func)(env, args)
        }
        Function::Closure(closure) => apply_closure(env, closure, args),
    }
}

fn apply_closure(env: &mut Environment, mut closure: Closure, args: Vec<Value>) -> Value {
    let given = args.len();
    let expected = closure.formals.len();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if closure.formals.is_empty() {
            return Value::error(
                ErrorKind::TooManyArguments,
                format!(
                    "Function passed too many arguments. Got {}, Expected {}.",
                    given, expected
                ),
            );
        }

        let formal = closure.formals.remove(0);
        if formal == "&" {
            if closure.formals.len() != 1 {
                return bad_variadic();
            }
            let rest = closure.formals.remove(0);
            let collected = std::iter::once(arg).chain(args.by_ref()).collect();
            closure.scope.bind_owned(rest, Value::List(collected).defer());
            break;
        }
        closure.scope.bind_owned(formal, arg);
    }

    // Nothing left to collect for a trailing `& rest`
    if closure.formals.first().map(String::as_str) == Some("&") {
        if closure.formals.len() != 2 {
            return bad_variadic();
        }
        let rest = closure.formals.remove(1);
        closure.formals.clear();
        closure.scope.bind_owned(rest, Value::list().defer());
    }

    if !closure.formals.is_empty() {
        trace!(remaining = closure.formals.len(), "partial application");
        return Value::Function(Function::Closure(closure));
    }

    env.push_scope(closure.scope);
    debug!(depth = env.depth(), "enter closure");
    let result = eval(env, *closure.body);
    env.pop_scope();
    result
}

fn bad_variadic() -> Value {
    Value::error(
        ErrorKind::BadArity,
        "Function format invalid. Symbol '&' not followed by single symbol.",
    )
}
