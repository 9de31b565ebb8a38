//! Builtin functions
//!
//! Every builtin takes ownership of its evaluated arguments. On failure the
//! arguments are dropped along with the rejected input and an error value is
//! returned in their place.

use tracing::debug;

use super::env::Environment;
use super::eval::eval;
use super::value::{BuiltinFn, ErrorKind, Value};

/// Return early with the error value when a check fails
macro_rules! check {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => return err,
        }
    };
}

const BUILTINS: &[(&str, BuiltinFn)] = &[
    // Variables and functions
    ("def", def),
    ("=", put),
    ("lambda", lambda),
    ("\\", lambda),
    // Lists
    ("list", list),
    ("head", head),
    ("tail", tail),
    ("init", init),
    ("cons", cons),
    ("len", len),
    ("eval", eval_quoted),
    ("join", join),
    // Arithmetic
    ("+", add),
    ("-", sub),
    ("*", mul),
    ("/", div),
    ("%", rem),
];

/// Register every builtin in the global scope of `env`
pub fn register(env: &mut Environment) {
    for &(name, func) in BUILTINS {
        env.bind_global(name, &Value::builtin(name, func));
    }
    debug!(count = BUILTINS.len(), "registered builtins");
}

// ==================== ARGUMENT CHECKS ====================

fn arity(name: &str, args: &[Value], expected: usize) -> Result<(), Value> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Value::error(
            ErrorKind::BadArity,
            format!(
                "Function '{}' passed incorrect number of arguments. Got {}, Expected {}.",
                name,
                args.len(),
                expected
            ),
        ))
    }
}

fn at_least(name: &str, args: &[Value], min: usize) -> Result<(), Value> {
    if args.len() >= min {
        Ok(())
    } else {
        Err(Value::error(
            ErrorKind::BadArity,
            format!(
                "Function '{}' passed incorrect number of arguments. Got {}, Expected at least {}.",
                name,
                args.len(),
                min
            ),
        ))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Deferred(inner) if !matches!(&**inner, Value::List(_)) => {
            format!("quoted {}", inner.type_name())
        }
        other => other.type_name().to_string(),
    }
}

fn type_error(name: &str, index: usize, got: &Value, expected: &str) -> Value {
    Value::error(
        ErrorKind::BadType,
        format!(
            "Function '{}' passed incorrect type for argument {}. Got {}, Expected {}.",
            name,
            index,
            describe(got),
            expected
        ),
    )
}

/// Unwrap a quoted list argument into its items
fn quoted_items(name: &str, index: usize, arg: Value) -> Result<Vec<Value>, Value> {
    match arg {
        Value::Deferred(inner) => match *inner {
            Value::List(items) => Ok(items),
            other => Err(type_error(
                name,
                index,
                &Value::deferred(other),
                "Q-Expression",
            )),
        },
        other => Err(type_error(name, index, &other, "Q-Expression")),
    }
}

/// The single argument of `name`, which must be a quoted list
fn single_list(name: &str, mut args: Vec<Value>) -> Result<Vec<Value>, Value> {
    arity(name, &args, 1)?;
    quoted_items(name, 0, args.remove(0))
}

fn non_empty(name: &str, items: Vec<Value>) -> Result<Vec<Value>, Value> {
    if items.is_empty() {
        Err(Value::error(
            ErrorKind::EmptyList,
            format!("Function '{}' passed {{}}.", name),
        ))
    } else {
        Ok(items)
    }
}

fn symbols(name: &str, items: Vec<Value>) -> Result<Vec<String>, Value> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Symbol(s) => Ok(s),
            other => Err(Value::error(
                ErrorKind::BadType,
                format!(
                    "Function '{}' cannot define non-symbol. Got {}, Expected Symbol.",
                    name,
                    describe(&other)
                ),
            )),
        })
        .collect()
}

// ==================== LISTS ====================

fn list(_env: &mut Environment, args: Vec<Value>) -> Value {
    Value::List(args).defer()
}

fn head(_env: &mut Environment, args: Vec<Value>) -> Value {
    let items = check!(single_list("head", args).and_then(|items| non_empty("head", items)));
    let first = Value::List(items).take_at(0);
    Value::List(vec![first]).defer()
}

fn tail(_env: &mut Environment, args: Vec<Value>) -> Value {
    let items = check!(single_list("tail", args).and_then(|items| non_empty("tail", items)));
    let mut rest = Value::List(items);
    rest.remove_at(0);
    rest.defer()
}

fn init(_env: &mut Environment, args: Vec<Value>) -> Value {
    let mut items = check!(single_list("init", args).and_then(|items| non_empty("init", items)));
    items.pop();
    Value::List(items).defer()
}

fn cons(_env: &mut Environment, mut args: Vec<Value>) -> Value {
    check!(arity("cons", &args, 2));
    let rest = check!(quoted_items("cons", 1, args.remove(1)));
    let first = args.remove(0);
    Value::List(vec![first]).concat(Value::List(rest)).defer()
}

fn len(_env: &mut Environment, args: Vec<Value>) -> Value {
    let items = check!(single_list("len", args));
    Value::number(items.len() as i64)
}

fn eval_quoted(env: &mut Environment, mut args: Vec<Value>) -> Value {
    check!(arity("eval", &args, 1));
    match args.remove(0) {
        quoted @ Value::Deferred(_) => eval(env, quoted.undefer()),
        other => type_error("eval", 0, &other, "Q-Expression"),
    }
}

fn join(_env: &mut Environment, args: Vec<Value>) -> Value {
    check!(at_least("join", &args, 1));
    if let Some((i, bad)) = args
        .iter()
        .enumerate()
        .find(|(_, arg)| !matches!(arg, Value::Deferred(inner) if matches!(&**inner, Value::List(_))))
    {
        return type_error("join", i, bad, "Q-Expression");
    }

    let mut joined = Value::list();
    for arg in args {
        joined = joined.concat(arg.undefer());
    }
    joined.defer()
}

// ==================== VARIABLES AND FUNCTIONS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Global,
    Local,
}

fn def(env: &mut Environment, args: Vec<Value>) -> Value {
    define(env, "def", Binding::Global, args)
}

fn put(env: &mut Environment, args: Vec<Value>) -> Value {
    define(env, "=", Binding::Local, args)
}

fn define(env: &mut Environment, name: &str, binding: Binding, mut args: Vec<Value>) -> Value {
    check!(at_least(name, &args, 1));
    let names = check!(quoted_items(name, 0, args.remove(0)).and_then(|items| symbols(name, items)));

    if names.len() != args.len() {
        return Value::error(
            ErrorKind::ArityMismatch,
            format!(
                "Function '{}' passed incorrect number of values for symbols. Got {}, Expected {}.",
                name,
                args.len(),
                names.len()
            ),
        );
    }

    for (sym, value) in names.iter().zip(&args) {
        debug!(symbol = %sym, ?binding, "define");
        match binding {
            Binding::Global => env.bind_global(sym, value),
            Binding::Local => env.bind_local(sym, value),
        }
    }
    Value::list()
}

fn lambda(_env: &mut Environment, mut args: Vec<Value>) -> Value {
    check!(arity("lambda", &args, 2));
    let body = check!(quoted_items("lambda", 1, args.remove(1)));
    let formals = check!(
        quoted_items("lambda", 0, args.remove(0)).and_then(|items| symbols("lambda", items))
    );
    Value::closure(formals, Value::List(body))
}

// ==================== ARITHMETIC ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
        }
    }

    fn apply(self, x: i64, y: i64) -> Result<i64, Value> {
        match self {
            ArithOp::Add => Ok(x.wrapping_add(y)),
            ArithOp::Sub => Ok(x.wrapping_sub(y)),
            ArithOp::Mul => Ok(x.wrapping_mul(y)),
            ArithOp::Div | ArithOp::Rem if y == 0 => Err(Value::error(
                ErrorKind::DivisionByZero,
                "Division By Zero.",
            )),
            ArithOp::Div => Ok(x.wrapping_div(y)),
            ArithOp::Rem => Ok(x.wrapping_rem(y)),
        }
    }
}

fn arith(op: ArithOp, args: Vec<Value>) -> Value {
    let name = op.symbol();
    check!(at_least(name, &args, 1));

    let mut nums = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        match arg.as_number() {
            Some(n) => nums.push(n),
            None => {
                return Value::error(
                    ErrorKind::BadNumber,
                    format!(
                        "Function '{}' passed incorrect type for argument {}. Got {}, Expected Number.",
                        name,
                        i,
                        describe(arg)
                    ),
                );
            }
        }
    }

    let (first, rest) = (nums[0], &nums[1..]);
    if op == ArithOp::Sub && rest.is_empty() {
        return Value::number(first.wrapping_neg());
    }

    let mut acc = first;
    for &y in rest {
        acc = check!(op.apply(acc, y));
    }
    Value::number(acc)
}

fn add(_env: &mut Environment, args: Vec<Value>) -> Value {
    arith(ArithOp::Add, args)
}

fn sub(_env: &mut Environment, args: Vec<Value>) -> Value {
    arith(ArithOp::Sub, args)
}

fn mul(_env: &mut Environment, args: Vec<Value>) -> Value {
    arith(ArithOp::Mul, args)
}

fn div(_env: &mut Environment, args: Vec<Value>) -> Value {
    arith(ArithOp::Div, args)
}

fn rem(_env: &mut Environment, args: Vec<Value>) -> Value {
    arith(ArithOp::Rem, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nums(ns: &[i64]) -> Value {
        Value::List(ns.iter().copied().map(Value::number).collect())
    }

    fn kind(v: &Value) -> Option<ErrorKind> {
        v.as_error().map(|e| e.kind)
    }

    #[test]
    fn test_register_binds_every_name() {
        let mut env = Environment::new();
        register(&mut env);
        for (name, _) in BUILTINS {
            assert!(
                matches!(env.lookup(name), Value::Function(_)),
                "{} not bound",
                name
            );
        }
    }

    #[test]
    fn test_head_and_tail() {
        let mut env = Environment::new();
        assert_eq!(head(&mut env, vec![nums(&[1, 2, 3]).defer()]), nums(&[1]).defer());
        assert_eq!(tail(&mut env, vec![nums(&[1, 2, 3]).defer()]), nums(&[2, 3]).defer());
    }

    #[test]
    fn test_head_of_empty() {
        let mut env = Environment::new();
        let v = head(&mut env, vec![Value::list().defer()]);
        assert_eq!(kind(&v), Some(ErrorKind::EmptyList));
        assert_eq!(v.to_string(), "Error: Function 'head' passed {}.");
    }

    #[test]
    fn test_head_arity_and_type() {
        let mut env = Environment::new();
        let v = head(&mut env, vec![nums(&[1]).defer(), nums(&[2]).defer()]);
        assert_eq!(kind(&v), Some(ErrorKind::BadArity));

        let v = head(&mut env, vec![Value::number(1)]);
        assert_eq!(kind(&v), Some(ErrorKind::BadType));
        assert_eq!(
            v.to_string(),
            "Error: Function 'head' passed incorrect type for argument 0. Got Number, Expected Q-Expression."
        );
    }

    #[test]
    fn test_join_rejects_quoted_number() {
        let mut env = Environment::new();
        let v = join(&mut env, vec![nums(&[1]).defer(), Value::number(2).defer()]);
        assert_eq!(kind(&v), Some(ErrorKind::BadType));
        assert!(v.to_string().contains("Got quoted Number"));
    }

    #[test]
    fn test_join_concatenates_in_order() {
        let mut env = Environment::new();
        let v = join(
            &mut env,
            vec![nums(&[1]).defer(), nums(&[]).defer(), nums(&[2, 3]).defer()],
        );
        assert_eq!(v, nums(&[1, 2, 3]).defer());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(arith(ArithOp::Add, vec![Value::number(1), Value::number(2)]), Value::number(3));
        assert_eq!(arith(ArithOp::Sub, vec![Value::number(5)]), Value::number(-5));
        assert_eq!(
            arith(ArithOp::Sub, vec![Value::number(10), Value::number(3), Value::number(2)]),
            Value::number(5)
        );
        assert_eq!(arith(ArithOp::Div, vec![Value::number(10), Value::number(2)]), Value::number(5));
        assert_eq!(arith(ArithOp::Rem, vec![Value::number(10), Value::number(3)]), Value::number(1));
    }

    #[test]
    fn test_division_by_zero() {
        let v = arith(ArithOp::Div, vec![Value::number(10), Value::number(0)]);
        assert_eq!(kind(&v), Some(ErrorKind::DivisionByZero));
        let v = arith(ArithOp::Rem, vec![Value::number(10), Value::number(0)]);
        assert_eq!(kind(&v), Some(ErrorKind::DivisionByZero));
    }

    #[test]
    fn test_non_number_operand() {
        let v = arith(ArithOp::Add, vec![Value::number(1), nums(&[]).defer()]);
        assert_eq!(kind(&v), Some(ErrorKind::BadNumber));
    }

    #[test]
    fn test_overflow_wraps() {
        let v = arith(ArithOp::Div, vec![Value::number(i64::MIN), Value::number(-1)]);
        assert_eq!(v, Value::number(i64::MIN));
    }

    #[test]
    fn test_def_arity_mismatch() {
        let mut env = Environment::new();
        let syms = Value::List(vec![Value::symbol("a"), Value::symbol("b")]).defer();
        let v = def(&mut env, vec![syms, Value::number(1)]);
        assert_eq!(kind(&v), Some(ErrorKind::ArityMismatch));
        assert!(env.lookup("a").is_error());
    }

    #[test]
    fn test_def_rejects_non_symbol() {
        let mut env = Environment::new();
        let v = def(&mut env, vec![nums(&[1]).defer(), Value::number(1)]);
        assert_eq!(kind(&v), Some(ErrorKind::BadType));
    }

    #[test]
    fn test_lambda_builds_closure() {
        let mut env = Environment::new();
        let formals = Value::List(vec![Value::symbol("x")]).defer();
        let body = Value::List(vec![Value::symbol("x")]).defer();
        let f = lambda(&mut env, vec![formals, body]);
        assert_eq!(f.to_string(), "(lambda (x) (x))");
    }

    #[test]
    fn test_cons_len_init() {
        let mut env = Environment::new();
        assert_eq!(
            cons(&mut env, vec![Value::number(0), nums(&[1, 2]).defer()]),
            nums(&[0, 1, 2]).defer()
        );
        assert_eq!(len(&mut env, vec![nums(&[1, 2, 3]).defer()]), Value::number(3));
        assert_eq!(init(&mut env, vec![nums(&[1, 2, 3]).defer()]), nums(&[1, 2]).defer());
    }
}
