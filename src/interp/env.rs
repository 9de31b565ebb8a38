//! Scoped variable environment
//!
//! An [`Environment`] is a stack of [`Scope`] frames. The bottom frame is the
//! global scope; a closure call pushes the closure's own frame on top for the
//! duration of the call, which makes the caller's active scope its parent.

use indexmap::IndexMap;

use super::value::{ErrorKind, Value};

/// A single frame of bindings, in definition order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: IndexMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the value bound to `name` in this frame only
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bind a copy of `value` to `name`, replacing any previous binding
    pub fn bind(&mut self, name: &str, value: &Value) {
        match self.bindings.get_mut(name) {
            Some(slot) => *slot = value.clone(),
            None => {
                self.bindings.insert(name.to_string(), value.clone());
            }
        }
    }

    /// Bind without copying, for values the caller hands over
    pub fn bind_owned(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names, in definition order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

/// Chain of scopes, innermost last
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Scope>,
}

impl Environment {
    /// Create an environment holding only an empty global scope
    pub fn new() -> Self {
        Self {
            frames: vec![Scope::new()],
        }
    }

    /// Look `name` up from the innermost scope outward
    ///
    /// Returns a copy of the bound value, or an unbound-symbol error.
    pub fn lookup(&self, name: &str) -> Value {
        self.frames
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
            .unwrap_or_else(|| {
                Value::error(
                    ErrorKind::UnboundSymbol,
                    format!("Unbound symbol '{}'", name),
                )
            })
    }

    /// Bind in the innermost scope
    pub fn bind_local(&mut self, name: &str, value: &Value) {
        self.innermost_mut().bind(name, value);
    }

    /// Bind in the global scope, whatever the current nesting
    pub fn bind_global(&mut self, name: &str, value: &Value) {
        self.global_mut().bind(name, value);
    }

    /// Make `scope` the innermost frame, parented to the current one
    pub fn push_scope(&mut self, scope: Scope) {
        self.frames.push(scope);
    }

    /// Detach and return the innermost frame
    ///
    /// The global scope is never popped.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Number of active frames, global included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn global(&self) -> &Scope {
        &self.frames[0]
    }

    fn global_mut(&mut self) -> &mut Scope {
        &mut self.frames[0]
    }

    fn innermost_mut(&mut self) -> &mut Scope {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_copy() {
        let mut env = Environment::new();
        env.bind_local("x", &Value::number(1));

        let mut got = env.lookup("x");
        got = Value::number(got.as_number().unwrap() + 1);

        assert_eq!(got, Value::number(2));
        assert_eq!(env.lookup("x"), Value::number(1));
    }

    #[test]
    fn test_unbound_symbol() {
        let env = Environment::new();
        match env.lookup("nope") {
            Value::Error(e) => {
                assert_eq!(e.kind, ErrorKind::UnboundSymbol);
                assert_eq!(e.message, "Unbound symbol 'nope'");
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_rebind_replaces_in_place() {
        let mut scope = Scope::new();
        scope.bind("a", &Value::number(1));
        scope.bind("b", &Value::number(2));
        scope.bind("a", &Value::number(3));

        assert_eq!(scope.len(), 2);
        assert_eq!(scope.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(scope.get("a"), Some(&Value::number(3)));
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut env = Environment::new();
        env.bind_local("x", &Value::number(1));

        let mut inner = Scope::new();
        inner.bind("x", &Value::number(2));
        env.push_scope(inner);
        assert_eq!(env.lookup("x"), Value::number(2));

        env.pop_scope();
        assert_eq!(env.lookup("x"), Value::number(1));
    }

    #[test]
    fn test_outer_bindings_visible_from_inner() {
        let mut env = Environment::new();
        env.bind_local("g", &Value::number(10));
        env.push_scope(Scope::new());
        assert_eq!(env.lookup("g"), Value::number(10));
    }

    #[test]
    fn test_bind_global_from_nested_scope() {
        let mut env = Environment::new();
        env.push_scope(Scope::new());
        env.push_scope(Scope::new());

        env.bind_global("y", &Value::number(7));
        env.bind_local("z", &Value::number(8));

        let popped = env.pop_scope().unwrap();
        assert_eq!(popped.get("z"), Some(&Value::number(8)));
        env.pop_scope();

        assert_eq!(env.lookup("y"), Value::number(7));
        assert!(env.lookup("z").is_error());
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut env = Environment::new();
        assert!(env.pop_scope().is_none());
        assert_eq!(env.depth(), 1);
    }
}
