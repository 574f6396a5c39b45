//! Dynamic values
//!
//! Scalars are copied on assignment. Lists, maps, sets and arrays are shared:
//! assigning one to another variable, or passing it to a function, aliases
//! the same container.

use crate::array::ArrayValue;
use crate::key::Key;
use crate::rational::Rational;
use crate::sync::{shared, Arc, Shared};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Opaque value owned by the host application
#[derive(Clone)]
pub struct HostObject {
    type_name: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        Self {
            type_name: type_name.into(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject({})", self.type_name)
    }
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Rational),
    String(String),
    List(Shared<Vec<Value>>),
    Map(Shared<HashMap<Key, Value>>),
    Set(Shared<HashSet<Key>>),
    Array(Shared<ArrayValue>),
    Host(HostObject),
}

impl Value {
    pub fn new_list(items: Vec<Value>) -> Value {
        Value::List(shared(items))
    }

    pub fn new_map() -> Value {
        Value::Map(shared(HashMap::new()))
    }

    pub fn new_set() -> Value {
        Value::Set(shared(HashSet::new()))
    }

    pub fn new_array(array: ArrayValue) -> Value {
        Value::Array(shared(array))
    }

    /// Name reported by `typeof` and in type errors
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Array(_) => "array",
            Value::Host(h) => h.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Rational> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value aliases a shared container
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::List(_) | Value::Map(_) | Value::Set(_) | Value::Array(_)
        )
    }
}

/// Address of a shared container, used to detect self-references
fn address<T>(container: &Shared<T>) -> usize {
    Arc::as_ptr(container) as *const () as usize
}

/// Structural equality that treats a pair of containers already under
/// comparison as equal, so cyclic containers terminate.
fn eq_guarded(a: &Value, b: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
    let pair = match (a, b) {
        (Value::List(x), Value::List(y)) => (address(x), address(y)),
        (Value::Map(x), Value::Map(y)) => (address(x), address(y)),
        (Value::Array(x), Value::Array(y)) => (address(x), address(y)),
        _ => return scalar_eq(a, b),
    };
    if pair.0 == pair.1 || seen.contains(&pair) {
        return true;
    }

    seen.push(pair);
    let equal = match (a, b) {
        (Value::List(x), Value::List(y)) => {
            let (x, y) = (x.read(), y.read());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| eq_guarded(l, r, seen))
        }
        (Value::Map(x), Value::Map(y)) => {
            let (x, y) = (x.read(), y.read());
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).map_or(false, |r| eq_guarded(l, r, seen)))
        }
        (Value::Array(x), Value::Array(y)) => {
            let (x, y) = (x.read(), y.read());
            x.dims() == y.dims()
                && x.values()
                    .iter()
                    .zip(y.values().iter())
                    .all(|(l, r)| eq_guarded(l, r, seen))
        }
        _ => false,
    };
    seen.pop();
    equal
}

fn scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Set(a), Value::Set(b)) => Arc::ptr_eq(a, b) || *a.read() == *b.read(),
        (Value::Host(a), Value::Host(b)) => a.ptr_eq(b),
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        eq_guarded(self, other, &mut Vec::new())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Rational> for Value {
    fn from(n: Rational) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Rational::from_integer(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Writes `value`, printing a container that is already being printed
/// further up as `[...]` or `{...}`.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, path: &mut Vec<usize>) -> fmt::Result {
    match value {
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) if n.is_integer() => write!(f, "{}", n.numerator()),
        Value::Number(n) => write!(f, "{}", n.to_f64()),
        Value::String(s) => write!(f, "{}", s),
        Value::List(items) => {
            let addr = address(items);
            if path.contains(&addr) {
                return write!(f, "[...]");
            }
            path.push(addr);
            write!(f, "[")?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, item, path)?;
            }
            path.pop();
            write!(f, "]")
        }
        Value::Set(items) => {
            write!(f, "[")?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "]")
        }
        Value::Map(entries) => {
            let addr = address(entries);
            if path.contains(&addr) {
                return write!(f, "{{...}}");
            }
            path.push(addr);
            write!(f, "{{")?;
            for (i, (key, item)) in entries.read().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}=", key)?;
                write_value(f, item, path)?;
            }
            path.pop();
            write!(f, "}}")
        }
        Value::Array(array) => {
            let array = array.read();
            let dims: Vec<String> = array.dims().iter().map(|d| d.to_string()).collect();
            write!(f, "array[{}]", dims.join("x"))
        }
        Value::Host(h) => write!(f, "<{}>", h.type_name()),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::List(_) => write!(f, "List({})", self),
            Value::Map(_) => write!(f, "Map({})", self),
            Value::Set(_) => write!(f, "Set({})", self),
            Value::Array(_) => write!(f, "Array({})", self),
            Value::Host(h) => write!(f, "{:?}", h),
        }
    }
}
