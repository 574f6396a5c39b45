//! Native function registry
//!
//! The compiler resolves call names to numeric ids through the registry; the
//! engine then dispatches by id with a plain vector lookup.

use crate::error::VmError;
use crate::vm::Script;
use snuvi_types::Value;
use std::collections::HashMap;

/// Type signature for native functions
///
/// Receives the calling script and the evaluated arguments. Statement-only
/// functions return `Value::Null`.
pub type NativeFn = fn(&mut Script, &[Value]) -> Result<Value, VmError>;

/// Metadata for a single native function
#[derive(Clone)]
pub struct BuiltinMetadata {
    pub name: String,
    pub func: NativeFn,
    /// Expected argument count (-1 for variadic)
    pub arity: i8,
}

/// Registry of all native functions
pub struct BuiltinRegistry {
    /// Name to index mapping (for compiler)
    name_to_id: HashMap<String, u16>,
    /// Index to function mapping (for the engine)
    functions: Vec<BuiltinMetadata>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            name_to_id: HashMap::new(),
            functions: Vec::new(),
        }
    }

    /// Register a native function and return its id.
    ///
    /// Registering an existing name replaces the implementation and keeps the
    /// id, so hosts can override defaults such as `print`. Returns `None` once
    /// the id space is exhausted.
    pub fn register(&mut self, name: &str, func: NativeFn, arity: i8) -> Option<u16> {
        let metadata = BuiltinMetadata {
            name: name.to_string(),
            func,
            arity,
        };

        if let Some(&id) = self.name_to_id.get(name) {
            self.functions[id as usize] = metadata;
            return Some(id);
        }

        let id = u16::try_from(self.functions.len()).ok()?;
        self.name_to_id.insert(name.to_string(), id);
        self.functions.push(metadata);
        Some(id)
    }

    #[inline]
    pub fn get_fn(&self, id: u16) -> Option<NativeFn> {
        self.functions.get(id as usize).map(|m| m.func)
    }

    #[inline]
    pub fn get_metadata(&self, id: u16) -> Option<&BuiltinMetadata> {
        self.functions.get(id as usize)
    }

    #[inline]
    pub fn get_id(&self, name: &str) -> Option<u16> {
        self.name_to_id.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|m| m.name.as_str())
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}
