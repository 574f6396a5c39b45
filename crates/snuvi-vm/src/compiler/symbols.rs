//! Symbol tables for variable slots
//!
//! Variables are created lazily: the first reference to a name defines its
//! slot. Globals live in one table per program, locals in one table per
//! function.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    /// Variable name → slot mapping
    slots: HashMap<String, u32>,
    /// Slot → name, in definition order
    names: Vec<String>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Slot of `name`, defining it on first use
    pub(crate) fn resolve(&mut self, name: &str) -> u32 {
        if let Some(&slot) = self.slots.get(name) {
            return slot;
        }
        let slot = self.names.len() as u32;
        self.slots.insert(name.to_string(), slot);
        self.names.push(name.to_string());
        slot
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn into_names(self) -> Vec<String> {
        self.names
    }
}
