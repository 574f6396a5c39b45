//! Compilation context types

use super::symbols::SymbolTable;
use std::collections::HashMap;

/// Loop context for break/continue
#[derive(Debug)]
pub(crate) struct LoopContext {
    /// Break jumps, patched to the loop exit
    pub(crate) breaks: Vec<usize>,

    /// Continue jumps, patched to the loop-step instruction
    pub(crate) continues: Vec<usize>,

    /// `try` nesting depth at loop entry
    pub(crate) try_depth: u32,
}

impl LoopContext {
    pub(crate) fn new(try_depth: u32) -> Self {
        Self {
            breaks: Vec::new(),
            continues: Vec::new(),
            try_depth,
        }
    }
}

/// State of the function body being compiled
#[derive(Debug)]
pub(crate) struct FunctionScope {
    pub(crate) index: u32,
    pub(crate) locals: SymbolTable,
    pub(crate) labels: HashMap<String, usize>,
}

impl FunctionScope {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            index,
            locals: SymbolTable::new(),
            labels: HashMap::new(),
        }
    }
}
