//! Call frames and runtime stacks

use crate::bytecode::Slot;
use snuvi_types::Value;

/// Entry of the value stack
///
/// Besides plain values the stack carries assignable handles, produced by
/// `Ref` and `IndexRef` and consumed by assignments.
#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Value(Value),
    Variable(Slot),
    Element { container: Value, index: Vec<Value> },
}

/// Locals of one active user function call
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub function: u32,
    pub locals: Vec<Value>,
}

impl Frame {
    pub fn new(function: u32, locals: usize) -> Self {
        Self {
            function,
            locals: vec![Value::Null; locals],
        }
    }
}

/// Where `return` continues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReturnPoint {
    /// A user function call; pops the frame and optionally pushes the result
    Call { pc: usize, keep: bool },
    /// A `gosub`; no frame involved
    Gosub { pc: usize },
}

/// Active `try` block
#[derive(Debug, Clone, Copy)]
pub(crate) struct Handler {
    pub catch_pc: usize,
    pub error_var: Option<Slot>,
    /// Stack heights when the handler was installed
    pub stack_depth: usize,
    pub frame_depth: usize,
    pub return_depth: usize,
}
