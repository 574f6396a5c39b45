//! Execution result types

/// Result of instruction execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionResult {
    /// Continue with the next instruction
    Continue,
    /// Continue at an absolute instruction index
    Jump(usize),
    /// Leave the run loop; the state was already changed
    Suspend,
    /// Normal end of the script
    Halt,
    /// `term()`: stop at once, pending operands are discarded
    Terminate,
}
