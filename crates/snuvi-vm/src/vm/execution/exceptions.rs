//! Exception handling instruction execution

use crate::bytecode::{jump_target, Op};
use crate::error::VmError;
use crate::vm::frame::Handler;
use crate::vm::result::ExecutionResult;
use crate::vm::Script;
use snuvi_types::Value;

impl Script {
    /// Execute handler installation and removal
    pub(crate) fn execute_exceptions(&mut self, op: &Op) -> Result<ExecutionResult, VmError> {
        match op {
            Op::Try { catch, error_var } => {
                self.handlers.push(Handler {
                    catch_pc: jump_target(self.pc, *catch),
                    error_var: *error_var,
                    stack_depth: self.stack.len(),
                    frame_depth: self.frames.len(),
                    return_depth: self.returns.len(),
                });
                Ok(ExecutionResult::Continue)
            }

            // Protected block finished normally
            Op::Catch(skip) => {
                self.handlers.pop();
                Ok(ExecutionResult::Jump(jump_target(self.pc, *skip)))
            }

            _ => unreachable!("Non-exception op in exception handler"),
        }
    }

    /// Unwind to the innermost handler. Returns false if there is none.
    pub(crate) fn handle_error(&mut self, error: &VmError) -> bool {
        let Some(handler) = self.handlers.pop() else {
            return false;
        };

        self.stack.truncate(handler.stack_depth);
        self.frames.truncate(handler.frame_depth);
        self.returns.truncate(handler.return_depth);
        self.if_state = true;

        if let Some(slot) = handler.error_var {
            if let Err(e) = self.write_slot(slot, Value::String(error.to_string())) {
                tracing::warn!(script = %self.name, error = %e, "cannot bind caught error");
            }
        }

        tracing::debug!(script = %self.name, id = %self.id, error = %error, "error caught");
        self.pc = handler.catch_pc;
        true
    }
}
