//! Control flow instruction execution

use super::{number, pair, single};
use crate::bytecode::{jump_target, Op};
use crate::error::VmError;
use crate::vm::frame::Operand;
use crate::vm::ops::ValueOperations;
use crate::vm::result::ExecutionResult;
use crate::vm::Script;
use snuvi_types::{Rational, Value};

/// Whether a counting loop at `current` has not passed `end`
fn in_range(current: Rational, end: Rational, step: Rational) -> bool {
    if step.is_negative() {
        current >= end
    } else {
        current <= end
    }
}

impl Script {
    /// Execute jumps, branches and loops
    pub(crate) fn execute_control(
        &mut self,
        op: &Op,
        operands: Vec<Operand>,
    ) -> Result<ExecutionResult, VmError> {
        let pc = self.pc;

        match op {
            Op::Jump(offset) | Op::Wend(offset) => {
                Ok(ExecutionResult::Jump(jump_target(pc, *offset)))
            }

            Op::If(offset) => {
                let value = self.resolve(single(operands)?)?;
                if ValueOperations::condition(&value, "if")? {
                    Ok(ExecutionResult::Continue)
                } else {
                    self.if_state = false;
                    Ok(ExecutionResult::Jump(jump_target(pc, *offset)))
                }
            }

            // Guards: skip when an earlier branch of the chain ran
            Op::ElseIf(offset) | Op::Else(offset) => {
                if self.if_state {
                    Ok(ExecutionResult::Jump(jump_target(pc, *offset)))
                } else {
                    Ok(ExecutionResult::Continue)
                }
            }

            Op::EndIf => {
                self.if_state = true;
                Ok(ExecutionResult::Continue)
            }

            Op::While(offset) => {
                let value = self.resolve(single(operands)?)?;
                if ValueOperations::condition(&value, "while")? {
                    Ok(ExecutionResult::Continue)
                } else {
                    Ok(ExecutionResult::Jump(jump_target(pc, *offset)))
                }
            }

            Op::For {
                exit,
                var,
                end,
                step,
            } => {
                let (end_value, step_value) = pair(operands)?;
                let end_value = number(&self.resolve(end_value)?, "for")?;
                let step_value = number(&self.resolve(step_value)?, "for")?;
                if step_value.is_zero() {
                    return Err(VmError::ZeroStep);
                }
                self.write_slot(*end, Value::Number(end_value))?;
                self.write_slot(*step, Value::Number(step_value))?;

                let current = number(&self.read_slot(*var)?, "for")?;
                if in_range(current, end_value, step_value) {
                    Ok(ExecutionResult::Continue)
                } else {
                    Ok(ExecutionResult::Jump(jump_target(pc, *exit)))
                }
            }

            Op::Next {
                body,
                var,
                end,
                step,
            } => {
                let end_value = number(&self.read_slot(*end)?, "for")?;
                let step_value = number(&self.read_slot(*step)?, "for")?;
                let current = number(&self.read_slot(*var)?, "for")?.checked_add(&step_value)?;
                self.write_slot(*var, Value::Number(current))?;

                if in_range(current, end_value, step_value) {
                    Ok(ExecutionResult::Jump(jump_target(pc, *body)))
                } else {
                    Ok(ExecutionResult::Continue)
                }
            }

            Op::Break { offset, handlers } | Op::Continue { offset, handlers } => {
                let keep = self.handlers.len().saturating_sub(*handlers as usize);
                self.handlers.truncate(keep);
                Ok(ExecutionResult::Jump(jump_target(pc, *offset)))
            }

            _ => unreachable!("Non-control op in control handler"),
        }
    }
}
