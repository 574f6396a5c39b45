//! Operator instruction execution

use super::{pair, single};
use crate::bytecode::{jump_target, Op};
use crate::error::VmError;
use crate::vm::frame::Operand;
use crate::vm::ops::ValueOperations;
use crate::vm::result::ExecutionResult;
use crate::vm::Script;
use snuvi_types::Value;

impl Script {
    /// Execute unary, binary and short-circuit operators
    pub(crate) fn execute_operators(
        &mut self,
        op: &Op,
        operands: Vec<Operand>,
    ) -> Result<ExecutionResult, VmError> {
        match op {
            Op::Unary(unary) => {
                let value = self.resolve(single(operands)?)?;
                self.push(ValueOperations::unary(*unary, &value)?);
            }

            Op::Binary(binary) => {
                let (left, right) = pair(operands)?;
                let left = self.resolve(left)?;
                let right = self.resolve(right)?;
                self.push(ValueOperations::binary(*binary, &left, &right)?);
            }

            Op::And(offset) => {
                let value = self.resolve(single(operands)?)?;
                if !ValueOperations::condition(&value, "'&&'")? {
                    self.push(Value::Bool(false));
                    return Ok(ExecutionResult::Jump(jump_target(self.pc, *offset)));
                }
            }

            Op::Or(offset) => {
                let value = self.resolve(single(operands)?)?;
                if ValueOperations::condition(&value, "'||'")? {
                    self.push(Value::Bool(true));
                    return Ok(ExecutionResult::Jump(jump_target(self.pc, *offset)));
                }
            }

            Op::Truthy => {
                let value = self.resolve(single(operands)?)?;
                let truth = ValueOperations::condition(&value, "logical operator")?;
                self.push(Value::Bool(truth));
            }

            _ => unreachable!("Non-operator op in operator handler"),
        }
        Ok(ExecutionResult::Continue)
    }
}
