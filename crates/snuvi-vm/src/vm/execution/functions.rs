//! Function call instruction execution

use crate::bytecode::{jump_target, CallTarget, Op};
use crate::error::VmError;
use crate::vm::frame::{Frame, Operand, ReturnPoint};
use crate::vm::result::ExecutionResult;
use crate::vm::Script;
use snuvi_types::Value;
use std::sync::Arc;

impl Script {
    /// Execute function markers, calls and returns
    pub(crate) fn execute_functions(
        &mut self,
        op: &Op,
        operands: Vec<Operand>,
    ) -> Result<ExecutionResult, VmError> {
        match op {
            // Bodies are only entered through calls
            Op::Function { skip, .. } => Ok(ExecutionResult::Jump(jump_target(self.pc, *skip))),

            Op::Call { name, target, keep } => {
                let args = self.resolve_all(operands)?;
                match *target {
                    CallTarget::User(index) => self.call_user(index, args, *keep),
                    CallTarget::Native(id) => {
                        let func = self
                            .engine
                            .registry()
                            .get_fn(id)
                            .ok_or_else(|| VmError::UndefinedFunction(name.clone()))?;
                        let result = func(self, &args)?;
                        if *keep {
                            self.push(result);
                        }
                        Ok(ExecutionResult::Continue)
                    }
                    CallTarget::Intrinsic(intrinsic) => {
                        self.execute_intrinsic(intrinsic, args, *keep)
                    }
                    CallTarget::Unresolved => Err(VmError::UndefinedFunction(name.clone())),
                }
            }

            Op::Return { value } => {
                let result = match operands.into_iter().next() {
                    Some(operand) if *value => self.resolve(operand)?,
                    _ => Value::Null,
                };

                let Some(point) = self.returns.pop() else {
                    // `return` outside any call ends the script
                    return Ok(ExecutionResult::Halt);
                };
                let depth = self.returns.len();
                self.handlers.retain(|h| h.return_depth <= depth);

                match point {
                    ReturnPoint::Gosub { pc } => Ok(ExecutionResult::Jump(pc)),
                    ReturnPoint::Call { pc, keep } => {
                        self.frames.pop();
                        if keep {
                            self.push(result);
                        }
                        Ok(ExecutionResult::Jump(pc))
                    }
                }
            }

            _ => unreachable!("Non-function op in function handler"),
        }
    }

    fn call_user(
        &mut self,
        index: u32,
        args: Vec<Value>,
        keep: bool,
    ) -> Result<ExecutionResult, VmError> {
        let max_depth = self.engine.config().max_call_depth;
        if self.frames.len() >= max_depth {
            return Err(VmError::StackOverflow(max_depth));
        }

        let program = Arc::clone(&self.program);
        let info = program
            .functions
            .get(index as usize)
            .ok_or_else(|| VmError::InvalidOperand(format!("no function #{}", index)))?;
        if args.len() != info.params {
            return Err(VmError::ArgumentCount {
                function: info.name.clone(),
                expected: info.params,
                got: args.len(),
            });
        }

        let mut frame = Frame::new(index, info.locals.len().max(info.params));
        for (local, arg) in frame.locals.iter_mut().zip(args) {
            *local = arg;
        }
        self.frames.push(frame);
        self.returns.push(ReturnPoint::Call {
            pc: self.pc + 1,
            keep,
        });

        Ok(ExecutionResult::Jump(info.entry))
    }
}
