//! Engine-level calls: jumps to labels, suspension and event registration

use crate::bytecode::Intrinsic;
use crate::config::GotoMode;
use crate::error::VmError;
use crate::vm::frame::ReturnPoint;
use crate::vm::result::ExecutionResult;
use crate::vm::{Script, ScriptState};
use snuvi_types::Value;

fn string_arg(args: &[Value], operation: &str) -> Result<String, VmError> {
    match args.first() {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(VmError::type_mismatch(operation, "string", other)),
        None => Err(VmError::ArgumentCount {
            function: operation.to_string(),
            expected: 1,
            got: 0,
        }),
    }
}

impl Script {
    pub(crate) fn execute_intrinsic(
        &mut self,
        intrinsic: Intrinsic,
        args: Vec<Value>,
        keep: bool,
    ) -> Result<ExecutionResult, VmError> {
        let result = match intrinsic {
            Intrinsic::Goto | Intrinsic::Gosub => {
                let operation = if intrinsic == Intrinsic::Goto { "goto" } else { "gosub" };
                let label = string_arg(&args, operation)?;

                let Some(target) = self.find_label(&label) else {
                    let mode = self.engine.config().goto_mode;
                    return match mode {
                        GotoMode::Strict => Err(VmError::UnknownLabel(label)),
                        GotoMode::Lenient => {
                            tracing::trace!(script = %self.name, label = %label, "unknown label skipped");
                            if keep {
                                self.push(Value::Null);
                            }
                            Ok(ExecutionResult::Continue)
                        }
                    };
                };

                if intrinsic == Intrinsic::Gosub {
                    self.returns.push(ReturnPoint::Gosub { pc: self.pc + 1 });
                }
                return Ok(ExecutionResult::Jump(target));
            }

            Intrinsic::Wait => {
                if keep {
                    self.push(Value::Null);
                }
                self.state = ScriptState::Waiting;
                tracing::debug!(script = %self.name, id = %self.id, "waiting for events");
                return Ok(ExecutionResult::Suspend);
            }

            Intrinsic::Sleep => {
                let delay = match args.first() {
                    Some(Value::Number(n)) => n.floor().to_integer().unwrap_or(0).max(0) as u64,
                    Some(other) => return Err(VmError::type_mismatch("sleep", "number", other)),
                    None => 0,
                };
                if keep {
                    self.push(Value::Null);
                }
                self.hold(delay);
                return Ok(ExecutionResult::Suspend);
            }

            Intrinsic::Term => return Ok(ExecutionResult::Terminate),

            Intrinsic::EventLoad => {
                let event = string_arg(&args, "event.load")?;
                self.events.insert(event);
                Value::Null
            }

            Intrinsic::EventUnload => {
                let event = string_arg(&args, "event.unload")?;
                self.events.remove(&event);
                Value::Null
            }

            Intrinsic::EventIsLoaded => {
                let event = string_arg(&args, "event.isloaded")?;
                Value::Bool(self.events.contains(&event))
            }
        };

        if keep {
            self.push(result);
        }
        Ok(ExecutionResult::Continue)
    }

    /// Labels of the current function, or the top-level labels
    fn find_label(&self, label: &str) -> Option<usize> {
        let labels = match self.frames.last() {
            Some(frame) => &self.program.functions.get(frame.function as usize)?.labels,
            None => &self.program.labels,
        };
        labels.get(label).copied()
    }
}
