//! Resumable stack machine
//!
//! A [`Script`] owns all mutable state of one execution of a [`Program`]:
//! program counter, value stack, globals, call frames and handler stack.
//! [`Script::run`] executes until the script terminates, waits for an event,
//! sleeps, or uses up its time quantum; calling it again continues exactly
//! where it stopped.

use crate::bytecode::{Instruction, Op, Program, Slot};
use crate::engine::Engine;
use crate::error::VmError;
use crate::host::{LogEntry, LogLevel, ScriptResource};
use snuvi_types::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Module structure
mod execution;
mod frame;
mod ops;
mod result;
mod state;

// Re-export public types
pub use state::{ScriptId, ScriptState};

// Internal imports
use frame::{Frame, Handler, Operand, ReturnPoint};
use result::ExecutionResult;

/// One execution of a compiled program
pub struct Script {
    engine: Arc<Engine>,
    program: Arc<Program>,
    name: String,
    id: ScriptId,
    state: ScriptState,

    /// Index of the next instruction
    pub(crate) pc: usize,
    pub(crate) stack: Vec<Operand>,
    pub(crate) globals: Vec<Value>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) returns: Vec<ReturnPoint>,
    pub(crate) handlers: Vec<Handler>,

    /// Whether the last `if`/`elseif` branch was taken
    pub(crate) if_state: bool,

    events: HashSet<String>,
    resources: Vec<Box<dyn ScriptResource>>,
    failure: Option<VmError>,
}

impl Script {
    pub fn new(
        engine: Arc<Engine>,
        program: Arc<Program>,
        name: impl Into<String>,
        id: ScriptId,
    ) -> Self {
        let globals = vec![Value::Null; program.globals.len()];
        Self {
            engine,
            program,
            name: name.into(),
            id,
            state: ScriptState::Running,
            pc: 0,
            stack: Vec::with_capacity(64),
            globals,
            frames: Vec::new(),
            returns: Vec::new(),
            handlers: Vec::new(),
            if_state: true,
            events: HashSet::new(),
            resources: Vec::new(),
            failure: None,
        }
    }

    // ===== Accessors =====

    pub fn id(&self) -> ScriptId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ScriptState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ScriptState::Terminated
    }

    /// The uncaught error that terminated the script, if any
    pub fn failure(&self) -> Option<&VmError> {
        self.failure.as_ref()
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// Entries currently on the value stack
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Active user function calls
    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    pub fn get_global(&self, name: &str) -> Option<Value> {
        let slot = self.program.global_slot(name)?;
        self.globals.get(slot).cloned()
    }

    /// Set a global the program refers to. Returns false if the program
    /// never mentions `name`.
    pub fn set_global(&mut self, name: &str, value: Value) -> bool {
        match self.program.global_slot(name) {
            Some(slot) => {
                self.globals[slot] = value;
                true
            }
            None => false,
        }
    }

    pub fn is_event_loaded(&self, event: &str) -> bool {
        self.events.contains(event)
    }

    /// Whether firing `event` should resume this script
    pub fn wants_event(&self, event: &str) -> bool {
        self.state == ScriptState::Waiting && self.is_event_loaded(event)
    }

    /// Hand a host resource to the script; it is closed on termination.
    pub fn add_resource(&mut self, resource: Box<dyn ScriptResource>) {
        self.resources.push(resource);
    }

    // ===== Execution =====

    /// Execute until the script terminates or suspends.
    ///
    /// Does nothing on a terminated script.
    pub fn run(&mut self) {
        if self.state == ScriptState::Terminated {
            return;
        }
        self.state = ScriptState::Running;
        tracing::trace!(script = %self.name, id = %self.id, pc = self.pc, "running");

        let program = Arc::clone(&self.program);
        let (quantum, interval, resume_delay) = {
            let config = self.engine.config();
            (
                Duration::from_micros(config.quantum_micros),
                config.check_interval.max(1),
                config.quantum_resume_delay,
            )
        };
        let started = Instant::now();
        let mut executed: u32 = 0;

        while self.state == ScriptState::Running {
            let Some(instruction) = program.code.get(self.pc) else {
                self.finish();
                break;
            };

            match self.execute_instruction(instruction) {
                Ok(ExecutionResult::Continue) => self.pc += 1,
                Ok(ExecutionResult::Jump(target)) => self.pc = target,
                Ok(ExecutionResult::Suspend) => self.pc += 1,
                Ok(ExecutionResult::Halt) => self.finish(),
                Ok(ExecutionResult::Terminate) => self.terminate_now(),
                Err(error) => self.raise(error, instruction),
            }

            executed += 1;
            if executed >= interval {
                executed = 0;
                if self.state == ScriptState::Running && started.elapsed() >= quantum {
                    tracing::trace!(script = %self.name, id = %self.id, "quantum expired");
                    self.hold(resume_delay);
                }
            }
        }
    }

    /// Stop the script from the host side
    pub fn terminate(&mut self) {
        if self.state != ScriptState::Terminated {
            self.terminate_now();
        }
    }

    /// Execute a single instruction
    fn execute_instruction(
        &mut self,
        instruction: &Instruction,
    ) -> Result<ExecutionResult, VmError> {
        let operands = self.pop_operands(instruction.arity)?;
        let op = &instruction.op;

        match op {
            // Variables and assignment
            Op::Push(_)
            | Op::Load(_)
            | Op::Ref(_)
            | Op::Index
            | Op::IndexRef
            | Op::Assign { .. }
            | Op::Step { .. }
            | Op::Pop => self.execute_variables(op, operands),

            // Operators
            Op::Unary(_) | Op::Binary(_) | Op::And(_) | Op::Or(_) | Op::Truthy => {
                self.execute_operators(op, operands)
            }

            // Control flow
            Op::Jump(_)
            | Op::If(_)
            | Op::ElseIf(_)
            | Op::Else(_)
            | Op::EndIf
            | Op::While(_)
            | Op::Wend(_)
            | Op::For { .. }
            | Op::Next { .. }
            | Op::Break { .. }
            | Op::Continue { .. } => self.execute_control(op, operands),

            // Functions and calls
            Op::Function { .. } | Op::Call { .. } | Op::Return { .. } => {
                self.execute_functions(op, operands)
            }

            // Exceptions
            Op::Try { .. } | Op::Catch(_) => self.execute_exceptions(op),
        }
    }

    // ===== Lifecycle helpers =====

    pub(crate) fn hold(&mut self, delay: u64) {
        self.state = ScriptState::Holded;
        self.engine.scheduler().schedule(self.id, delay);
    }

    /// Normal completion; leftover operands mean an unbalanced instruction
    fn finish(&mut self) {
        if !self.stack.is_empty() {
            self.log(
                LogEntry::new(
                    LogLevel::Warn,
                    format!("{} value(s) left on the stack", self.stack.len()),
                )
                .with_function(self.current_function()),
            );
        }
        self.terminate_now();
    }

    fn terminate_now(&mut self) {
        self.state = ScriptState::Terminated;
        self.pc = self.program.code.len();
        self.stack.clear();
        self.frames.clear();
        self.returns.clear();
        self.handlers.clear();

        for mut resource in std::mem::take(&mut self.resources) {
            if !resource.is_closed() {
                let message = format!("resource '{}' was not closed", resource.name());
                self.log(LogEntry::new(LogLevel::Warn, message));
                resource.close();
            }
        }
        tracing::debug!(script = %self.name, id = %self.id, "terminated");
    }

    /// Route an error to the innermost handler, or terminate
    fn raise(&mut self, error: VmError, instruction: &Instruction) {
        if self.handle_error(&error) {
            return;
        }

        let location = self.program.location(instruction.line);
        self.log(
            LogEntry::new(LogLevel::Error, "uncaught runtime error")
                .with_error(&error)
                .with_function(self.current_function())
                .with_location(location),
        );
        self.failure = Some(error);
        self.terminate_now();
    }

    /// Log through the engine's logger with this script's identity attached
    pub(crate) fn log(&self, entry: LogEntry) {
        let entry = entry.with_script(&self.name, Some(self.id));
        self.engine.logger().log(entry);
    }

    fn current_function(&self) -> Option<&str> {
        let frame = self.frames.last()?;
        self.program
            .functions
            .get(frame.function as usize)
            .map(|f| f.name.as_str())
    }

    // ===== Stack helpers =====

    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(Operand::Value(value));
    }

    fn pop_operands(&mut self, arity: u8) -> Result<Vec<Operand>, VmError> {
        let count = arity as usize;
        if self.stack.len() < count {
            return Err(VmError::InvalidOperand(format!(
                "stack underflow at instruction {}",
                self.pc
            )));
        }
        Ok(self.stack.split_off(self.stack.len() - count))
    }

    /// The value an operand stands for
    pub(crate) fn resolve(&self, operand: Operand) -> Result<Value, VmError> {
        match operand {
            Operand::Value(value) => Ok(value),
            Operand::Variable(slot) => self.read_slot(slot),
            Operand::Element { container, index } => Self::read_element(&container, &index),
        }
    }

    pub(crate) fn resolve_all(&self, operands: Vec<Operand>) -> Result<Vec<Value>, VmError> {
        operands.into_iter().map(|o| self.resolve(o)).collect()
    }

    pub(crate) fn read_slot(&self, slot: Slot) -> Result<Value, VmError> {
        let cell = match slot {
            Slot::Global(i) => self.globals.get(i as usize),
            Slot::Local(i) => self.frames.last().and_then(|f| f.locals.get(i as usize)),
        };
        cell.cloned()
            .ok_or_else(|| VmError::InvalidOperand(format!("no variable in slot {}", slot)))
    }

    pub(crate) fn write_slot(&mut self, slot: Slot, value: Value) -> Result<(), VmError> {
        let cell = match slot {
            Slot::Global(i) => self.globals.get_mut(i as usize),
            Slot::Local(i) => self
                .frames
                .last_mut()
                .and_then(|f| f.locals.get_mut(i as usize)),
        };
        match cell {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(VmError::InvalidOperand(format!(
                "no variable in slot {}",
                slot
            ))),
        }
    }
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Script")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("stack", &self.stack.len())
            .field("frames", &self.frames.len())
            .finish()
    }
}
