//! Bookkeeping for many scripts of one engine

use crate::bytecode::Program;
use crate::engine::Engine;
use crate::error::CompileError;
use crate::host::{LogEntry, LogLevel};
use crate::vm::{Script, ScriptId, ScriptState};
use snuvi_types::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of the global that receives the fired event's name
pub const EVENT_VARIABLE: &str = "event";

/// Starts scripts, routes events and resumes held scripts
pub struct ScriptManager {
    engine: Arc<Engine>,
    scripts: BTreeMap<ScriptId, Script>,
    next_id: u64,
}

impl ScriptManager {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            scripts: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Compile and run a script until it first suspends or ends.
    ///
    /// Compile errors are logged and returned; nothing is started.
    pub fn start(&mut self, name: &str, source: &str) -> Result<ScriptId, CompileError> {
        let program = match self.engine.compile(name, source) {
            Ok(program) => program,
            Err(error) => {
                self.engine.logger().log(
                    LogEntry::new(LogLevel::Error, "compile error")
                        .with_error(&error.kind)
                        .with_script(name, None)
                        .with_location(format!("{}:{}", error.file, error.line.line())),
                );
                return Err(error);
            }
        };
        Ok(self.start_program(name, Arc::new(program)))
    }

    /// Run an already compiled program as a new script
    pub fn start_program(&mut self, name: &str, program: Arc<Program>) -> ScriptId {
        let id = ScriptId(self.next_id);
        self.next_id += 1;

        let mut script = Script::new(Arc::clone(&self.engine), program, name, id);
        tracing::debug!(script = name, %id, "starting script");
        script.run();
        self.scripts.insert(id, script);
        id
    }

    pub fn get(&self, id: ScriptId) -> Option<&Script> {
        self.scripts.get(&id)
    }

    pub fn get_mut(&mut self, id: ScriptId) -> Option<&mut Script> {
        self.scripts.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<ScriptId> {
        self.scripts.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Continue a held script, reaping it if it terminates. Returns false if
    /// `id` is unknown or the script is not held.
    pub fn resume(&mut self, id: ScriptId) -> bool {
        match self.scripts.get_mut(&id) {
            Some(script) if script.state() == ScriptState::Holded => {
                script.run();
                self.reap();
                true
            }
            _ => false,
        }
    }

    pub fn fire_event(&mut self, event: &str) -> usize {
        self.fire_event_with(event, &[])
    }

    /// Resume every waiting script that loaded `event`.
    ///
    /// Each receiver first gets the event name in its `event` global and
    /// then the extra variables. Terminated scripts are reaped afterwards.
    /// Returns how many scripts were resumed.
    pub fn fire_event_with(&mut self, event: &str, variables: &[(&str, Value)]) -> usize {
        let mut resumed = 0;
        for script in self.scripts.values_mut() {
            if !script.wants_event(event) {
                continue;
            }
            script.set_global(EVENT_VARIABLE, Value::from(event));
            for (name, value) in variables {
                script.set_global(name, value.clone());
            }
            script.run();
            resumed += 1;
        }
        tracing::trace!(event, resumed, "event fired");
        self.reap();
        resumed
    }

    /// Stop a script and drop it
    pub fn terminate(&mut self, id: ScriptId) -> bool {
        match self.scripts.remove(&id) {
            Some(mut script) => {
                script.terminate();
                true
            }
            None => false,
        }
    }

    /// Drop terminated scripts, returning their ids
    pub fn reap(&mut self) -> Vec<ScriptId> {
        let done: Vec<ScriptId> = self
            .scripts
            .iter()
            .filter(|(_, s)| s.is_terminated())
            .map(|(id, _)| *id)
            .collect();
        for id in &done {
            self.scripts.remove(id);
        }
        done
    }
}
