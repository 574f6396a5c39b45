//! Host-facing interfaces: logging, scheduling, resources and the
//! cross-script variable table.

use crate::vm::ScriptId;
use parking_lot::{Mutex, RwLock};
use snuvi_types::Value;
use std::collections::HashMap;
use std::fmt;

// ===== Logging =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One diagnostic or script output line
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub error: Option<String>,
    pub function: Option<String>,
    pub script_name: Option<String>,
    pub script_id: Option<ScriptId>,
    /// `file:line`
    pub location: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            error: None,
            function: None,
            script_name: None,
            script_id: None,
            location: None,
        }
    }

    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_function(mut self, function: Option<&str>) -> Self {
        self.function = function.map(str::to_string);
        self
    }

    pub fn with_script(mut self, name: &str, id: Option<ScriptId>) -> Self {
        self.script_name = Some(name.to_string());
        self.script_id = id;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.script_name {
            write!(f, "[{}] ", name)?;
        }
        if let Some(location) = &self.location {
            write!(f, "{}: ", location)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(error) = &self.error {
            write!(f, ": {}", error)?;
        }
        if let Some(function) = &self.function {
            write!(f, " (in {})", function)?;
        }
        Ok(())
    }
}

/// Sink for script output and engine diagnostics
pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);
}

/// Forwards entries to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, entry: LogEntry) {
        let script = entry.script_name.as_deref().unwrap_or("-");
        let id = entry.script_id.map(|id| id.0);
        let location = entry.location.as_deref().unwrap_or("-");
        let function = entry.function.as_deref().unwrap_or("-");
        match entry.level {
            LogLevel::Info => tracing::info!(script, ?id, "{}", entry.message),
            LogLevel::Warn => {
                tracing::warn!(script, ?id, location, function, "{}", entry.message)
            }
            LogLevel::Error => tracing::error!(
                script,
                ?id,
                location,
                function,
                error = entry.error.as_deref().unwrap_or("-"),
                "{}",
                entry.message
            ),
        }
    }
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages of all entries at `level`, oldest first
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        self.entries.lock().push(entry);
    }
}

// ===== Scheduling =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Arranges a later `run` of a held script.
///
/// The only guarantee is "not before `delay`"; the unit is up to the host.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, script: ScriptId, delay: u64) -> TaskHandle;
}

#[derive(Debug, Default)]
struct TaskQueue {
    now: u64,
    next_handle: u64,
    /// (due tick, handle, script)
    tasks: Vec<(u64, TaskHandle, ScriptId)>,
}

/// Deterministic tick-driven scheduler
///
/// Nothing happens until the host calls [`ManualScheduler::advance`] and
/// resumes the returned scripts.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: Mutex<TaskQueue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.queue.lock().now
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().tasks.len()
    }

    /// Move the clock forward and take every task that became due, in due
    /// order (ties keep scheduling order).
    pub fn advance(&self, ticks: u64) -> Vec<ScriptId> {
        let mut queue = self.queue.lock();
        queue.now += ticks;
        let now = queue.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            queue.tasks.drain(..).partition(|(at, _, _)| *at <= now);
        queue.tasks = pending;
        due.sort_by_key(|(at, handle, _)| (*at, handle.0));
        due.into_iter().map(|(_, _, script)| script).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, script: ScriptId, delay: u64) -> TaskHandle {
        let mut queue = self.queue.lock();
        let handle = TaskHandle(queue.next_handle);
        queue.next_handle += 1;
        let due = queue.now + delay;
        queue.tasks.push((due, handle, script));
        handle
    }
}

// ===== Resources =====

/// Host handle owned by a script, closed when the script terminates
pub trait ScriptResource: Send + Sync {
    fn name(&self) -> &str;
    fn is_closed(&self) -> bool;
    fn close(&mut self);
}

// ===== Shared variables =====

/// Name → value table visible to every script of an engine
#[derive(Debug, Default)]
pub struct SharedVariables {
    values: RwLock<HashMap<String, Value>>,
}

impl SharedVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the previous one
    pub fn set(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.write().insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.read().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.read().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.values.write().remove(name)
    }
}
