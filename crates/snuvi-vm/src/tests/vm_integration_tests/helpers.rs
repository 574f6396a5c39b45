//! Helper functions and common imports for integration tests.

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::host::{LogEntry, LogLevel, ManualScheduler, MemoryLogger};
use crate::manager::ScriptManager;
use crate::vm::{Script, ScriptId};
use snuvi_types::{Rational, Value};
use std::sync::Arc;

/// Engine wired to in-memory logging and a manual clock
pub struct Harness {
    pub engine: Arc<Engine>,
    pub logger: Arc<MemoryLogger>,
    pub scheduler: Arc<ManualScheduler>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let logger = Arc::new(MemoryLogger::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let engine = Engine::new()
            .with_config(config)
            .with_logger(logger.clone())
            .with_scheduler(scheduler.clone());
        Self {
            engine: Arc::new(engine),
            logger,
            scheduler,
        }
    }

    pub fn manager(&self) -> ScriptManager {
        ScriptManager::new(Arc::clone(&self.engine))
    }

    /// Compile and run to the first suspension; panics on compile errors
    pub fn start(&self, source: &str) -> Script {
        let program = self
            .engine
            .compile("test", source)
            .unwrap_or_else(|e| panic!("Compile error: {}", e));
        let mut script = Script::new(Arc::clone(&self.engine), Arc::new(program), "test", ScriptId(1));
        script.run();
        script
    }

    pub fn printed(&self) -> Vec<String> {
        self.logger.messages(LogLevel::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.logger.messages(LogLevel::Warn)
    }

    pub fn errors(&self) -> Vec<LogEntry> {
        self.logger
            .entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Error)
            .collect()
    }
}

/// Run a script that must not fail
pub fn run(source: &str) -> Script {
    let script = Harness::new().start(source);
    if let Some(error) = script.failure() {
        panic!("Runtime error: {}", error);
    }
    script
}

/// Compile and run, mapping both failure kinds to strings
pub fn execute(source: &str) -> Result<Script, String> {
    let harness = Harness::new();
    let program = harness
        .engine
        .compile("test", source)
        .map_err(|e| format!("Compile error: {}", e))?;
    let mut script = Script::new(harness.engine, Arc::new(program), "test", ScriptId(1));
    script.run();
    match script.failure() {
        Some(e) => Err(format!("Runtime error: {}", e)),
        None => Ok(script),
    }
}

pub fn global(script: &Script, name: &str) -> Value {
    script
        .get_global(name)
        .unwrap_or_else(|| panic!("no global '{}'", name))
}

pub fn num(n: i64) -> Value {
    Value::Number(Rational::from_integer(n))
}

pub fn frac(num: i64, den: i64) -> Value {
    Value::Number(Rational::new(num, den).unwrap())
}

pub fn string(s: &str) -> Value {
    Value::String(s.to_string())
}
