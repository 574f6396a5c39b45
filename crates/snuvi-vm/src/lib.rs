//! Snuvi Virtual Machine
//!
//! This crate compiles Snuvi source into a flat instruction array and runs
//! it on a cooperative, resumable stack machine. Scripts share one
//! [`Engine`] (native catalog, logger, scheduler, configuration) and yield
//! control back to the host on `wait()`, `sleep()` or when their time
//! quantum runs out.
//!
//! # Modules
//!
//! - `compiler`: one-pass tokens to bytecode compiler
//! - `bytecode`: instruction array format (serializable)
//! - `vm`: script state and the execution loop
//! - `builtins`: native function registry and default catalog
//! - `host`: logger, scheduler, resources and shared variables
//! - `manager`: many scripts, events and resumption
//! - `error`: error types for compiler and VM
//!
//! # Example
//!
//! ```
//! use snuvi_vm::{Engine, ScriptManager, Value};
//! use std::sync::Arc;
//!
//! let mut manager = ScriptManager::new(Arc::new(Engine::new()));
//! let id = manager.start("demo", "a = 1; while (a < 10) { a *= 2; }").unwrap();
//! let script = manager.get(id).unwrap();
//! assert!(script.is_terminated());
//! assert_eq!(script.get_global("a"), Some(Value::from(16)));
//! assert_eq!(manager.reap(), vec![id]);
//! ```

#![allow(clippy::result_large_err)]

pub mod builtins;
pub mod bytecode;
pub mod bytecode_debug;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod manager;
pub mod vm;

// Re-export main types
pub use builtins::registry::{BuiltinRegistry, NativeFn};
pub use bytecode::Program;
pub use bytecode_debug::disassemble;
pub use compiler::{compile, compile_with, Compiler};
pub use config::{EngineConfig, GotoMode};
pub use engine::Engine;
pub use error::{CompileError, CompileErrorKind, VmError};
pub use host::{
    LogEntry, LogLevel, Logger, ManualScheduler, MemoryLogger, Scheduler, ScriptResource,
    SharedVariables, TaskHandle, TracingLogger,
};
pub use manager::ScriptManager;
pub use snuvi_types::{Rational, Value};
pub use vm::{Script, ScriptId, ScriptState};
