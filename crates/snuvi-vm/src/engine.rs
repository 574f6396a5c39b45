//! Shared, immutable context of all scripts of one host

use crate::builtins::{create_builtin_registry, registry::BuiltinRegistry};
use crate::bytecode::Program;
use crate::compiler::compile_with;
use crate::config::EngineConfig;
use crate::error::CompileError;
use crate::host::{Logger, ManualScheduler, Scheduler, SharedVariables, TracingLogger};
use snuvi_lexer::{NoImports, SourceLoader};
use std::sync::Arc;

/// Native catalog, host interfaces and configuration
///
/// Built once and handed to scripts behind an `Arc`.
pub struct Engine {
    registry: BuiltinRegistry,
    logger: Arc<dyn Logger>,
    scheduler: Arc<dyn Scheduler>,
    shared: SharedVariables,
    config: EngineConfig,
    loader: Box<dyn SourceLoader + Send + Sync>,
}

impl Engine {
    /// Engine with the standard natives, `tracing` output, a manual
    /// scheduler and imports disabled
    pub fn new() -> Self {
        Self {
            registry: create_builtin_registry(),
            logger: Arc::new(TracingLogger),
            scheduler: Arc::new(ManualScheduler::new()),
            shared: SharedVariables::new(),
            config: EngineConfig::default(),
            loader: Box::new(NoImports),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_loader(mut self, loader: impl SourceLoader + Send + Sync + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_registry(mut self, registry: BuiltinRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add or override natives before the engine is shared
    pub fn registry_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.registry
    }

    pub fn registry(&self) -> &BuiltinRegistry {
        &self.registry
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn shared(&self) -> &SharedVariables {
        &self.shared
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compile a source against this engine's natives and loader
    pub fn compile(&self, name: &str, source: &str) -> Result<Program, CompileError> {
        compile_with(name, source, self.loader.as_ref(), &self.registry)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
