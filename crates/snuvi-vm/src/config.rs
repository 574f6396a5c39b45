//! Engine configuration

use serde::{Deserialize, Serialize};

/// What `goto`/`gosub` do with a label that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GotoMode {
    /// Raise a runtime error
    #[default]
    Strict,
    /// Continue with the next instruction
    Lenient,
}

/// Tunables shared by every script of an engine
///
/// Every field has a default, so hosts can deserialize partial documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget of one `run` call, in microseconds
    pub quantum_micros: u64,
    /// Instructions executed between two clock checks
    pub check_interval: u32,
    pub goto_mode: GotoMode,
    /// Maximum nesting of user function calls
    pub max_call_depth: usize,
    /// Scheduler delay after a quantum yield
    pub quantum_resume_delay: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quantum_micros: 15_000,
            check_interval: 64,
            goto_mode: GotoMode::Strict,
            max_call_depth: 512,
            quantum_resume_delay: 0,
        }
    }
}
