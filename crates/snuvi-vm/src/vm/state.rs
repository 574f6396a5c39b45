//! Script identity and lifecycle state

use std::fmt;

/// Identifies a running script towards the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptId(pub u64);

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a script
///
/// `Running` only while inside [`Script::run`](super::Script::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptState {
    /// Created or woken; `run` may be called
    #[default]
    Running,
    /// Parked by `wait()` until an event it loaded fires
    Waiting,
    /// Parked by `sleep` or the time quantum until the scheduler resumes it
    Holded,
    Terminated,
}
