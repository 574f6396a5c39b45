//! Synchronization aliases shared by every crate of the workspace.
//!
//! parking_lot locks do not poison, so a script that failed while holding a
//! container lock leaves the container usable for the rest of the host.

pub use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
pub use std::sync::Arc;

/// Alias for the common pattern Arc<RwLock<T>>
pub type Shared<T> = Arc<RwLock<T>>;

/// Helper to create Shared<T> easily
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}
