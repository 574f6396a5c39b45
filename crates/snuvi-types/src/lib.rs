//! Core value types of the Snuvi scripting language
//!
//! - [`Rational`]: exact fractions, the default number type
//! - [`Value`]: the dynamically typed value of a script variable
//! - [`ArrayValue`]: dense multi-dimensional arrays
//! - [`sync`]: shared-ownership aliases used across the workspace

pub mod array;
pub mod error;
pub mod key;
pub mod rational;
pub mod sync;
pub mod value;

// Re-exports
pub use array::ArrayValue;
pub use error::{ArithmeticError, ArrayError};
pub use key::Key;
pub use rational::{Rational, E, PI};
pub use value::{HostObject, Value};
