//! Error types for numeric and container operations

use thiserror::Error;

/// Failures of exact rational arithmetic
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("{0} requires an integer operand")]
    NotAnInteger(&'static str),

    #[error("even root of a negative number")]
    NegativeRoot,

    #[error("invalid root degree {0}")]
    InvalidRootDegree(i64),

    #[error("cannot represent {0} as a rational")]
    NotFinite(f64),

    #[error("invalid shift amount {0}")]
    InvalidShift(i64),
}

/// Failures of multi-dimensional array access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("array has {expected} dimension(s), got {got} index value(s)")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("index {index} out of bounds for dimension {dimension} of size {size}")]
    OutOfBounds {
        dimension: usize,
        index: i64,
        size: usize,
    },

    #[error("invalid array shape {0:?}")]
    InvalidShape(Vec<i64>),
}
