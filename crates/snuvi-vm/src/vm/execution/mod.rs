//! Instruction execution handlers

mod control;
mod exceptions;
mod functions;
mod intrinsics;
mod operators;
mod variables;

use crate::error::VmError;
use crate::vm::frame::Operand;
use snuvi_types::{Rational, Value};

/// The single operand of a unary instruction
pub(super) fn single(operands: Vec<Operand>) -> Result<Operand, VmError> {
    operands
        .into_iter()
        .next()
        .ok_or_else(|| VmError::InvalidOperand("missing operand".into()))
}

/// Both operands of a binary instruction, in push order
pub(super) fn pair(operands: Vec<Operand>) -> Result<(Operand, Operand), VmError> {
    let mut iter = operands.into_iter();
    match (iter.next(), iter.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(VmError::InvalidOperand("expected two operands".into())),
    }
}

pub(super) fn number(value: &Value, operation: &str) -> Result<Rational, VmError> {
    value
        .as_number()
        .ok_or_else(|| VmError::type_mismatch(operation, "number", value))
}
