//! Value operation helpers

use crate::bytecode::{BinaryOp, UnaryOp};
use crate::error::VmError;
use snuvi_types::{Rational, Value};
use std::cmp::Ordering;

/// Operator semantics on runtime values
pub(crate) struct ValueOperations;

impl ValueOperations {
    pub(crate) fn unary(op: UnaryOp, value: &Value) -> Result<Value, VmError> {
        match (op, value) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Not, other) => Err(VmError::type_mismatch("'!'", "bool", other)),
            (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(n.checked_neg()?)),
            (UnaryOp::BitNot, Value::Number(n)) => Ok(Value::Number(n.bit_not()?)),
            (UnaryOp::Neg, other) => Err(VmError::type_mismatch("'-'", "number", other)),
            (UnaryOp::BitNot, other) => Err(VmError::type_mismatch("'~'", "number", other)),
        }
    }

    pub(crate) fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, VmError> {
        let result = match op {
            BinaryOp::Add => return Self::add_values(left, right),
            BinaryOp::Eq => return Ok(Value::Bool(left == right)),
            BinaryOp::Ne => return Ok(Value::Bool(left != right)),
            BinaryOp::Lt => return Self::compare(op, left, right, Ordering::is_lt),
            BinaryOp::Le => return Self::compare(op, left, right, Ordering::is_le),
            BinaryOp::Gt => return Self::compare(op, left, right, Ordering::is_gt),
            BinaryOp::Ge => return Self::compare(op, left, right, Ordering::is_ge),

            BinaryOp::Sub => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.checked_sub(&b)?
            }
            BinaryOp::Mul => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.checked_mul(&b)?
            }
            BinaryOp::Div => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.checked_div(&b)?
            }
            BinaryOp::Rem => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.checked_rem(&b)?
            }
            BinaryOp::Shl => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.shl(&b)?
            }
            BinaryOp::Shr => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.shr(&b)?
            }
            BinaryOp::BitAnd => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.bit_and(&b)?
            }
            BinaryOp::BitXor => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.bit_xor(&b)?
            }
            BinaryOp::BitOr => {
                let (a, b) = Self::numbers(op, left, right)?;
                a.bit_or(&b)?
            }
        };
        Ok(Value::Number(result))
    }

    /// Numeric sum, or concatenation of display forms if either side is a
    /// string
    pub(crate) fn add_values(left: &Value, right: &Value) -> Result<Value, VmError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.checked_add(b)?)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            _ => Err(Self::mismatch(BinaryOp::Add, "number or string", left, right)),
        }
    }

    fn compare(
        op: BinaryOp,
        left: &Value,
        right: &Value,
        accept: fn(Ordering) -> bool,
    ) -> Result<Value, VmError> {
        let ordering = match (left, right) {
            (Value::Number(a), Value::Number(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => return Err(Self::mismatch(op, "two numbers or two strings", left, right)),
        };
        Ok(Value::Bool(accept(ordering)))
    }

    fn numbers(op: BinaryOp, left: &Value, right: &Value) -> Result<(Rational, Rational), VmError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => Err(Self::mismatch(op, "number", left, right)),
        }
    }

    /// Reports the first operand that has the wrong type
    fn mismatch(op: BinaryOp, expected: &'static str, left: &Value, right: &Value) -> VmError {
        let culprit = match left {
            Value::Number(_) => right,
            _ => left,
        };
        VmError::type_mismatch(format!("'{}'", op.symbol()), expected, culprit)
    }

    /// Conditions must be booleans
    pub(crate) fn condition(value: &Value, operation: &str) -> Result<bool, VmError> {
        value
            .as_bool()
            .ok_or_else(|| VmError::type_mismatch(operation, "bool", value))
    }
}
