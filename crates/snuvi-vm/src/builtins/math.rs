//! Math functions
//!
//! Everything stays exact where the result is rational; roots and powers
//! without an exact result fall back to a scaled float approximation.

use super::args;
use crate::error::VmError;
use crate::vm::Script;
use snuvi_types::{Rational, Value, E, PI};

pub fn vm_abs(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(args::number(args, 0, "math.abs")?.abs()?))
}

pub fn vm_floor(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(args::number(args, 0, "math.floor")?.floor()))
}

pub fn vm_ceil(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(args::number(args, 0, "math.ceil")?.ceil()))
}

pub fn vm_round(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(args::number(args, 0, "math.round")?.round()))
}

pub fn vm_sqrt(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(args::number(args, 0, "math.sqrt")?.sqrt()?))
}

pub fn vm_root(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::number(args, 0, "math.root")?;
    let degree = args::integer(args, 1, "math.root")?;
    Ok(Value::Number(value.root(degree)?))
}

pub fn vm_pow(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let base = args::number(args, 0, "math.pow")?;
    let exponent = args::number(args, 1, "math.pow")?;
    Ok(Value::Number(base.pow(&exponent)?))
}

pub fn vm_min(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let a = args::number(args, 0, "math.min")?;
    let b = args::number(args, 1, "math.min")?;
    Ok(Value::Number(a.min(b)))
}

pub fn vm_max(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let a = args::number(args, 0, "math.max")?;
    let b = args::number(args, 1, "math.max")?;
    Ok(Value::Number(a.max(b)))
}

pub fn vm_pi(_script: &mut Script, _args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(*PI))
}

pub fn vm_e(_script: &mut Script, _args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::Number(*E))
}

/// Replace a fraction by its float approximation
pub fn vm_todouble(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::number(args, 0, "math.todouble")?;
    Ok(Value::Number(Rational::from_f64(value.to_f64())?))
}

// ===== Bits =====

pub fn vm_bit_test(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::number(args, 0, "bit.test")?;
    let index = args::number(args, 1, "bit.test")?;
    Ok(Value::Bool(value.bit_test(&index)?))
}

pub fn vm_bit_set(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::number(args, 0, "bit.set")?;
    let index = args::number(args, 1, "bit.set")?;
    Ok(Value::Number(value.bit_set(&index)?))
}

pub fn vm_bit_clear(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::number(args, 0, "bit.clear")?;
    let index = args::number(args, 1, "bit.clear")?;
    Ok(Value::Number(value.bit_clear(&index)?))
}
