//! Utility functions
//!
//! - throw: raise a catchable error with a message
//! - typeof: type name of a value
//! - str: display form of a value
//! - len: length of a string or container

use super::args;
use crate::error::VmError;
use crate::vm::Script;
use snuvi_types::Value;

pub fn vm_throw(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let message = args::any(args, 0, "throw")?;
    Err(VmError::Thrown(message.to_string()))
}

pub fn vm_typeof(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::any(args, 0, "typeof")?;
    Ok(Value::String(value.type_name().to_string()))
}

pub fn vm_str(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let value = args::any(args, 0, "str")?;
    Ok(Value::String(value.to_string()))
}

pub fn vm_len(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let len = match args::any(args, 0, "len")? {
        Value::String(s) => s.chars().count(),
        Value::List(list) => list.read().len(),
        Value::Map(map) => map.read().len(),
        Value::Set(set) => set.read().len(),
        Value::Array(array) => array.read().len(),
        other => {
            return Err(VmError::type_mismatch(
                "len",
                "string, list, map, set or array",
                other,
            ))
        }
    };
    Ok(Value::from(len as i64))
}
