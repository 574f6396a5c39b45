//! Argument extraction shared by the natives

use crate::error::VmError;
use snuvi_types::sync::Shared;
use snuvi_types::{ArrayValue, Key, Rational, Value};
use std::collections::{HashMap, HashSet};

fn arg<'a>(args: &'a [Value], index: usize, function: &str) -> Result<&'a Value, VmError> {
    args.get(index).ok_or_else(|| VmError::ArgumentCount {
        function: function.to_string(),
        expected: index + 1,
        got: args.len(),
    })
}

pub(super) fn number(args: &[Value], index: usize, function: &str) -> Result<Rational, VmError> {
    let value = arg(args, index, function)?;
    value
        .as_number()
        .ok_or_else(|| VmError::type_mismatch(function, "number", value))
}

pub(super) fn integer(args: &[Value], index: usize, function: &str) -> Result<i64, VmError> {
    let value = arg(args, index, function)?;
    value
        .as_number()
        .and_then(|n| n.to_integer())
        .ok_or_else(|| VmError::type_mismatch(function, "integer", value))
}

pub(super) fn string<'a>(
    args: &'a [Value],
    index: usize,
    function: &str,
) -> Result<&'a str, VmError> {
    let value = arg(args, index, function)?;
    value
        .as_str()
        .ok_or_else(|| VmError::type_mismatch(function, "string", value))
}

pub(super) fn any<'a>(args: &'a [Value], index: usize, function: &str) -> Result<&'a Value, VmError> {
    arg(args, index, function)
}

pub(super) fn list(
    args: &[Value],
    index: usize,
    function: &str,
) -> Result<Shared<Vec<Value>>, VmError> {
    match arg(args, index, function)? {
        Value::List(list) => Ok(list.clone()),
        other => Err(VmError::type_mismatch(function, "list", other)),
    }
}

pub(super) fn map(
    args: &[Value],
    index: usize,
    function: &str,
) -> Result<Shared<HashMap<Key, Value>>, VmError> {
    match arg(args, index, function)? {
        Value::Map(map) => Ok(map.clone()),
        other => Err(VmError::type_mismatch(function, "map", other)),
    }
}

pub(super) fn set(
    args: &[Value],
    index: usize,
    function: &str,
) -> Result<Shared<HashSet<Key>>, VmError> {
    match arg(args, index, function)? {
        Value::Set(set) => Ok(set.clone()),
        other => Err(VmError::type_mismatch(function, "set", other)),
    }
}

pub(super) fn array(
    args: &[Value],
    index: usize,
    function: &str,
) -> Result<Shared<ArrayValue>, VmError> {
    match arg(args, index, function)? {
        Value::Array(array) => Ok(array.clone()),
        other => Err(VmError::type_mismatch(function, "array", other)),
    }
}

/// Map key or set element
pub(super) fn key(args: &[Value], index: usize, function: &str) -> Result<Key, VmError> {
    let value = arg(args, index, function)?;
    Key::from_value(value).ok_or_else(|| VmError::InvalidKey(value.type_name().to_string()))
}
