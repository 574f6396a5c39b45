//! Collection functions
//!
//! Lists, maps and sets are shared by reference: `list.add` on a list stored
//! in two variables is visible through both.

use super::args;
use crate::error::VmError;
use crate::vm::Script;
use snuvi_types::{ArrayValue, Value};

// ===== Lists =====

pub fn vm_list_new(_script: &mut Script, _args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::new_list(Vec::new()))
}

pub fn vm_list_add(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let list = args::list(args, 0, "list.add")?;
    let value = args::any(args, 1, "list.add")?.clone();
    list.write().push(value);
    Ok(Value::Null)
}

pub fn vm_list_get(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let list = args::list(args, 0, "list.get")?;
    let index = args::integer(args, 1, "list.get")?;
    let list = list.read();
    usize::try_from(index)
        .ok()
        .and_then(|i| list.get(i))
        .cloned()
        .ok_or(VmError::IndexOutOfBounds {
            index,
            len: list.len(),
        })
}

pub fn vm_list_size(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let list = args::list(args, 0, "list.size")?;
    let len = list.read().len();
    Ok(Value::from(len as i64))
}

// ===== Maps =====

pub fn vm_map_new(_script: &mut Script, _args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::new_map())
}

pub fn vm_map_put(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let map = args::map(args, 0, "map.put")?;
    let key = args::key(args, 1, "map.put")?;
    let value = args::any(args, 2, "map.put")?.clone();
    map.write().insert(key, value);
    Ok(Value::Null)
}

/// Missing keys yield null
pub fn vm_map_get(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let map = args::map(args, 0, "map.get")?;
    let key = args::key(args, 1, "map.get")?;
    let value = map.read().get(&key).cloned().unwrap_or(Value::Null);
    Ok(value)
}

pub fn vm_map_contains(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let map = args::map(args, 0, "map.contains")?;
    let key = args::key(args, 1, "map.contains")?;
    let found = map.read().contains_key(&key);
    Ok(Value::Bool(found))
}

// ===== Sets =====

pub fn vm_set_new(_script: &mut Script, _args: &[Value]) -> Result<Value, VmError> {
    Ok(Value::new_set())
}

/// Returns whether the element was not present yet
pub fn vm_set_add(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let set = args::set(args, 0, "set.add")?;
    let key = args::key(args, 1, "set.add")?;
    let inserted = set.write().insert(key);
    Ok(Value::Bool(inserted))
}

pub fn vm_set_contains(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let set = args::set(args, 0, "set.contains")?;
    let key = args::key(args, 1, "set.contains")?;
    let found = set.read().contains(&key);
    Ok(Value::Bool(found))
}

// ===== Arrays =====

/// `array.new(d1, d2, ...)`: null-filled array of the given shape
pub fn vm_array_new(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    if args.is_empty() {
        return Err(VmError::ArgumentCount {
            function: "array.new".into(),
            expected: 1,
            got: 0,
        });
    }
    let shape = (0..args.len())
        .map(|i| args::integer(args, i, "array.new"))
        .collect::<Result<Vec<i64>, VmError>>()?;
    Ok(Value::new_array(ArrayValue::new(&shape)?))
}

pub fn vm_array_dims(_script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let array = args::array(args, 0, "array.dims")?;
    let dims = array
        .read()
        .dims()
        .iter()
        .map(|&d| Value::from(d as i64))
        .collect();
    Ok(Value::new_list(dims))
}
