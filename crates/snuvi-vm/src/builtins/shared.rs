//! Cross-script variables

use super::args;
use crate::error::VmError;
use crate::vm::Script;
use snuvi_types::Value;

pub fn vm_shared_set(script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let name = args::string(args, 0, "shared.set")?;
    let value = args::any(args, 1, "shared.set")?.clone();
    script.engine().shared().set(name, value);
    Ok(Value::Null)
}

/// Unknown names yield null
pub fn vm_shared_get(script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let name = args::string(args, 0, "shared.get")?;
    Ok(script.engine().shared().get(name).unwrap_or(Value::Null))
}

pub fn vm_shared_has(script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let name = args::string(args, 0, "shared.has")?;
    Ok(Value::Bool(script.engine().shared().has(name)))
}

/// Returns the removed value, or null
pub fn vm_shared_remove(script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let name = args::string(args, 0, "shared.remove")?;
    Ok(script.engine().shared().remove(name).unwrap_or(Value::Null))
}
