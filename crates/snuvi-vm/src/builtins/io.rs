//! Script output

use crate::error::VmError;
use crate::host::{LogEntry, LogLevel};
use crate::vm::Script;
use snuvi_types::Value;

/// Concatenate the display forms of all arguments and log them at info level
pub fn vm_print(script: &mut Script, args: &[Value]) -> Result<Value, VmError> {
    let message: String = args.iter().map(|v| v.to_string()).collect();
    script.log(LogEntry::new(LogLevel::Info, message));
    Ok(Value::Null)
}
