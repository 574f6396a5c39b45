//! Variable, element and assignment instruction execution

use super::{number, pair, single};
use crate::bytecode::Op;
use crate::error::VmError;
use crate::vm::frame::Operand;
use crate::vm::ops::ValueOperations;
use crate::vm::result::ExecutionResult;
use crate::vm::Script;
use snuvi_types::{Key, Rational, Value};

impl Script {
    /// Execute loads, handles and assignments
    pub(crate) fn execute_variables(
        &mut self,
        op: &Op,
        operands: Vec<Operand>,
    ) -> Result<ExecutionResult, VmError> {
        match op {
            Op::Push(constant) => self.push(constant.to_value()),

            Op::Load(slot) => {
                let value = self.read_slot(*slot)?;
                self.push(value);
            }

            Op::Ref(slot) => self.stack.push(Operand::Variable(*slot)),

            Op::Index | Op::IndexRef => {
                let mut values = self.resolve_all(operands)?.into_iter();
                let container = values
                    .next()
                    .ok_or_else(|| VmError::InvalidOperand("missing container".into()))?;
                let index: Vec<Value> = values.collect();

                if matches!(op, Op::Index) {
                    let value = Self::read_element(&container, &index)?;
                    self.push(value);
                } else {
                    self.stack.push(Operand::Element { container, index });
                }
            }

            Op::Assign { op: compound, keep } => {
                let (target, value) = pair(operands)?;
                let mut value = self.resolve(value)?;
                if let Some(binary) = compound {
                    let current = self.read_handle(&target)?;
                    value = ValueOperations::binary(*binary, &current, &value)?;
                }
                self.write_handle(target, value.clone())?;
                if *keep {
                    self.push(value);
                }
            }

            Op::Step {
                delta,
                postfix,
                keep,
            } => {
                let target = single(operands)?;
                let current = self.read_handle(&target)?;
                let operation = if *delta > 0 { "'++'" } else { "'--'" };
                let updated = number(&current, operation)?
                    .checked_add(&Rational::from_integer(i64::from(*delta)))?;
                self.write_handle(target, Value::Number(updated))?;
                if *keep {
                    self.push(if *postfix {
                        current
                    } else {
                        Value::Number(updated)
                    });
                }
            }

            // Operand already discarded
            Op::Pop => {}

            _ => unreachable!("Non-variable op in variable handler"),
        }
        Ok(ExecutionResult::Continue)
    }

    fn read_handle(&self, target: &Operand) -> Result<Value, VmError> {
        match target {
            Operand::Variable(slot) => self.read_slot(*slot),
            Operand::Element { container, index } => Self::read_element(container, index),
            Operand::Value(_) => Err(VmError::InvalidOperand("value is not assignable".into())),
        }
    }

    fn write_handle(&mut self, target: Operand, value: Value) -> Result<(), VmError> {
        match target {
            Operand::Variable(slot) => self.write_slot(slot, value),
            Operand::Element { container, index } => Self::write_element(&container, &index, value),
            Operand::Value(_) => Err(VmError::InvalidOperand("value is not assignable".into())),
        }
    }

    // ===== Element access =====

    /// `container[index...]`; missing map keys read as null
    pub(crate) fn read_element(container: &Value, index: &[Value]) -> Result<Value, VmError> {
        match container {
            Value::Array(array) => {
                let index = integer_indices(index)?;
                Ok(array.read().get(&index)?.clone())
            }
            Value::List(list) => {
                let list = list.read();
                let position = list_position(single_index(index)?, list.len())?;
                Ok(list[position].clone())
            }
            Value::Map(map) => {
                let key = map_key(single_index(index)?)?;
                Ok(map.read().get(&key).cloned().unwrap_or(Value::Null))
            }
            other => Err(VmError::type_mismatch("indexing", "array, list or map", other)),
        }
    }

    pub(crate) fn write_element(
        container: &Value,
        index: &[Value],
        value: Value,
    ) -> Result<(), VmError> {
        match container {
            Value::Array(array) => {
                let index = integer_indices(index)?;
                array.write().set(&index, value)?;
            }
            Value::List(list) => {
                let mut list = list.write();
                let position = list_position(single_index(index)?, list.len())?;
                list[position] = value;
            }
            Value::Map(map) => {
                let key = map_key(single_index(index)?)?;
                map.write().insert(key, value);
            }
            other => return Err(VmError::type_mismatch("indexing", "array, list or map", other)),
        }
        Ok(())
    }
}

fn single_index(index: &[Value]) -> Result<&Value, VmError> {
    match index {
        [only] => Ok(only),
        _ => Err(snuvi_types::ArrayError::DimensionMismatch {
            expected: 1,
            got: index.len(),
        }
        .into()),
    }
}

fn integer_index(value: &Value) -> Result<i64, VmError> {
    value
        .as_number()
        .and_then(|n| n.to_integer())
        .ok_or_else(|| VmError::type_mismatch("index", "integer", value))
}

fn integer_indices(index: &[Value]) -> Result<Vec<i64>, VmError> {
    index.iter().map(integer_index).collect()
}

fn list_position(value: &Value, len: usize) -> Result<usize, VmError> {
    let index = integer_index(value)?;
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(VmError::IndexOutOfBounds { index, len })
}

fn map_key(value: &Value) -> Result<Key, VmError> {
    Key::from_value(value).ok_or_else(|| VmError::InvalidKey(value.type_name().to_string()))
}
