//! Multi-dimensional arrays
//!
//! Arrays are dense, row-major and fixed in shape once created. Every access
//! is bounds checked per dimension.

use crate::error::ArrayError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    dims: Vec<usize>,
    data: Vec<Value>,
}

impl ArrayValue {
    /// Create an array of the given shape filled with `null`.
    ///
    /// Every dimension must be at least 1.
    pub fn new(shape: &[i64]) -> Result<Self, ArrayError> {
        let invalid = || ArrayError::InvalidShape(shape.to_vec());
        if shape.is_empty() {
            return Err(invalid());
        }

        let mut dims = Vec::with_capacity(shape.len());
        let mut len: usize = 1;
        for &size in shape {
            let size = usize::try_from(size).map_err(|_| invalid())?;
            if size == 0 {
                return Err(invalid());
            }
            len = len.checked_mul(size).ok_or_else(invalid)?;
            dims.push(size);
        }

        Ok(Self {
            dims,
            data: vec![Value::Null; len],
        })
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major position of `index`
    fn offset(&self, index: &[i64]) -> Result<usize, ArrayError> {
        if index.len() != self.dims.len() {
            return Err(ArrayError::DimensionMismatch {
                expected: self.dims.len(),
                got: index.len(),
            });
        }

        let mut offset = 0usize;
        for (dimension, (&i, &size)) in index.iter().zip(&self.dims).enumerate() {
            let position = usize::try_from(i)
                .ok()
                .filter(|&p| p < size)
                .ok_or(ArrayError::OutOfBounds {
                    dimension,
                    index: i,
                    size,
                })?;
            offset = offset * size + position;
        }
        Ok(offset)
    }

    pub fn get(&self, index: &[i64]) -> Result<&Value, ArrayError> {
        let offset = self.offset(index)?;
        Ok(&self.data[offset])
    }

    pub fn get_mut(&mut self, index: &[i64]) -> Result<&mut Value, ArrayError> {
        let offset = self.offset(index)?;
        Ok(&mut self.data[offset])
    }

    pub fn set(&mut self, index: &[i64], value: Value) -> Result<(), ArrayError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn values(&self) -> &[Value] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::Rational;

    #[test]
    fn test_new_fills_with_null() {
        let array = ArrayValue::new(&[2, 3]).unwrap();
        assert_eq!(array.dims(), &[2, 3]);
        assert_eq!(array.len(), 6);
        assert!(array.values().iter().all(|v| *v == Value::Null));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(ArrayValue::new(&[]).is_err());
        assert!(ArrayValue::new(&[2, 0]).is_err());
        assert!(ArrayValue::new(&[-1]).is_err());
        assert!(ArrayValue::new(&[i64::MAX, i64::MAX]).is_err());
    }

    #[test]
    fn test_row_major_access() {
        let mut array = ArrayValue::new(&[2, 3]).unwrap();
        array
            .set(&[1, 2], Value::Number(Rational::from_integer(7)))
            .unwrap();
        assert_eq!(array.values()[5], Value::Number(Rational::from_integer(7)));
        assert_eq!(
            array.get(&[1, 2]).unwrap(),
            &Value::Number(Rational::from_integer(7))
        );
    }

    #[test]
    fn test_bounds_and_dimensions() {
        let array = ArrayValue::new(&[2, 3]).unwrap();
        assert_eq!(
            array.get(&[0, 3]),
            Err(ArrayError::OutOfBounds {
                dimension: 1,
                index: 3,
                size: 3
            })
        );
        assert_eq!(
            array.get(&[-1, 0]),
            Err(ArrayError::OutOfBounds {
                dimension: 0,
                index: -1,
                size: 2
            })
        );
        assert_eq!(
            array.get(&[0]),
            Err(ArrayError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }
}
