use crate::error::InvalidReason;
use crate::value::{ArgValue, Array, Value};

/// Whether a lookup vector was taken from a row or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Row,
    Column,
}

/// A one-dimensional view over the `lookup_array` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorView {
    values: Vec<Value>,
    orientation: Orientation,
}

impl VectorView {
    pub fn new(values: Vec<Value>, orientation: Orientation) -> Self {
        Self {
            values,
            orientation,
        }
    }

    pub fn row(values: Vec<Value>) -> Self {
        Self::new(values, Orientation::Row)
    }

    pub fn column(values: Vec<Value>) -> Self {
        Self::new(values, Orientation::Column)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Turns the `lookup_array` argument into a [`VectorView`].
///
/// A scalar is a length-1 row; `1 x n` is a row and `n x 1` a column. Anything with more than
/// one row and more than one column is not a vector.
pub fn resolve_vector(arg: ArgValue) -> Result<VectorView, InvalidReason> {
    match arg {
        ArgValue::Scalar(value) => Ok(VectorView::row(vec![value])),
        ArgValue::Array(arr) => array_to_vector(arr),
        ArgValue::Missing | ArgValue::Reference(_) => Err(InvalidReason::NotAVector),
    }
}

fn array_to_vector(arr: Array) -> Result<VectorView, InvalidReason> {
    if arr.values.is_empty() {
        return Err(InvalidReason::NotAVector);
    }
    if arr.rows == 1 {
        return Ok(VectorView::row(arr.values));
    }
    if arr.cols == 1 {
        return Ok(VectorView::column(arr.values));
    }
    Err(InvalidReason::NotAVector)
}

/// Extracts the scalar `lookup_value`; arrays of lookup values are not supported.
pub fn resolve_lookup_value(arg: ArgValue) -> Result<Value, InvalidReason> {
    match arg {
        ArgValue::Scalar(value) => Ok(value),
        // An omitted lookup value is an empty cell as far as comparisons are concerned.
        ArgValue::Missing => Ok(Value::Blank),
        ArgValue::Array(_) | ArgValue::Reference(_) => Err(InvalidReason::ArrayLookupValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Vec<Value> {
        ns.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn scalar_is_a_single_cell_row() {
        let v = resolve_vector(ArgValue::Scalar(Value::from(7.0))).unwrap();
        assert_eq!(v.orientation(), Orientation::Row);
        assert_eq!(v.values(), &[Value::Number(7.0)]);
    }

    #[test]
    fn orientation_follows_the_unit_dimension() {
        let row = resolve_vector(ArgValue::Array(Array::row(nums(&[1.0, 2.0])))).unwrap();
        assert_eq!(row.orientation(), Orientation::Row);
        let col = resolve_vector(ArgValue::Array(Array::column(nums(&[1.0, 2.0])))).unwrap();
        assert_eq!(col.orientation(), Orientation::Column);
        assert_eq!(col.len(), 2);
        let single = resolve_vector(ArgValue::Array(Array::row(nums(&[1.0])))).unwrap();
        assert_eq!(single.orientation(), Orientation::Row);
    }

    #[test]
    fn two_dimensional_blocks_are_rejected() {
        let block = Array::new(2, 2, nums(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(
            resolve_vector(ArgValue::Array(block)),
            Err(InvalidReason::NotAVector)
        );
        assert_eq!(
            resolve_vector(ArgValue::Array(Array::new(0, 0, Vec::new()))),
            Err(InvalidReason::NotAVector)
        );
    }

    #[test]
    fn array_lookup_values_are_rejected() {
        assert_eq!(
            resolve_lookup_value(ArgValue::Array(Array::row(nums(&[1.0])))),
            Err(InvalidReason::ArrayLookupValue)
        );
    }
}
