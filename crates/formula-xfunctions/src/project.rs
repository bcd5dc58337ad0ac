//! Maps a matched position onto XLOOKUP's `return_array`.

use crate::engine::MatchOutcome;
use crate::error::{LookupError, ProjectionError};
use crate::shape::Orientation;
use crate::value::{ArgValue, Array, RangeRef, Value};

/// The `return_array` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionTarget {
    /// A sheet reference; projecting it yields another reference.
    Region(RangeRef),
    /// An in-memory block of values.
    Block(Array),
    /// A single value.
    Scalar(Value),
}

impl ProjectionTarget {
    pub fn from_arg(arg: ArgValue) -> Self {
        match arg {
            ArgValue::Reference(r) => ProjectionTarget::Region(r),
            ArgValue::Array(arr) => ProjectionTarget::Block(arr),
            ArgValue::Scalar(v) => ProjectionTarget::Scalar(v),
            ArgValue::Missing => ProjectionTarget::Scalar(Value::Blank),
        }
    }

    fn extent(&self) -> (usize, usize) {
        match self {
            ProjectionTarget::Region(r) => (r.rows(), r.cols()),
            ProjectionTarget::Block(arr) => (arr.rows, arr.cols),
            ProjectionTarget::Scalar(_) => (1, 1),
        }
    }
}

/// What XLOOKUP hands back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Projected {
    Reference(RangeRef),
    Array(Array),
    Value(Value),
}

/// Projects `outcome` through `target`.
///
/// A row-oriented lookup vector selects a column of the target and a column-oriented one selects
/// a row. `len` is the length of the lookup vector; regions and blocks must have that many rows
/// or that many columns.
pub fn project(
    outcome: MatchOutcome,
    orientation: Orientation,
    len: usize,
    target: ProjectionTarget,
) -> Result<Projected, LookupError> {
    let position = match outcome {
        MatchOutcome::Found(pos) => pos,
        MatchOutcome::NotFound => return Err(LookupError::NotApplicable),
        MatchOutcome::InvalidRequest(reason) => return Err(LookupError::InvalidRequest(reason)),
    };
    let offset = position
        .checked_sub(1)
        .ok_or(ProjectionError::OutOfBounds { offset: 0, extent: 0 })?;

    let (rows, cols) = target.extent();
    if !matches!(target, ProjectionTarget::Scalar(_)) && rows != len && cols != len {
        return Err(ProjectionError::ShapeMismatch { rows, cols, len }.into());
    }

    let projected = match (target, orientation) {
        (ProjectionTarget::Region(r), Orientation::Row) => r
            .column(offset)
            .map(Projected::Reference)
            .ok_or(ProjectionError::OutOfBounds { offset, extent: cols })?,
        (ProjectionTarget::Region(r), Orientation::Column) => r
            .row(offset)
            .map(Projected::Reference)
            .ok_or(ProjectionError::OutOfBounds { offset, extent: rows })?,
        (ProjectionTarget::Block(arr), Orientation::Row) => {
            if offset >= arr.cols {
                return Err(ProjectionError::OutOfBounds { offset, extent: cols }.into());
            }
            let column = (0..arr.rows).map(|r| arr.get(r, offset).cloned());
            Projected::Array(Array::column(block_cells(&arr, column)?))
        }
        (ProjectionTarget::Block(arr), Orientation::Column) => {
            if offset >= arr.rows {
                return Err(ProjectionError::OutOfBounds { offset, extent: rows }.into());
            }
            let row = (0..arr.cols).map(|c| arr.get(offset, c).cloned());
            Projected::Array(Array::row(block_cells(&arr, row)?))
        }
        (ProjectionTarget::Scalar(value), _) => {
            if offset != 0 {
                return Err(ProjectionError::ScalarOffset { offset }.into());
            }
            Projected::Value(value)
        }
    };
    Ok(projected)
}

/// Collects projected cells; a missing cell means `values` does not fill `rows x cols`.
fn block_cells(
    arr: &Array,
    cells: impl Iterator<Item = Option<Value>>,
) -> Result<Vec<Value>, ProjectionError> {
    cells
        .collect::<Option<Vec<_>>>()
        .ok_or(ProjectionError::RaggedBlock {
            rows: arr.rows,
            cols: arr.cols,
            len: arr.values.len(),
        })
}
