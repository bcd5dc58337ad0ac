use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    NA,
    Spill,
    Calc,
}

impl ErrorKind {
    const ALL: [ErrorKind; 9] = [
        ErrorKind::Null,
        ErrorKind::Div0,
        ErrorKind::Value,
        ErrorKind::Ref,
        ErrorKind::Name,
        ErrorKind::Num,
        ErrorKind::NA,
        ErrorKind::Spill,
        ErrorKind::Calc,
    ];

    pub fn as_code(self) -> &'static str {
        match self {
            ErrorKind::Null => "#NULL!",
            ErrorKind::Div0 => "#DIV/0!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Name => "#NAME?",
            ErrorKind::Num => "#NUM!",
            ErrorKind::NA => "#N/A",
            ErrorKind::Spill => "#SPILL!",
            ErrorKind::Calc => "#CALC!",
        }
    }

    /// Parses an error literal such as `#N/A` (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A single cell value as marshalled by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Blank,
    Error(ErrorKind),
}

impl Value {
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<ErrorKind> for Value {
    fn from(value: ErrorKind) -> Self {
        Value::Error(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Value::Blank => f.write_str(""),
            Value::Error(e) => write!(f, "{e}"),
        }
    }
}

/// Row-major in-memory block of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<Value>,
}

impl Array {
    /// Builds a block from row-major values.
    ///
    /// `values.len()` must equal `rows * cols`; callers constructing blocks from host data are
    /// expected to uphold this.
    pub fn new(rows: usize, cols: usize, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        Self { rows, cols, values }
    }

    /// Builds a block from nested rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Option<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let values = rows.into_iter().flatten().collect();
        Some(Self::new(row_count, cols, values))
    }

    pub fn row(values: Vec<Value>) -> Self {
        Self::new(1, values.len(), values)
    }

    pub fn column(values: Vec<Value>) -> Self {
        Self::new(values.len(), 1, values)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Value]> {
        // `max(1)` keeps `chunks` well-defined for degenerate 0-column blocks.
        self.values.chunks(self.cols.max(1))
    }
}

/// An addressable rectangular region on a sheet.
///
/// Coordinates are 0-based and inclusive on both ends, mirroring the host's
/// `RowFirst..=RowLast` / `ColumnFirst..=ColumnLast` reference descriptors. Deserialized corners
/// are normalized like [`RangeRef::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RangeCorners")]
pub struct RangeRef {
    pub sheet_id: u64,
    pub row_first: u32,
    pub row_last: u32,
    pub col_first: u32,
    pub col_last: u32,
}

impl RangeRef {
    pub fn new(sheet_id: u64, row_first: u32, row_last: u32, col_first: u32, col_last: u32) -> Self {
        Self {
            sheet_id,
            row_first: row_first.min(row_last),
            row_last: row_first.max(row_last),
            col_first: col_first.min(col_last),
            col_last: col_first.max(col_last),
        }
    }

    /// Row count; a hand-built region with inverted corners is empty.
    pub fn rows(&self) -> usize {
        span(self.row_first, self.row_last)
    }

    pub fn cols(&self) -> usize {
        span(self.col_first, self.col_last)
    }

    /// The single column at `offset` from `col_first`, spanning every row of the region.
    pub fn column(&self, offset: usize) -> Option<RangeRef> {
        let col = self.col_first.checked_add(u32::try_from(offset).ok()?)?;
        (col <= self.col_last).then_some(RangeRef {
            col_first: col,
            col_last: col,
            ..*self
        })
    }

    /// The single row at `offset` from `row_first`, spanning every column of the region.
    pub fn row(&self, offset: usize) -> Option<RangeRef> {
        let row = self.row_first.checked_add(u32::try_from(offset).ok()?)?;
        (row <= self.row_last).then_some(RangeRef {
            row_first: row,
            row_last: row,
            ..*self
        })
    }
}

fn span(first: u32, last: u32) -> usize {
    last.checked_sub(first).map_or(0, |d| d as usize + 1)
}

/// Wire form of [`RangeRef`], possibly with inverted corners.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeCorners {
    sheet_id: u64,
    row_first: u32,
    row_last: u32,
    col_first: u32,
    col_last: u32,
}

impl From<RangeCorners> for RangeRef {
    fn from(c: RangeCorners) -> Self {
        RangeRef::new(c.sheet_id, c.row_first, c.row_last, c.col_first, c.col_last)
    }
}

/// A function argument as handed over by the host's marshalling layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// The argument was omitted (`XMATCH(a, b)` or `XMATCH(a, b, , 1)`).
    Missing,
    Scalar(Value),
    Array(Array),
    Reference(RangeRef),
}

impl ArgValue {
    pub fn number(n: f64) -> Self {
        ArgValue::Scalar(Value::Number(n))
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        ArgValue::Scalar(value)
    }
}

impl From<Array> for ArgValue {
    fn from(value: Array) -> Self {
        ArgValue::Array(value)
    }
}

impl From<RangeRef> for ArgValue {
    fn from(value: RangeRef) -> Self {
        ArgValue::Reference(value)
    }
}
