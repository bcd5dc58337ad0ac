use thiserror::Error;

use crate::value::ErrorKind;

/// Why a request could not be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("match_mode must be one of 0, -1, 1 or 2")]
    MatchMode,
    #[error("search_mode must be one of 1, -1, 2 or -2")]
    SearchMode,
    #[error("lookup_value must be a single value")]
    ArrayLookupValue,
    #[error("lookup_array must be a single row or a single column")]
    NotAVector,
    #[error("host comparison reported neither a <= b nor b <= a")]
    Incomparable,
    #[error("host sorted search returned position {position} for a vector of length {len}")]
    HostPosition { position: usize, len: usize },
    #[error("host returned {0}")]
    Host(ErrorKind),
}

impl InvalidReason {
    /// The error value surfaced to the caller.
    ///
    /// Host errors propagate verbatim; everything else is `#VALUE!`.
    pub fn error_kind(self) -> ErrorKind {
        match self {
            InvalidReason::Host(kind) => kind,
            _ => ErrorKind::Value,
        }
    }
}

impl From<ErrorKind> for InvalidReason {
    fn from(kind: ErrorKind) -> Self {
        InvalidReason::Host(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("return_array has {rows}x{cols} cells but the lookup vector has {len}")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },
    #[error("matched offset {offset} is outside the {extent} available in return_array")]
    OutOfBounds { offset: usize, extent: usize },
    #[error("a single-value return_array only accepts a match at the first position")]
    ScalarOffset { offset: usize },
    #[error("return_array claims {rows}x{cols} cells but holds {len} values")]
    RaggedBlock { rows: usize, cols: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no match found")]
    NotApplicable,
    #[error(transparent)]
    InvalidRequest(#[from] InvalidReason),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl LookupError {
    pub fn error_kind(self) -> ErrorKind {
        match self {
            LookupError::NotApplicable => ErrorKind::NA,
            LookupError::InvalidRequest(reason) => reason.error_kind(),
            LookupError::Projection(_) => ErrorKind::Value,
        }
    }
}
