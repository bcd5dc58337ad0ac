//! Validation and classification of XMATCH's `match_mode` / `search_mode` arguments.

use std::borrow::Cow;

use crate::config::SearchDirection;
use crate::error::InvalidReason;
use crate::value::{ArgValue, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// `0`: exact match only.
    Exact,
    /// `-1`: exact match, else the next smaller item.
    ApproxLowerOrEqual,
    /// `1`: exact match, else the next larger item.
    ApproxUpperOrEqual,
    /// `2`: `*`, `?` and `~` in text lookup values are wildcard operators.
    Wildcard,
}

impl TryFrom<i64> for MatchMode {
    type Error = InvalidReason;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MatchMode::Exact),
            -1 => Ok(MatchMode::ApproxLowerOrEqual),
            1 => Ok(MatchMode::ApproxUpperOrEqual),
            2 => Ok(MatchMode::Wildcard),
            _ => Err(InvalidReason::MatchMode),
        }
    }
}

impl MatchMode {
    /// Resolves the raw argument; an omitted argument means [`MatchMode::Exact`].
    pub fn from_arg(arg: &ArgValue) -> Result<Self, InvalidReason> {
        match arg {
            ArgValue::Missing => Ok(MatchMode::Exact),
            other => integral_arg(other)
                .ok_or(InvalidReason::MatchMode)
                .and_then(MatchMode::try_from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// `1`: first-to-last.
    Forward,
    /// `-1`: last-to-first.
    Reverse,
    /// `2`: binary search over a vector sorted ascending.
    BinaryAscending,
    /// `-2`: binary search over a vector sorted descending.
    BinaryDescending,
}

impl TryFrom<i64> for SearchMode {
    type Error = InvalidReason;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SearchMode::Forward),
            -1 => Ok(SearchMode::Reverse),
            2 => Ok(SearchMode::BinaryAscending),
            -2 => Ok(SearchMode::BinaryDescending),
            _ => Err(InvalidReason::SearchMode),
        }
    }
}

impl SearchMode {
    /// Resolves the raw argument; an omitted argument means [`SearchMode::Forward`].
    pub fn from_arg(arg: &ArgValue) -> Result<Self, InvalidReason> {
        match arg {
            ArgValue::Missing => Ok(SearchMode::Forward),
            other => integral_arg(other)
                .ok_or(InvalidReason::SearchMode)
                .and_then(SearchMode::try_from),
        }
    }

    /// Whether the logical search runs last-to-first.
    pub fn is_reverse(self) -> bool {
        matches!(self, SearchMode::Reverse | SearchMode::BinaryDescending)
    }
}

/// Only whole numbers are accepted; `1.5`, text, booleans, blanks and arrays are all rejected.
fn integral_arg(arg: &ArgValue) -> Option<i64> {
    match arg {
        ArgValue::Scalar(Value::Number(n)) if n.fract() == 0.0 && n.abs() <= i64::MAX as f64 => {
            Some(*n as i64)
        }
        _ => None,
    }
}

/// How a request gets resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A single call to the host's sorted-search primitive answers the request.
    Native(SearchDirection),
    /// Approximate native search followed by an equality check on the hit.
    ExactBinary { ascending: bool },
    /// Linear scan in the logical search direction.
    Scan { reverse: bool },
}

/// The validated mode pair plus the strategy that resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedModes {
    pub mode: MatchMode,
    pub search: SearchMode,
    pub strategy: Strategy,
}

pub fn normalize(
    match_mode: &ArgValue,
    search_mode: &ArgValue,
) -> Result<NormalizedModes, InvalidReason> {
    let mode = MatchMode::from_arg(match_mode)?;
    let search = SearchMode::from_arg(search_mode)?;
    let strategy = classify(mode, search);
    Ok(NormalizedModes {
        mode,
        search,
        strategy,
    })
}

/// Every pair resolves: the host's MATCH answers the pairs it supports, exact binary searches
/// verify an approximate hit, and everything else is scanned.
pub fn classify(mode: MatchMode, search: SearchMode) -> Strategy {
    use MatchMode::*;
    use SearchMode::*;

    match (mode, search) {
        (Exact | Wildcard, Forward) => Strategy::Native(SearchDirection::Equal),
        (ApproxLowerOrEqual, BinaryAscending) => {
            Strategy::Native(SearchDirection::LargestLessOrEqual)
        }
        (ApproxUpperOrEqual, BinaryDescending) => {
            Strategy::Native(SearchDirection::SmallestGreaterOrEqual)
        }
        (Exact, BinaryAscending) => Strategy::ExactBinary { ascending: true },
        (Exact, BinaryDescending) => Strategy::ExactBinary { ascending: false },
        // Binary search cannot honour patterns, so wildcard binary modes scan in their
        // logical direction.
        (Exact, Reverse)
        | (Wildcard, Reverse | BinaryAscending | BinaryDescending)
        | (ApproxLowerOrEqual, Forward | Reverse | BinaryDescending)
        | (ApproxUpperOrEqual, Forward | Reverse | BinaryAscending) => Strategy::Scan {
            reverse: search.is_reverse(),
        },
    }
}

/// Neutralizes the wildcard operators `~`, `?` and `*` in `text`.
///
/// `~` is escaped first so the escapes inserted for `?` and `*` are not escaped again.
pub fn escape_wildcards(text: &str) -> Cow<'_, str> {
    if !text.contains(['~', '?', '*']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('~', "~~")
            .replace('?', "~?")
            .replace('*', "~*"),
    )
}

/// The lookup value as handed to a wildcard-aware host primitive.
///
/// Text is escaped for every mode except [`MatchMode::Wildcard`], which keeps its operators.
pub fn native_lookup_value(lookup_value: &Value, mode: MatchMode) -> Value {
    match (lookup_value, mode) {
        (Value::Text(text), MatchMode::Wildcard) => Value::Text(text.clone()),
        (Value::Text(text), _) => Value::Text(escape_wildcards(text).into_owned()),
        _ => lookup_value.clone(),
    }
}
