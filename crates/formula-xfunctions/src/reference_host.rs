//! An in-process [`Host`] with Excel-like comparison and `MATCH` behaviour.
//!
//! Tests use it as the injectable host, and the CLI evaluates cases against it. A live
//! spreadsheet integration supplies its own [`Host`] instead.

use std::cmp::Ordering;

use crate::host::Host;
use crate::value::{ErrorKind, Value};
use crate::wildcard::{self, WildcardPattern};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceHost;

impl ReferenceHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for ReferenceHost {
    fn less_or_equal(&self, a: &Value, b: &Value) -> Result<bool, ErrorKind> {
        Ok(excel_cmp(a, b)? != Ordering::Greater)
    }

    fn sorted_search(
        &self,
        lookup_value: &Value,
        vector: &[Value],
        match_type: i32,
    ) -> Result<Option<usize>, ErrorKind> {
        if let Value::Error(e) = lookup_value {
            return Err(*e);
        }
        let idx = match match_type.signum() {
            0 => exact_match(lookup_value, vector),
            1 => approximate_match(lookup_value, vector, true),
            _ => approximate_match(lookup_value, vector, false),
        };
        Ok(idx.map(|i| i + 1))
    }
}

/// First exact match. Text lookups are wildcard patterns; error cells never match.
fn exact_match(lookup: &Value, values: &[Value]) -> Option<usize> {
    if let Value::Text(pattern) = lookup {
        let pattern = WildcardPattern::new(pattern);
        return values.iter().position(|candidate| match candidate {
            Value::Text(s) => pattern.matches(s),
            Value::Blank => pattern.matches(""),
            _ => false,
        });
    }
    values
        .iter()
        .position(|candidate| excel_cmp(candidate, lookup) == Ok(Ordering::Equal))
}

/// Binary search over a sorted vector:
/// - ascending: last index where value <= lookup
/// - descending: last index where value >= lookup
///
/// A run of equal values resolves to its first index.
fn approximate_match(lookup: &Value, values: &[Value], ascending: bool) -> Option<usize> {
    let qualifies = |v: &Value| match excel_cmp(v, lookup) {
        Ok(Ordering::Equal) => true,
        Ok(Ordering::Less) => ascending,
        Ok(Ordering::Greater) => !ascending,
        Err(_) => false,
    };

    let mut lo = 0usize;
    let mut hi = values.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if qualifies(&values[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    let mut idx = lo.checked_sub(1)?;
    while idx > 0 && excel_cmp(&values[idx - 1], &values[idx]) == Ok(Ordering::Equal) {
        idx -= 1;
    }
    Some(idx)
}

/// Excel's comparison operators: blanks take the other operand's type, otherwise
/// numbers < text < booleans, and text compares case-insensitively. Errors propagate.
fn excel_cmp(a: &Value, b: &Value) -> Result<Ordering, ErrorKind> {
    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Number(_) | Value::Blank => 0,
            Value::Text(_) => 1,
            Value::Bool(_) => 2,
            Value::Error(_) => 3,
        }
    }

    match (a, b) {
        (Value::Error(e), _) | (_, Value::Error(e)) => Err(*e),
        (Value::Blank, Value::Blank) => Ok(Ordering::Equal),
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).ok_or(ErrorKind::Num),
        (Value::Blank, Value::Number(y)) => 0.0_f64.partial_cmp(y).ok_or(ErrorKind::Num),
        (Value::Number(x), Value::Blank) => x.partial_cmp(&0.0).ok_or(ErrorKind::Num),
        (Value::Text(x), Value::Text(y)) => Ok(cmp_case_insensitive(x, y)),
        (Value::Blank, Value::Text(y)) => Ok(cmp_case_insensitive("", y)),
        (Value::Text(x), Value::Blank) => Ok(cmp_case_insensitive(x, "")),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Blank, Value::Bool(y)) => Ok(false.cmp(y)),
        (Value::Bool(x), Value::Blank) => Ok(x.cmp(&false)),
        _ => Ok(type_rank(a).cmp(&type_rank(b))),
    }
}

fn cmp_case_insensitive(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return a
            .bytes()
            .map(|c| c.to_ascii_uppercase())
            .cmp(b.bytes().map(|c| c.to_ascii_uppercase()));
    }
    wildcard::fold(a).cmp(wildcard::fold(b))
}
