use crate::value::{ErrorKind, Value};

/// The two primitives the engine borrows from the spreadsheet host.
///
/// Implementations must be pure from the engine's point of view: the same inputs always produce
/// the same answer, and calls may happen concurrently from many cells.
pub trait Host {
    /// `a <= b` under the host's comparison rules (type ordering, text collation, error
    /// propagation). `Err` carries the error value the host produced.
    fn less_or_equal(&self, a: &Value, b: &Value) -> Result<bool, ErrorKind>;

    /// The legacy `MATCH(lookup_value, vector, match_type)` primitive.
    ///
    /// Returns the 1-based position of the hit, `None` when nothing matches, or the error value
    /// the host raised for anything other than "not found".
    fn sorted_search(
        &self,
        lookup_value: &Value,
        vector: &[Value],
        match_type: i32,
    ) -> Result<Option<usize>, ErrorKind>;
}

impl<H: Host + ?Sized> Host for &H {
    fn less_or_equal(&self, a: &Value, b: &Value) -> Result<bool, ErrorKind> {
        (**self).less_or_equal(a, b)
    }

    fn sorted_search(
        &self,
        lookup_value: &Value,
        vector: &[Value],
        match_type: i32,
    ) -> Result<Option<usize>, ErrorKind> {
        (**self).sorted_search(lookup_value, vector, match_type)
    }
}
