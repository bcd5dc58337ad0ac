use std::cmp::Ordering;

use crate::error::InvalidReason;
use crate::host::Host;
use crate::value::Value;

/// Three-way comparison built from the host's `<=`.
///
/// This is the only place host ordering semantics enter the engine; everything downstream works
/// on the [`Ordering`] it returns.
pub struct ComparatorOracle<'h, H: ?Sized> {
    host: &'h H,
}

impl<'h, H: Host + ?Sized> ComparatorOracle<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Result<Ordering, InvalidReason> {
        let a_le_b = self.host.less_or_equal(a, b)?;
        let b_le_a = self.host.less_or_equal(b, a)?;
        match (a_le_b, b_le_a) {
            (true, true) => Ok(Ordering::Equal),
            (true, false) => Ok(Ordering::Less),
            (false, true) => Ok(Ordering::Greater),
            (false, false) => {
                log::debug!("host reported {a:?} and {b:?} as incomparable");
                Err(InvalidReason::Incomparable)
            }
        }
    }
}
