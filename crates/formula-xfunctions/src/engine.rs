//! The matching engine behind XMATCH.
//!
//! Requests are answered either by a single call into the host's legacy sorted search, or by a
//! linear scan whose comparisons all go through the [`ComparatorOracle`]. The engine never
//! compares two values itself.

use std::cmp::Ordering;

use crate::config::{MatchTypeConvention, SearchDirection};
use crate::error::InvalidReason;
use crate::host::Host;
use crate::modes::{self, MatchMode, NormalizedModes, SearchMode, Strategy};
use crate::oracle::ComparatorOracle;
use crate::shape::{self, VectorView};
use crate::value::{ArgValue, ErrorKind, Value};

/// Result of a match: a 1-based position, "not found", or a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Found(usize),
    NotFound,
    InvalidRequest(InvalidReason),
}

impl MatchOutcome {
    pub fn position(self) -> Option<usize> {
        match self {
            MatchOutcome::Found(pos) => Some(pos),
            MatchOutcome::NotFound | MatchOutcome::InvalidRequest(_) => None,
        }
    }

    /// The cell value XMATCH returns: the position as a number, `#N/A`, or the request's error.
    pub fn to_value(self) -> Value {
        match self {
            MatchOutcome::Found(pos) => Value::Number(pos as f64),
            MatchOutcome::NotFound => Value::Error(ErrorKind::NA),
            MatchOutcome::InvalidRequest(reason) => Value::Error(reason.error_kind()),
        }
    }
}

impl From<Result<Option<usize>, InvalidReason>> for MatchOutcome {
    fn from(result: Result<Option<usize>, InvalidReason>) -> Self {
        match result {
            Ok(Some(pos)) => MatchOutcome::Found(pos),
            Ok(None) => MatchOutcome::NotFound,
            Err(reason) => MatchOutcome::InvalidRequest(reason),
        }
    }
}

/// A validated XMATCH request.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    lookup_value: Value,
    /// `lookup_value` with wildcard operators escaped unless the mode is [`MatchMode::Wildcard`].
    native_lookup_value: Value,
    vector: VectorView,
    modes: NormalizedModes,
}

impl MatchRequest {
    pub fn new(lookup_value: Value, vector: VectorView, modes: NormalizedModes) -> Self {
        let native_lookup_value = modes::native_lookup_value(&lookup_value, modes.mode);
        Self {
            lookup_value,
            native_lookup_value,
            vector,
            modes,
        }
    }

    /// Validates raw host arguments: modes first, then the lookup value, then the vector shape.
    pub fn from_args(
        lookup_value: ArgValue,
        lookup_array: ArgValue,
        match_mode: &ArgValue,
        search_mode: &ArgValue,
    ) -> Result<Self, InvalidReason> {
        let modes = modes::normalize(match_mode, search_mode)?;
        let lookup_value = shape::resolve_lookup_value(lookup_value)?;
        let vector = shape::resolve_vector(lookup_array)?;
        Ok(Self::new(lookup_value, vector, modes))
    }

    pub fn lookup_value(&self) -> &Value {
        &self.lookup_value
    }

    pub fn vector(&self) -> &VectorView {
        &self.vector
    }

    pub fn mode(&self) -> MatchMode {
        self.modes.mode
    }

    pub fn search(&self) -> SearchMode {
        self.modes.search
    }

    pub fn strategy(&self) -> Strategy {
        self.modes.strategy
    }
}

pub struct MatchEngine<'h, H: ?Sized> {
    host: &'h H,
    convention: MatchTypeConvention,
}

impl<'h, H: Host + ?Sized> MatchEngine<'h, H> {
    pub fn new(host: &'h H, convention: MatchTypeConvention) -> Self {
        Self { host, convention }
    }

    pub fn run(&self, request: &MatchRequest) -> MatchOutcome {
        log::trace!(
            "xmatch {:?}/{:?} over {} values via {:?}",
            request.mode(),
            request.search(),
            request.vector.len(),
            request.strategy()
        );
        let outcome = MatchOutcome::from(self.resolve(request));
        if let MatchOutcome::InvalidRequest(reason) = outcome {
            log::debug!("xmatch rejected: {reason}");
        }
        outcome
    }

    fn resolve(&self, request: &MatchRequest) -> Result<Option<usize>, InvalidReason> {
        match request.strategy() {
            Strategy::Native(direction) => {
                let lookup = match direction {
                    SearchDirection::Equal => &request.native_lookup_value,
                    // Approximate MATCH never interprets wildcards, so it sees the raw value.
                    SearchDirection::LargestLessOrEqual
                    | SearchDirection::SmallestGreaterOrEqual => &request.lookup_value,
                };
                self.native(lookup, request.vector.values(), direction)
            }
            Strategy::ExactBinary { ascending } => self.exact_binary(request, ascending),
            Strategy::Scan { reverse } => self.scan(request, reverse),
        }
    }

    fn native(
        &self,
        lookup: &Value,
        values: &[Value],
        direction: SearchDirection,
    ) -> Result<Option<usize>, InvalidReason> {
        let match_type = self.convention.match_type(direction);
        let position = self.host.sorted_search(lookup, values, match_type)?;
        match position {
            Some(pos) if pos == 0 || pos > values.len() => Err(InvalidReason::HostPosition {
                position: pos,
                len: values.len(),
            }),
            other => Ok(other),
        }
    }

    /// Approximate native search, accepted only when the hit compares equal to the lookup value.
    fn exact_binary(
        &self,
        request: &MatchRequest,
        ascending: bool,
    ) -> Result<Option<usize>, InvalidReason> {
        let direction = if ascending {
            SearchDirection::LargestLessOrEqual
        } else {
            SearchDirection::SmallestGreaterOrEqual
        };
        let values = request.vector.values();
        let Some(pos) = self.native(&request.lookup_value, values, direction)? else {
            return Ok(None);
        };
        let oracle = ComparatorOracle::new(self.host);
        let ord = candidate_ordering(oracle.compare(&values[pos - 1], &request.lookup_value))?;
        Ok((ord == Some(Ordering::Equal)).then_some(pos))
    }

    /// Linear scan in the logical search direction.
    ///
    /// The best candidate is only replaced by a strictly better one, so among equally good
    /// candidates the one met first in the logical direction wins. An exact hit ends the scan.
    fn scan(&self, request: &MatchRequest, reverse: bool) -> Result<Option<usize>, InvalidReason> {
        let oracle = ComparatorOracle::new(self.host);
        let lookup = &request.lookup_value;
        let values = request.vector.values();
        let indices: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..values.len()).rev())
        } else {
            Box::new(0..values.len())
        };

        // Moving in this direction gets closer to the lookup value. A candidate past the lookup
        // value in this direction is on the wrong side of it.
        let closer = match request.mode() {
            MatchMode::ApproxLowerOrEqual => Some(Ordering::Greater),
            MatchMode::ApproxUpperOrEqual => Some(Ordering::Less),
            MatchMode::Exact | MatchMode::Wildcard => None,
        };

        let mut best: Option<(usize, &Value)> = None;
        for idx in indices {
            let candidate = &values[idx];
            let Some(closer) = closer else {
                let hit = match request.mode() {
                    MatchMode::Wildcard => {
                        self.wildcard_equal(&request.native_lookup_value, candidate)
                    }
                    _ => {
                        candidate_ordering(oracle.compare(candidate, lookup))?
                            == Some(Ordering::Equal)
                    }
                };
                if hit {
                    return Ok(Some(idx + 1));
                }
                continue;
            };

            let Some(ord) = candidate_ordering(oracle.compare(candidate, lookup))? else {
                continue;
            };
            if ord == Ordering::Equal {
                return Ok(Some(idx + 1));
            }
            if ord == closer {
                continue;
            }
            let improves = match best {
                None => true,
                Some((_, current)) => oracle.compare(candidate, current)? == closer,
            };
            if improves {
                best = Some((idx, candidate));
            }
        }

        log::trace!("xmatch scan best candidate: {best:?}");
        Ok(best.map(|(idx, _)| idx + 1))
    }

    /// Wildcard equality is the host's exact search over a single-element vector, so pattern
    /// semantics stay with the host. A host error on the candidate means it does not match.
    fn wildcard_equal(&self, pattern: &Value, candidate: &Value) -> bool {
        let match_type = self.convention.match_type(SearchDirection::Equal);
        match self
            .host
            .sorted_search(pattern, std::slice::from_ref(candidate), match_type)
        {
            Ok(hit) => hit.is_some(),
            Err(kind) => {
                log::trace!("xmatch skipping candidate {candidate}: host returned {kind}");
                false
            }
        }
    }
}

/// A host error raised while comparing a candidate (an error cell in the lookup vector) means the
/// candidate cannot match; it does not fail the whole request.
fn candidate_ordering(
    result: Result<Ordering, InvalidReason>,
) -> Result<Option<Ordering>, InvalidReason> {
    match result {
        Ok(ord) => Ok(Some(ord)),
        Err(InvalidReason::Host(_)) => Ok(None),
        Err(reason) => Err(reason),
    }
}
