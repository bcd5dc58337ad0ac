use serde::{Deserialize, Serialize};

/// Engine-wide settings.
///
/// Everything here is read-only once an [`crate::XFunctions`] has been built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// How native search directions are spelled as legacy `MATCH` `match_type` arguments.
    pub match_type: MatchTypeConvention,
}

/// Direction requested from the host's sorted-search primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    /// Find a value equal to the lookup value (wildcard-aware for text).
    Equal,
    /// Find the largest value `<=` the lookup value in an ascending vector.
    LargestLessOrEqual,
    /// Find the smallest value `>=` the lookup value in a descending vector.
    SmallestGreaterOrEqual,
}

/// Maps a [`SearchDirection`] onto the numeric `match_type` argument of the legacy `MATCH`.
///
/// XMATCH's `-1` ("exact or next smaller") pairs with MATCH's `1` and XMATCH's `1` pairs with
/// MATCH's `-1`. The signs are kept configurable so a host with a different convention can be
/// accommodated without touching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTypeConvention {
    pub exact: i32,
    pub largest_less_or_equal: i32,
    pub smallest_greater_or_equal: i32,
}

impl Default for MatchTypeConvention {
    fn default() -> Self {
        Self {
            exact: 0,
            largest_less_or_equal: 1,
            smallest_greater_or_equal: -1,
        }
    }
}

impl MatchTypeConvention {
    #[must_use]
    pub fn match_type(&self, direction: SearchDirection) -> i32 {
        match direction {
            SearchDirection::Equal => self.exact,
            SearchDirection::LargestLessOrEqual => self.largest_less_or_equal,
            SearchDirection::SmallestGreaterOrEqual => self.smallest_greater_or_equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"matchType":{"largestLessOrEqual":-1}}"#).unwrap();
        assert_eq!(cfg.match_type.exact, 0);
        assert_eq!(cfg.match_type.largest_less_or_equal, -1);
        assert_eq!(cfg.match_type.smallest_greater_or_equal, -1);

        let empty: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }
}
