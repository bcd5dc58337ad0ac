//! XMATCH and XLOOKUP for hosts that only ship the legacy `MATCH`.
//!
//! The host contributes two primitives through [`Host`]: its `<=` comparison and its sorted-search
//! `MATCH`. Mode combinations `MATCH` can answer directly are delegated to it. The rest are
//! resolved by a linear scan that asks the host for every comparison, so ordering, type coercion
//! and text collation always follow the host's own rules.
//!
//! ```
//! use formula_xfunctions::{ArgValue, Array, MatchOutcome, ReferenceHost, Value, XFunctions};
//!
//! let fns = XFunctions::new(ReferenceHost::new());
//! let data = Array::row(vec![Value::from(5.0), Value::from(3.0), Value::from(5.0)]);
//!
//! let last = fns.xmatch(
//!     ArgValue::from(Value::from(5.0)),
//!     ArgValue::from(data),
//!     ArgValue::Missing,
//!     ArgValue::number(-1.0),
//! );
//! assert_eq!(last, MatchOutcome::Found(3));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod functions;
pub mod host;
pub mod modes;
pub mod oracle;
pub mod project;
pub mod reference_host;
pub mod shape;
pub mod value;
pub mod wildcard;

pub use config::{EngineConfig, MatchTypeConvention, SearchDirection};
pub use engine::{MatchEngine, MatchOutcome, MatchRequest};
pub use error::{InvalidReason, LookupError, ProjectionError};
pub use functions::XFunctions;
pub use host::Host;
pub use modes::{MatchMode, SearchMode, Strategy};
pub use oracle::ComparatorOracle;
pub use project::{Projected, ProjectionTarget};
pub use reference_host::ReferenceHost;
pub use shape::{Orientation, VectorView};
pub use value::{ArgValue, Array, ErrorKind, RangeRef, Value};
