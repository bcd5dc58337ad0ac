use crate::config::EngineConfig;
use crate::engine::{MatchEngine, MatchOutcome, MatchRequest};
use crate::error::{InvalidReason, LookupError};
use crate::host::Host;
use crate::project::{self, Projected, ProjectionTarget};
use crate::value::{ArgValue, Value};

/// XMATCH / XLOOKUP bound to a host.
///
/// Every call builds its own request and scan state, so one instance can serve concurrent
/// recalculation threads as long as `H` can.
#[derive(Debug, Clone)]
pub struct XFunctions<H> {
    host: H,
    config: EngineConfig,
}

impl<H: Host> XFunctions<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: H, config: EngineConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// XMATCH(lookup_value, lookup_array, [match_mode], [search_mode])
    ///
    /// Returns the 1-based position of the match within `lookup_array`.
    pub fn xmatch(
        &self,
        lookup_value: ArgValue,
        lookup_array: ArgValue,
        match_mode: ArgValue,
        search_mode: ArgValue,
    ) -> MatchOutcome {
        match self.request(lookup_value, lookup_array, &match_mode, &search_mode) {
            Ok(request) => self.engine().run(&request),
            Err(reason) => MatchOutcome::InvalidRequest(reason),
        }
    }

    /// XLOOKUP(lookup_value, lookup_array, return_array, [match_mode], [search_mode])
    ///
    /// Finds `lookup_value` like [`XFunctions::xmatch`] and returns the matching column (row
    /// lookup vector) or row (column lookup vector) of `return_array`.
    pub fn xlookup(
        &self,
        lookup_value: ArgValue,
        lookup_array: ArgValue,
        return_array: ArgValue,
        match_mode: ArgValue,
        search_mode: ArgValue,
    ) -> Result<Projected, LookupError> {
        let request = self.request(lookup_value, lookup_array, &match_mode, &search_mode)?;
        let outcome = self.engine().run(&request);
        let vector = request.vector();
        project::project(
            outcome,
            vector.orientation(),
            vector.len(),
            ProjectionTarget::from_arg(return_array),
        )
    }

    fn request(
        &self,
        lookup_value: ArgValue,
        lookup_array: ArgValue,
        match_mode: &ArgValue,
        search_mode: &ArgValue,
    ) -> Result<MatchRequest, InvalidReason> {
        if let ArgValue::Scalar(Value::Error(e)) = lookup_value {
            return Err(InvalidReason::Host(e));
        }
        let request = MatchRequest::from_args(lookup_value, lookup_array, match_mode, search_mode);
        if let Err(reason) = &request {
            log::debug!("rejected lookup arguments: {reason}");
        }
        request
    }

    fn engine(&self) -> MatchEngine<'_, H> {
        MatchEngine::new(&self.host, self.config.match_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_host::ReferenceHost;
    use crate::value::Array;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn shareable_across_threads_with_a_thread_safe_host() {
        assert_send_sync::<XFunctions<ReferenceHost>>();
        assert_send_sync::<XFunctions<&ReferenceHost>>();

        let fns = XFunctions::new(ReferenceHost::new());
        let data = Array::row((1..=50).map(|n| Value::Number(f64::from(n))).collect());
        std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=8u32)
                .map(|n| {
                    let (fns, data) = (&fns, &data);
                    scope.spawn(move || {
                        fns.xmatch(
                            ArgValue::number(f64::from(n * 5)),
                            ArgValue::Array(data.clone()),
                            ArgValue::Missing,
                            ArgValue::number(-1.0),
                        )
                    })
                })
                .collect();
            for (n, handle) in (1..=8).zip(handles) {
                assert_eq!(handle.join().unwrap(), MatchOutcome::Found(n * 5));
            }
        });
    }
}
