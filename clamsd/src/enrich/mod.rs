pub mod ap_names;
pub mod call_log;

use serde_json::Value;
use crate::mist::{ApiError, Endpoints, MistApi};

pub use ap_names::ApNameResolver;
pub use call_log::{CallKind, CallLog, CallOutcome};

/// State for one request cycle: the API handle plus the log of every
/// call made through it. Built fresh per search; nothing is shared.
pub struct Session<'a, A: MistApi> {
    api: &'a A,
    calls: CallLog,
}

impl<'a, A: MistApi> Session<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            calls: CallLog::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.api.endpoints()
    }

    /// Issue one call and log it whatever the result
    pub async fn call(&mut self, kind: CallKind, url: &str) -> Result<Value, ApiError> {
        tracing::debug!("{}: GET {}", kind.label(), url);

        let result = self.api.call(url).await;
        let outcome = match &result {
            Ok(_) => CallOutcome::Ok,
            Err(e) => CallOutcome::from_error(e),
        };
        self.calls.record(kind, url, outcome);

        result
    }

    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    pub fn calls_mut(&mut self) -> &mut CallLog {
        &mut self.calls
    }

    pub fn into_calls(self) -> CallLog {
        self.calls
    }
}
