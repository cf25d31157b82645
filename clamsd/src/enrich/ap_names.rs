use std::collections::HashMap;
use serde_json::Value;
use shared::protocol::{NO_AP_LABEL, NO_AP_SENTINEL};
use shared::types::{DeviceRecord, SearchResults};
use crate::mist::MistApi;
use super::{CallKind, CallOutcome, Session};

/// Resolves access point MACs to display names.
///
/// Every answer, including the MAC fallback for a failed lookup, is cached,
/// so each distinct MAC costs at most one device search per cycle.
#[derive(Debug, Default)]
pub struct ApNameResolver {
    cache: HashMap<String, String>,
}

impl ApNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name for `ap_mac`. Never fails: unresolvable MACs come back unchanged.
    pub async fn resolve<A: MistApi>(
        &mut self,
        session: &mut Session<'_, A>,
        ap_mac: Option<&str>,
    ) -> String {
        let mac = match ap_mac {
            Some(mac) if !mac.is_empty() && mac != NO_AP_SENTINEL => mac,
            _ => return NO_AP_LABEL.to_string(),
        };

        if let Some(name) = self.cache.get(mac) {
            return name.clone();
        }

        let name = match lookup(session, mac).await {
            Ok(name) => name,
            Err(reason) => {
                tracing::debug!("AP {} unresolved, showing MAC: {}", mac, reason);
                mac.to_string()
            }
        };

        self.cache.insert(mac.to_string(), name.clone());
        name
    }

    /// Number of distinct APs seen this cycle
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn cached(&self, mac: &str) -> Option<&str> {
        self.cache.get(mac).map(String::as_str)
    }
}

/// One device search; Err carries the reason no name was found
async fn lookup<A: MistApi>(session: &mut Session<'_, A>, mac: &str) -> Result<String, String> {
    let url = session.endpoints().device_search(mac).map_err(|e| e.to_string())?;
    let response = session
        .call(CallKind::ApLookup, &url)
        .await
        .map_err(|e| e.to_string())?;

    extract_hostname(response).map_err(|reason| {
        session
            .calls_mut()
            .amend_last(CallOutcome::Unresolved(reason.to_string()));
        reason.to_string()
    })
}

fn extract_hostname(response: Value) -> Result<String, &'static str> {
    if !response.is_object() {
        return Err("unexpected device search response");
    }
    let devices: SearchResults<DeviceRecord> =
        serde_json::from_value(response).map_err(|_| "unexpected device search response")?;

    let device = devices.results.into_iter().next().ok_or("no device with this MAC")?;
    match device.last_hostname {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err("device has no hostname"),
    }
}
