use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::protocol::{LAST_SEEN_FORMAT, NOT_AVAILABLE};

/// Envelope shared by the Mist search endpoints.
/// A missing or null `results` key decodes as an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResults<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub results: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A wireless client as returned by the organization client search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client MAC address, e.g. "aabbccddeeff"
    pub mac: String,

    /// Hostname the client last reported
    #[serde(default)]
    pub last_hostname: Option<String>,

    /// MAC of the access point the client last associated with
    #[serde(default)]
    pub last_ap: Option<String>,

    #[serde(default)]
    pub last_ip: Option<String>,

    /// Last seen, epoch seconds (the API may send fractional seconds)
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// A device (AP, switch, gateway) as returned by the organization device search.
/// Only `last_hostname` is used; it carries the name shown in the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub mac: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub last_hostname: Option<String>,
}

/// A client record with its access point name attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedClient {
    #[serde(flatten)]
    pub record: ClientRecord,

    /// Display name of `record.last_ap`; never empty
    pub ap_name: String,
}

impl ClientRecord {
    /// Hostname if the client reported one, otherwise its MAC
    pub fn display_name(&self) -> &str {
        match self.last_hostname.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.mac,
        }
    }

    /// Last-seen time in UTC, or None when absent or out of range
    pub fn last_seen(&self) -> Option<String> {
        let ts = self.timestamp?;
        if !ts.is_finite() {
            return None;
        }
        let dt = DateTime::from_timestamp(ts.floor() as i64, 0)?;
        Some(dt.format(LAST_SEEN_FORMAT).to_string())
    }

    pub fn last_seen_or_na(&self) -> String {
        self.last_seen().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn last_ip_or_na(&self) -> &str {
        self.last_ip.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

impl EnrichedClient {
    pub fn new(record: ClientRecord, ap_name: String) -> Self {
        Self { record, ap_name }
    }
}
