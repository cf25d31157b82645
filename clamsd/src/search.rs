use serde_json::Value;
use shared::types::{ClientRecord, EnrichedClient, SearchResults};
use crate::enrich::{ApNameResolver, CallKind, CallLog, Session};
use crate::mist::{ApiError, MistApi};

/// Result of one search cycle.
/// `result` is Err when the search itself failed; an empty Vec means no matches.
#[derive(Debug)]
pub struct SearchOutcome {
    pub result: Result<Vec<EnrichedClient>, ApiError>,
    pub calls: CallLog,
}

/// Search the organization for clients matching `identifier` and attach the
/// name of each client's last access point.
pub async fn search<A: MistApi>(api: &A, identifier: &str) -> SearchOutcome {
    let mut session = Session::new(api);
    let result = run(&mut session, identifier).await;

    match &result {
        Ok(clients) => tracing::info!(
            "Search {:?}: {} client(s), {} AP lookup(s)",
            identifier,
            clients.len(),
            session.calls().count(CallKind::ApLookup)
        ),
        Err(e) => tracing::warn!("Search {:?} failed ({}): {}", identifier, e.kind(), e),
    }

    SearchOutcome {
        result,
        calls: session.into_calls(),
    }
}

async fn run<A: MistApi>(
    session: &mut Session<'_, A>,
    identifier: &str,
) -> Result<Vec<EnrichedClient>, ApiError> {
    let url = session.endpoints().client_search(identifier)?;
    let response = session.call(CallKind::ClientSearch, &url).await?;
    let records = decode_clients(response)?;

    let mut resolver = ApNameResolver::new();
    let mut clients = Vec::with_capacity(records.len());
    for record in records {
        let ap_name = resolver.resolve(session, record.last_ap.as_deref()).await;
        clients.push(EnrichedClient::new(record, ap_name));
    }

    tracing::debug!("Resolved {} distinct AP(s)", resolver.len());
    Ok(clients)
}

fn decode_clients(response: Value) -> Result<Vec<ClientRecord>, ApiError> {
    if !response.is_object() {
        return Err(ApiError::unexpected_format());
    }

    serde_json::from_value::<SearchResults<ClientRecord>>(response)
        .map(|page| page.results)
        .map_err(|e| {
            tracing::debug!("Client search response did not decode: {}", e);
            ApiError::unexpected_format()
        })
}
