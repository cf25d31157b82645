use axum::{
    extract::State,
    response::Html,
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use crate::api::render::{self, Diagnostics, PageView};
use crate::mist::{MistApi, MistClient};
use crate::search;

#[derive(Clone)]
pub struct AppState {
    pub client: MistClient,
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub client_identifier: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mist_configured: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_form).post(run_search))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn search_form() -> Html<String> {
    Html(render::page(&PageView::default()))
}

async fn run_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let identifier = form.client_identifier.trim();
    if identifier.is_empty() {
        return Html(render::page(&PageView {
            error: Some("Please enter a client name, hostname, or MAC address.".to_string()),
            ..PageView::default()
        }));
    }

    let outcome = search::search(&state.client, identifier).await;
    let endpoints = state.client.endpoints();
    let diagnostics = Some(Diagnostics {
        base_url: endpoints.base_url(),
        org_id: endpoints.org_id(),
        calls: &outcome.calls,
    });

    let html = match &outcome.result {
        Ok(clients) => render::page(&PageView {
            identifier: Some(identifier),
            error: None,
            results: Some(clients.as_slice()),
            diagnostics,
        }),
        Err(e) => render::page(&PageView {
            identifier: Some(identifier),
            error: Some(format!("Organization Search Failed: {}", e)),
            results: None,
            diagnostics,
        }),
    };

    Html(html)
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mist_configured: state.client.config().is_configured(),
    })
}
