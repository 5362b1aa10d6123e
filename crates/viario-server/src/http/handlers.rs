use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Instant;
use viario_api::ApiError;

pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(json!({"error": err}))).into_response()
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

/// Collapses id-bearing paths into fixed labels so metrics cardinality
/// stays bounded.
pub(crate) fn route_label(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("/api/ramais/") {
        if !rest.is_empty() {
            return "/api/ramais/{municipio_id}".to_string();
        }
    }
    if let Some(rest) = path.strip_prefix("/api/ramal/") {
        if !rest.is_empty() {
            return "/api/ramal/{ramal_id}".to_string();
        }
    }
    if let Some(rest) = path.strip_prefix("/api/rodovia/") {
        if !rest.is_empty() {
            return "/api/rodovia/{nome}".to_string();
        }
    }
    path.to_string()
}

/// Client key for the admission gate: first forwarded hop when a proxy
/// fronts the service, otherwise the socket peer address.
pub(crate) fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

pub(crate) async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let html = format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Viário</title></head><body>\
<h1>Viário - Consulta da Malha Viária</h1>\
<p>Version: <code>{}</code></p>\
<h2>Rotas</h2>\
<ul>\
<li><a href=\"/healthz\">/healthz</a></li>\
<li><a href=\"/api/municipios\">/api/municipios</a></li>\
<li><code>/api/ramais/&lt;municipio_id&gt;</code></li>\
<li><code>/api/ramal/&lt;ramal_id&gt;</code></li>\
<li><a href=\"/api/rodovias\">/api/rodovias</a></li>\
<li><code>/api/rodovia/&lt;nome&gt;</code></li>\
</ul>\
</body></html>",
        env!("CARGO_PKG_VERSION"),
    );
    let mut resp = Response::new(Body::from(html));
    resp.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    state
        .metrics
        .observe_request("/", StatusCode::OK, started.elapsed());
    with_request_id(resp, &request_id)
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let (status, payload) = match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            json!({"status": "healthy", "database": "connected"}),
        ),
        Err(e) => {
            tracing::error!(error = %e, backend = state.store.backend_tag(), "health probe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"status": "unhealthy", "database": "disconnected"}),
            )
        }
    };
    let resp = (status, Json(payload)).into_response();
    state
        .metrics
        .observe_request("/healthz", status, started.elapsed());
    with_request_id(resp, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.render_text();
    let mut resp = Response::new(Body::from(body));
    resp.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp
}

pub(crate) async fn not_found_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let resp = api_error_response(StatusCode::NOT_FOUND, ApiError::not_found("endpoint"));
    with_request_id(resp, &request_id)
}
