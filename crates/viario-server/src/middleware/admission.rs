use crate::http::handlers::{api_error_response, client_key, route_label, with_request_id};
use crate::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::warn;
use viario_api::ApiError;

/// Admission gate in front of every data route. A denied key gets a 429
/// before any handler, classifier or store work happens.
pub(crate) async fn enforce_ip_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let key = client_key(req.headers(), peer);
    if !state.ip_limiter.allow(&key, &state.api.rate_limit_per_ip) {
        let route = route_label(req.uri().path());
        warn!(client = %key, route = %route, "request denied by rate limit");
        let request_id = crate::http::handlers::propagated_request_id(req.headers(), &state);
        let resp = api_error_response(StatusCode::TOO_MANY_REQUESTS, ApiError::rate_limited());
        state
            .metrics
            .observe_request(&route, StatusCode::TOO_MANY_REQUESTS, started.elapsed());
        return with_request_id(resp, &request_id);
    }
    next.run(req).await
}
