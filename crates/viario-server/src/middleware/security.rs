use crate::http::handlers::api_error_response;
use crate::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::json;
use tracing::warn;
use viario_api::{ApiError, ApiErrorCode};

const CSP: &str = "default-src 'self'; script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
     style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
     font-src 'self' https://cdnjs.cloudflare.com";

/// Stamps the security headers onto every response, error paths included.
pub(crate) async fn set_security_headers(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert("x-xss-protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert("content-security-policy", HeaderValue::from_static(CSP));
    resp
}

/// Pre-routing checks: scanner user-agents get a 403, POSTs must declare a
/// JSON content type.
pub(crate) async fn security_checks(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();
    if state
        .api
        .blocked_user_agents
        .iter()
        .any(|fragment| user_agent.contains(fragment))
    {
        warn!(user_agent = %user_agent, "blocked suspicious user agent");
        return api_error_response(
            StatusCode::FORBIDDEN,
            ApiError::new(ApiErrorCode::AccessDenied, "access denied", json!({})),
        );
    }

    if req.method() == Method::POST {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with("application/json") {
            return api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    ApiErrorCode::UnsupportedMediaType,
                    "content-type must be application/json",
                    json!({"content_type": content_type}),
                ),
            );
        }
    }

    next.run(req).await
}
