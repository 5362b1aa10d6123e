use crate::http::handlers::{
    api_error_response, propagated_request_id, with_request_id,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::info;
use viario_api::{
    ApiError, HighwayDetails, HighwayNameRow, MunicipalityRow, SegmentDetail, SegmentRow,
};
use viario_model::{sanitize_input, MunicipalityId, SegmentId};

fn store_failure_response(route: &str, e: &crate::store::StoreError) -> Response {
    tracing::error!(route = %route, error = %e, "registry store query failed");
    api_error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::store_unavailable(&e.0),
    )
}

pub(crate) async fn municipios_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    const ROUTE: &str = "/api/municipios";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.store.municipalities().await {
        Ok(rows) => {
            let rows: Vec<MunicipalityRow> =
                rows.into_iter().map(MunicipalityRow::from).collect();
            Json(rows).into_response()
        }
        Err(e) => store_failure_response(ROUTE, &e),
    };
    state
        .metrics
        .observe_request(ROUTE, resp.status(), started.elapsed());
    with_request_id(resp, &request_id)
}

pub(crate) async fn ramais_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<i64>,
) -> impl IntoResponse {
    const ROUTE: &str = "/api/ramais/{municipio_id}";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match MunicipalityId::new(raw_id) {
        Err(e) => api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("municipio_id", &e.to_string()),
        ),
        Ok(municipality) => match state.store.segments_by_municipality(municipality).await {
            Ok(segments) => {
                let rows: Vec<SegmentRow> =
                    segments.into_iter().map(SegmentRow::from_record).collect();
                Json(rows).into_response()
            }
            Err(e) => store_failure_response(ROUTE, &e),
        },
    };
    state
        .metrics
        .observe_request(ROUTE, resp.status(), started.elapsed());
    with_request_id(resp, &request_id)
}

pub(crate) async fn ramal_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<i64>,
) -> impl IntoResponse {
    const ROUTE: &str = "/api/ramal/{ramal_id}";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match SegmentId::new(raw_id) {
        Err(e) => api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("ramal_id", &e.to_string()),
        ),
        Ok(segment) => match state.store.segment_detail(segment).await {
            Ok(Some(detail)) => Json(SegmentDetail::from_record(detail)).into_response(),
            Ok(None) => api_error_response(StatusCode::NOT_FOUND, ApiError::not_found("ramal")),
            Err(e) => store_failure_response(ROUTE, &e),
        },
    };
    state
        .metrics
        .observe_request(ROUTE, resp.status(), started.elapsed());
    with_request_id(resp, &request_id)
}

pub(crate) async fn rodovias_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    const ROUTE: &str = "/api/rodovias";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.store.highway_names().await {
        Ok(names) => {
            let rows: Vec<HighwayNameRow> = names
                .into_iter()
                .map(|rodovia| HighwayNameRow { rodovia })
                .collect();
            Json(rows).into_response()
        }
        Err(e) => store_failure_response(ROUTE, &e),
    };
    state
        .metrics
        .observe_request(ROUTE, resp.status(), started.elapsed());
    with_request_id(resp, &request_id)
}

pub(crate) async fn rodovia_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_name): Path<String>,
) -> impl IntoResponse {
    const ROUTE: &str = "/api/rodovia/{nome}";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let name = sanitize_input(&raw_name, state.api.highway_name_max_len);
    let resp = if name.is_empty() {
        api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("nome", "highway name is empty after sanitation"),
        )
    } else {
        match state.store.highway_sections(&name).await {
            Ok(sections) => Json(HighwayDetails::from_sections(name, sections)).into_response(),
            Err(e) => store_failure_response(ROUTE, &e),
        }
    };
    state
        .metrics
        .observe_request(ROUTE, resp.status(), started.elapsed());
    with_request_id(resp, &request_id)
}

/// Both POST routes only validate and log; nothing is written to the
/// read-only registry snapshot.
fn accept_submission(
    state: &AppState,
    headers: &HeaderMap,
    route: &'static str,
    body: &Bytes,
    success_message: &str,
    log_line: &'static str,
    started: Instant,
) -> Response {
    let request_id = propagated_request_id(headers, state);
    let payload: Option<Value> = serde_json::from_slice(body).ok();
    let resp = match payload {
        Some(value) if submission_has_content(&value) => {
            info!(payload = %value, "{log_line}");
            Json(json!({"success": true, "message": success_message})).into_response()
        }
        _ => api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_param("body", "expected a non-empty JSON payload"),
        ),
    };
    state
        .metrics
        .observe_request(route, resp.status(), started.elapsed());
    with_request_id(resp, &request_id)
}

/// Empty containers and falsy scalars (`null`, `false`, `0`, `""`) carry
/// nothing to register.
fn submission_has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
    }
}

pub(crate) async fn solicitacao_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    accept_submission(
        &state,
        &headers,
        "/api/solicitacao",
        &body,
        "Solicitação registrada com sucesso!",
        "nova solicitação registrada",
        Instant::now(),
    )
}

pub(crate) async fn cadastro_ramal_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    accept_submission(
        &state,
        &headers,
        "/api/cadastro-ramal",
        &body,
        "Solicitação de cadastro registrada com sucesso!",
        "novo cadastro de ramal registrado",
        Instant::now(),
    )
}
