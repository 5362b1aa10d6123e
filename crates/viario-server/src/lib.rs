#![forbid(unsafe_code)]
//! HTTP catalog query service for the Viário road registry.
//!
//! Every data route passes the per-client admission gate before any
//! handler runs; road-segment rows are augmented by the construction
//! classifier on the way out.

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod middleware;
mod store;
mod telemetry;

pub use config::{
    validate_startup_config_contract, ApiConfig, RateLimitConfig, CONFIG_SCHEMA_VERSION,
};
pub use store::fake::FakeRegistry;
pub use store::sqlite::SqliteRegistry;
pub use store::{RegistryBackend, StoreError};
pub use telemetry::metrics::RequestMetrics;
pub use telemetry::rate_limiter::RateLimiter;

pub const CRATE_NAME: &str = "viario-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistryBackend>,
    pub api: ApiConfig,
    pub(crate) ip_limiter: Arc<RateLimiter>,
    pub(crate) metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn RegistryBackend>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<dyn RegistryBackend>, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            ip_limiter: Arc::new(RateLimiter::new()),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Background task that keeps admission-gate state bounded by dropping
/// client keys with fully expired windows.
pub fn spawn_rate_limit_sweeper(state: &AppState) {
    let limiter = Arc::clone(&state.ip_limiter);
    let cfg = state.api.rate_limit_per_ip.clone();
    let interval = state.api.rate_limit_sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            limiter.sweep(&cfg);
        }
    });
}

pub fn build_router(state: AppState) -> Router {
    // The landing page and every data route share one admission contract;
    // probe and ops routes are exempt on purpose.
    let gated = Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/api/municipios", get(http::endpoints::municipios_handler))
        .route(
            "/api/ramais/:municipio_id",
            get(http::endpoints::ramais_handler),
        )
        .route("/api/ramal/:ramal_id", get(http::endpoints::ramal_handler))
        .route("/api/rodovias", get(http::endpoints::rodovias_handler))
        .route("/api/rodovia/:nome", get(http::endpoints::rodovia_handler))
        .route(
            "/api/solicitacao",
            post(http::endpoints::solicitacao_handler),
        )
        .route(
            "/api/cadastro-ramal",
            post(http::endpoints::cadastro_ramal_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admission::enforce_ip_rate_limit,
        ));

    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .merge(gated)
        .fallback(http::handlers::not_found_handler)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::security::security_checks,
        ))
        .layer(axum_middleware::from_fn(
            middleware::security::set_security_headers,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
