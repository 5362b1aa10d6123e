#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use viario_server::{
    build_router, spawn_rate_limit_sweeper, validate_startup_config_contract, ApiConfig, AppState,
    RateLimitConfig, RegistryBackend, SqliteRegistry, CRATE_NAME,
};

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_duration_secs(name: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

/// Comma-separated override for the blocked user-agent fragments.
/// Fragments are matched lowercase, so the override is folded here.
fn env_agent_list(name: &str) -> Option<Vec<String>> {
    let raw = std::env::var(name).ok()?;
    let agents: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if agents.is_empty() {
        None
    } else {
        Some(agents)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("VIARIO_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn config_from_env() -> ApiConfig {
    let defaults = ApiConfig::default();
    ApiConfig {
        max_body_bytes: env_usize("VIARIO_MAX_BODY_BYTES", defaults.max_body_bytes),
        rate_limit_per_ip: RateLimitConfig {
            max_requests: env_u32(
                "VIARIO_RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_per_ip.max_requests,
            ),
            window: env_duration_secs("VIARIO_RATE_LIMIT_WINDOW_SECS", 60),
        },
        rate_limit_sweep_interval: env_duration_secs("VIARIO_RATE_LIMIT_SWEEP_SECS", 60),
        highway_name_max_len: env_usize(
            "VIARIO_HIGHWAY_NAME_MAX_LEN",
            defaults.highway_name_max_len,
        ),
        blocked_user_agents: env_agent_list("VIARIO_BLOCKED_USER_AGENTS")
            .unwrap_or(defaults.blocked_user_agents),
    }
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind = env_string("VIARIO_BIND", "0.0.0.0:5011");
    let db_path = env_string("VIARIO_DB_PATH", "artifacts/registry.sqlite");

    let api = config_from_env();
    validate_startup_config_contract(&api)?;

    let store = Arc::new(SqliteRegistry::new(&db_path));
    // A missing snapshot at boot is survivable; /healthz keeps reporting it.
    if let Err(e) = store.ping().await {
        warn!(db_path = %db_path, error = %e, "registry snapshot unavailable at startup");
    }

    let state = AppState::with_config(store, api);
    spawn_rate_limit_sweeper(&state);
    let app = build_router(state);

    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| format!("invalid VIARIO_BIND address {bind}: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {bind}: {e}"))?;
    info!(service = CRATE_NAME, bind = %bind, db_path = %db_path, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown_signal())
    .await
    .map_err(|e| format!("server failed: {e}"))
}
