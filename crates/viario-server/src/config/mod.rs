use serde::Serialize;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Sliding-window admission limits for one client key.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub rate_limit_per_ip: RateLimitConfig,
    /// Interval of the background sweep that drops client keys whose
    /// windows have fully expired, keeping limiter state bounded.
    pub rate_limit_sweep_interval: Duration,
    pub highway_name_max_len: usize,
    /// Lowercase user-agent fragments that get a 403 before routing.
    pub blocked_user_agents: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            rate_limit_per_ip: RateLimitConfig::default(),
            rate_limit_sweep_interval: Duration::from_secs(60),
            highway_name_max_len: 50,
            blocked_user_agents: ["sqlmap", "nikto", "metasploit", "nmap"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

pub fn validate_startup_config_contract(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max_body_bytes must be > 0".to_string());
    }
    if api.rate_limit_per_ip.max_requests == 0 {
        return Err("rate limit max_requests must be > 0".to_string());
    }
    if api.rate_limit_per_ip.window.is_zero() {
        return Err("rate limit window must be > 0".to_string());
    }
    if api.rate_limit_sweep_interval.is_zero() {
        return Err("rate limit sweep interval must be > 0".to_string());
    }
    if api.highway_name_max_len == 0 {
        return Err("highway_name_max_len must be > 0".to_string());
    }
    if api
        .blocked_user_agents
        .iter()
        .any(|agent| agent.trim().is_empty() || *agent != agent.to_lowercase())
    {
        return Err("blocked_user_agents entries must be non-empty lowercase".to_string());
    }
    Ok(())
}
