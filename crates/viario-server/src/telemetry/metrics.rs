use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Per-route request counters and latency samples.
#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self
            .latency_ns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(latency.as_nanos() as u64);
    }

    /// Plain-text exposition for the `/metrics` endpoint.
    #[must_use]
    pub fn render_text(&self) -> String {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut lines: Vec<String> = counts
            .iter()
            .map(|((route, status), count)| {
                format!("viario_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}")
            })
            .collect();
        drop(counts);
        let latency_map = self
            .latency_ns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (route, samples) in latency_map.iter() {
            if samples.is_empty() {
                continue;
            }
            let sum: u64 = samples.iter().sum();
            lines.push(format!(
                "viario_request_latency_ns_avg{{route=\"{route}\"}} {}",
                sum / samples.len() as u64
            ));
        }
        lines.sort();
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
