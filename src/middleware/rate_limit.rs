use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{net::SocketAddr, sync::Arc};
use tracing::debug;

use crate::api::dtos::ErrorResponse;
use crate::config::Config;

/// Above this many tracked clients, expired windows are swept on the next request.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_requests,
            window_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let window_seconds = i64::try_from(config.rate_limit_window().as_secs()).unwrap_or(i64::MAX);
        Self::new(config.rate_limit_max_requests(), window_seconds)
    }

    /// Counts one request from `ip`; `false` once the window's budget is spent.
    fn admit(&self, ip: String, now: DateTime<Utc>) -> bool {
        let window = Duration::seconds(self.window_seconds);
        if self.store.len() > SWEEP_THRESHOLD {
            self.store
                .retain(|_, data| now.signed_duration_since(data.window_start) < window);
        }

        let mut entry = self.store.entry(ip).or_insert_with(|| RateLimitData {
            count: 0,
            window_start: now,
        });
        let data = entry.value_mut();

        if now.signed_duration_since(data.window_start) >= window {
            data.count = 0;
            data.window_start = now;
        }

        data.count += 1;
        data.count <= self.max_requests
    }
}

/// IP-based fixed-window rate limiting.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    if !rate_limit.admit(addr.ip().to_string(), Utc::now()) {
        debug!(ip = %addr.ip(), "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Rate limit exceeded".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}
