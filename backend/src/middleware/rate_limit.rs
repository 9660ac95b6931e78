//! Fixed-window rate limiting over Redis, keyed by client IP.
//!
//! Each window is a single counter: `INCR`, then `EXPIRE` when the counter is
//! fresh, reject once it passes the configured maximum. If Redis is
//! unreachable the limiter fails open — an unavailable counter must not take
//! the API down with it.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use bb8_redis::redis::AsyncCommands;

use crate::{error::AppError, state::AppState};

const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    match check_window(&state, &ip).await {
        Ok(true) => Ok(next.run(request).await),
        Ok(false) => Err(AppError::TooManyRequests(
            "Too many requests. Please try again later.".to_string(),
        )),
        Err(err) => {
            tracing::warn!(?err, %ip, "rate limiter unavailable, failing open");
            Ok(next.run(request).await)
        }
    }
}

/// Returns `Ok(true)` when the request fits in the current window.
async fn check_window(state: &AppState, ip: &str) -> anyhow::Result<bool> {
    let mut conn = state.redis.get().await?;
    let key = format!("{}{}", RATE_LIMIT_KEY_PREFIX, ip);

    let count: i64 = conn.incr(&key, 1).await?;
    if count == 1 {
        conn.expire::<_, ()>(&key, state.config.rate_limit_window_seconds)
            .await?;
    }

    Ok(count <= state.config.rate_limit_max_requests)
}

/// First `X-Forwarded-For` entry when present, else the peer address.
fn client_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request_with_forwarded(value: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().uri("/auth/login");
        if let Some(value) = value {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(Body::empty()).expect("build request")
    }

    #[test]
    fn client_ip_prefers_first_forwarded_entry() {
        let request = request_with_forwarded(Some("203.0.113.9, 10.0.0.1"));
        assert_eq!(client_ip(&request), "203.0.113.9");
    }

    #[test]
    fn client_ip_falls_back_to_connect_info() {
        let mut request = request_with_forwarded(None);
        request
            .extensions_mut()
            .insert(ConnectInfo("198.51.100.4:443".parse::<SocketAddr>().unwrap()));
        assert_eq!(client_ip(&request), "198.51.100.4");
    }

    #[test]
    fn client_ip_is_unknown_without_any_source() {
        let request = request_with_forwarded(None);
        assert_eq!(client_ip(&request), "unknown");
    }
}
