use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};
use tower_http::cors::CorsLayer;

pub type IpRateLimiter = Arc<RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>>;

const GLOBAL_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(1000).unwrap();
const AUTH_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(300).unwrap();

pub fn create_global_rate_limiter() -> IpRateLimiter {
    Arc::new(RateLimiter::keyed(Quota::per_minute(GLOBAL_REQUESTS_PER_MINUTE)))
}

// Stricter quota for the credential endpoints.
pub fn create_auth_rate_limiter() -> IpRateLimiter {
    Arc::new(RateLimiter::keyed(Quota::per_minute(AUTH_REQUESTS_PER_MINUTE)))
}

pub async fn rate_limit_middleware(
    rate_limiter: IpRateLimiter,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_ip =
        if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
            addr.ip().to_string()
        } else {
            "unknown".to_string()
        };

    match rate_limiter.check_key(&client_ip) {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!("Rate limit exceeded for IP: {}", client_ip);
            Err(StatusCode::TOO_MANY_REQUESTS)
        }
    }
}

pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    tracing::info!("CORS allowed origins: {:?}", allowed_origins);

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_limiter_tracks_ips_separately() {
        let limiter: IpRateLimiter = Arc::new(RateLimiter::keyed(Quota::per_minute(
            NonZeroU32::new(1).unwrap(),
        )));

        assert!(limiter.check_key(&"10.0.0.1".to_string()).is_ok());
        assert!(limiter.check_key(&"10.0.0.1".to_string()).is_err());
        assert!(limiter.check_key(&"10.0.0.2".to_string()).is_ok());
    }
}
