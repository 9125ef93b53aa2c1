//! Fixed-window request limiting keyed by client IP. Only the login
//! route is wrapped with it; everything else rides on auth.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    net::IpAddr,
    rc::Rc,
    sync::{Arc, Mutex},
};

use crate::handlers::shared::ApiResponse;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: i64,
    /// Returned verbatim in the 429 body.
    pub message: String,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            max_requests,
            window_seconds,
            message: "Too many requests. Please try again later.".to_string(),
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = message;
        self
    }
}

#[derive(Debug)]
struct Window {
    hits: u32,
    opened: DateTime<Utc>,
}

impl Window {
    fn open() -> Self {
        Self {
            hits: 0,
            opened: Utc::now(),
        }
    }

    fn expired(&self, window_seconds: i64) -> bool {
        let span = Duration::try_seconds(window_seconds).unwrap_or(Duration::seconds(60));
        Utc::now() > self.opened + span
    }
}

/// Shared hit counters. Cloning is cheap; every clone sees the same
/// windows, so the middleware, handlers and the sweeper task can hold
/// their own handle.
#[derive(Clone)]
pub struct RateLimitStore {
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a hit and reports whether the caller is still within its
    /// window.
    fn allow(&self, ip: IpAddr, config: &RateLimitConfig) -> bool {
        let mut windows = self.windows.lock().unwrap();
        let window = windows.entry(ip).or_insert_with(Window::open);

        if window.expired(config.window_seconds) {
            *window = Window::open();
        }
        if window.hits >= config.max_requests {
            return false;
        }
        window.hits += 1;
        true
    }

    /// Drops windows older than the given horizon so the map cannot grow
    /// without bound.
    pub fn sweep(&self, horizon_seconds: i64) {
        let mut windows = self.windows.lock().unwrap();
        windows.retain(|_, window| !window.expired(horizon_seconds));
    }
}

impl Default for RateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RateLimitMiddleware {
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl RateLimitMiddleware {
    pub fn with_store(config: RateLimitConfig, store: RateLimitStore) -> Self {
        Self { store, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = futures_util::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        futures_util::future::ready(Ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimitStore,
    config: RateLimitConfig,
}

/// Peer address without the port. Requests that carry no peer address
/// (in-process test calls) are not limited.
fn client_ip(req: &ServiceRequest) -> Option<IpAddr> {
    req.connection_info()
        .peer_addr()
        .and_then(|addr| addr.split(':').next())
        .and_then(|host| host.parse().ok())
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let store = self.store.clone();
        let config = self.config.clone();

        Box::pin(async move {
            if let Some(ip) = client_ip(&req) {
                if !store.allow(ip, &config) {
                    log::warn!(
                        "{} exhausted its window of {} requests",
                        ip,
                        config.max_requests
                    );
                    let denied =
                        HttpResponse::TooManyRequests().json(ApiResponse::error(&config.message));
                    return Ok(req.into_response(denied).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Limiter presets for credential endpoints.
pub struct AuthRateLimiter;

impl AuthRateLimiter {
    /// Login attempts: 5 per 5 minutes per IP. The store is caller-owned so
    /// every worker and the sweeper task count against the same windows.
    pub fn login(store: RateLimitStore) -> RateLimitMiddleware {
        RateLimitMiddleware::with_store(
            RateLimitConfig::new(5, 300).with_message(
                "Too many login attempts. Please try again in 5 minutes.".to_string(),
            ),
            store,
        )
    }
}

/// Periodically drops stale windows from the shared store.
pub async fn cleanup_rate_limits(store: RateLimitStore, interval_seconds: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        store.sweep(3600);
        log::debug!("Swept expired rate limit windows");
    }
}
