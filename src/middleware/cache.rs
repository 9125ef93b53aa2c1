//! Read-through response cache for hot GET endpoints.
//!
//! Entries are keyed on a global generation counter plus method, URI and
//! the caller's Authorization header, so users with different visibility
//! never share an entry. Every successful non-GET through the scope bumps
//! the generation, which retires every outstanding entry at once; the TTL
//! catches anything a write outside the scope would leave behind.

use actix_web::body::to_bytes;
use actix_web::{
    Error, HttpResponse,
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        Method, StatusCode,
        header::{self, HeaderMap, HeaderName, HeaderValue},
    },
    web::Bytes,
};
use futures_util::future::{LocalBoxFuture, Ready, ok};
use moka::future::Cache;
use std::{
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    task::{Context, Poll},
    time::Duration,
};

/// A stored response: status, headers and the full body, detached from
/// any actix types so it can live in the cache across requests.
#[derive(Clone)]
pub struct CachedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CachedResponse {
    fn capture(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        Self {
            status: status.as_u16(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
                .collect(),
            body: body.to_vec(),
        }
    }

    fn replay(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let mut builder = HttpResponse::build(status);
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                builder.insert_header((name, value));
            }
        }
        builder.body(Bytes::from(self.body.clone()))
    }
}

#[derive(Clone)]
pub struct CacheLayer {
    cache: Arc<Cache<String, CachedResponse>>,
    generation: Arc<AtomicU64>,
}

impl CacheLayer {
    pub fn new(max_capacity: u64, ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();
        Self {
            cache: Arc::new(cache),
            generation: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Retires every cached response. Entries from older generations are
    /// unreachable immediately and evicted by capacity or TTL.
    pub fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn key_for(&self, method: &Method, uri: &str, auth: Option<&str>) -> String {
        let generation = self.generation.load(Ordering::SeqCst);
        format!("v{generation}:{method}:{uri}:auth={}", auth.unwrap_or(""))
    }
}

/// Wraps a scope in the response cache.
pub struct ResponseCacheMiddleware {
    cache_layer: CacheLayer,
}

impl ResponseCacheMiddleware {
    pub fn new(cache_layer: CacheLayer) -> Self {
        Self { cache_layer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ResponseCacheMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
    <B as MessageBody>::Error: actix_web::ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ResponseCacheMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ResponseCacheMiddlewareService {
            service: Rc::new(service),
            cache_layer: self.cache_layer.clone(),
        })
    }
}

pub struct ResponseCacheMiddlewareService<S> {
    service: Rc<S>,
    cache_layer: CacheLayer,
}

impl<S, B> Service<ServiceRequest> for ResponseCacheMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
    <B as MessageBody>::Error: actix_web::ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cache_layer = self.cache_layer.clone();
        let svc = self.service.clone();

        // Writes are never cached. A successful one mutates the resource,
        // so it advances the generation and orphans every stored entry.
        if req.method() != Method::GET {
            return Box::pin(async move {
                let res = svc.call(req).await?;
                if res.status().is_success() {
                    cache_layer.bump();
                }
                Ok(res.map_into_boxed_body())
            });
        }

        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_owned());
        let key = cache_layer.key_for(req.method(), &req.uri().to_string(), auth_header.as_deref());

        Box::pin(async move {
            if let Some(cached) = cache_layer.cache.get(&key).await {
                let res = cached.replay().map_into_boxed_body();
                return Ok(req.into_response(res));
            }

            let res = svc.call(req).await?;
            let (req, res) = res.into_parts();
            let status = res.status();
            let headers = res.headers().clone();
            let body = to_bytes(res.into_body()).await?;

            // Failures pass through uncached.
            if status.is_success() {
                cache_layer
                    .cache
                    .insert(key, CachedResponse::capture(status, &headers, &body))
                    .await;
            }

            let mut builder = HttpResponse::build(status);
            for (name, value) in headers.iter() {
                builder.insert_header((name.clone(), value.clone()));
            }
            let out = builder.body(body).map_into_boxed_body();

            Ok(ServiceResponse::new(req, out))
        })
    }
}
