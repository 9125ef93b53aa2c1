pub mod cache;
pub mod rate_limit;
pub mod request_id;
pub mod request_info;

pub use cache::{CacheLayer, ResponseCacheMiddleware};
pub use rate_limit::{AuthRateLimiter, RateLimitStore, cleanup_rate_limits};
pub use request_id::{RequestIdExt, RequestIdMiddleware};
pub use request_info::{RequestInfo, RequestInfoMiddleware};
