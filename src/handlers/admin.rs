use actix_web::{HttpResponse, web};

use crate::database::models::ActivityQuery;
use crate::database::repositories::ActivityRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

const DEFAULT_FEED_LIMIT: i64 = 50;
const MAX_FEED_LIMIT: i64 = 200;

/// Recent audit entries, newest first. Admin only.
pub async fn activity_feed(
    claims: Claims,
    activity_repository: web::Data<ActivityRepository>,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_FEED_LIMIT)
        .clamp(1, MAX_FEED_LIMIT);

    let entries = activity_repository.recent(limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}
