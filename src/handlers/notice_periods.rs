use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{
    Action, EntityType, NoticePeriod, NoticePeriodInput, NoticePeriodUpdate,
};
use crate::database::repositories::NoticePeriodRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ActivityLogger, Claims};

/// Files a resignation. Only one notice may be in flight per employee.
pub async fn create_notice_period(
    claims: Claims,
    notice_repository: web::Data<NoticePeriodRepository>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<NoticePeriodInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    if notice_repository
        .find_active_for_employee(claims.user_id())
        .await?
        .is_some()
    {
        return Err(AppError::bad_request(
            "A notice period is already in progress",
        ));
    }

    let notice = NoticePeriod::new(request.into_inner(), claims.user_id());
    notice_repository.create(&notice).await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::NOTICE_PERIOD,
            notice.id,
            Action::CREATED,
            format!(
                "Filed resignation effective {}, last working day {}",
                notice.resignation_date, notice.last_working_day
            ),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(notice)))
}

pub async fn my_notice_periods(
    claims: Claims,
    notice_repository: web::Data<NoticePeriodRepository>,
) -> Result<HttpResponse, AppError> {
    let notices = notice_repository
        .list_for_employee(claims.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(notices)))
}

pub async fn list_notice_periods(
    claims: Claims,
    notice_repository: web::Data<NoticePeriodRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let notices = notice_repository.list_all().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(notices)))
}

pub async fn get_notice_period(
    claims: Claims,
    notice_repository: web::Data<NoticePeriodRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let notice = notice_repository
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Notice period not found"))?;

    if !claims.is_admin() && notice.employee_id != claims.user_id() {
        return Err(AppError::forbidden("Not your notice period"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(notice)))
}

/// Offboarding progression: status, checklist flags and comments. Admin
/// only.
pub async fn update_notice_period(
    claims: Claims,
    notice_repository: web::Data<NoticePeriodRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    request: web::Json<NoticePeriodUpdate>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();
    let updated = notice_repository
        .update(id, &request.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Notice period not found"))?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::NOTICE_PERIOD,
            id,
            Action::UPDATED,
            format!("Notice period moved to {}", updated.status),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

pub async fn delete_notice_period(
    claims: Claims,
    notice_repository: web::Data<NoticePeriodRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();
    if !notice_repository.delete(id).await? {
        return Err(AppError::not_found("Notice period not found"));
    }

    activity
        .log(
            Some(claims.user_id()),
            EntityType::NOTICE_PERIOD,
            id,
            Action::DELETED,
            "Withdrew notice period".to_string(),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Notice period removed")))
}
