use actix_web::{HttpRequest, HttpResponse, web};

use crate::database::models::{Action, Announcement, AnnouncementInput, EntityType};
use crate::database::repositories::AnnouncementRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ActivityLogger, Claims};

pub async fn list_announcements(
    claims: Claims,
    announcement_repository: web::Data<AnnouncementRepository>,
) -> Result<HttpResponse, AppError> {
    let announcements = announcement_repository.list(claims.is_admin()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(announcements)))
}

pub async fn get_announcement(
    claims: Claims,
    announcement_repository: web::Data<AnnouncementRepository>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, AppError> {
    let announcement = announcement_repository
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Announcement not found"))?;

    if !claims.is_admin() && !announcement.visible_to_everyone() {
        return Err(AppError::not_found("Announcement not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(announcement)))
}

/// Title substring search. An empty result is a normal 200, not an error.
pub async fn search_announcements(
    claims: Claims,
    announcement_repository: web::Data<AnnouncementRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let announcements = announcement_repository
        .search(&path.into_inner(), claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(announcements)))
}

pub async fn create_announcement(
    claims: Claims,
    announcement_repository: web::Data<AnnouncementRepository>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<AnnouncementInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let announcement = Announcement::new(request.into_inner(), claims.user_id());
    announcement_repository.create(&announcement).await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::ANNOUNCEMENT,
            announcement.id,
            Action::CREATED,
            format!("Posted announcement \"{}\"", announcement.title),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(announcement)))
}

pub async fn update_announcement(
    claims: Claims,
    announcement_repository: web::Data<AnnouncementRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<uuid::Uuid>,
    request: web::Json<AnnouncementInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();
    let updated = announcement_repository
        .update(id, request.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Announcement not found"))?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::ANNOUNCEMENT,
            id,
            Action::UPDATED,
            format!("Updated announcement \"{}\"", updated.title),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

pub async fn delete_announcement(
    claims: Claims,
    announcement_repository: web::Data<AnnouncementRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<uuid::Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();
    if !announcement_repository.delete(id).await? {
        return Err(AppError::not_found("Announcement not found"));
    }

    activity
        .log(
            Some(claims.user_id()),
            EntityType::ANNOUNCEMENT,
            id,
            Action::DELETED,
            "Deleted announcement".to_string(),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Announcement deleted")))
}
