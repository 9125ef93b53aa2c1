use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::database::models::{Action, EntityType, Meeting, MeetingDetails, MeetingInput};
use crate::database::repositories::MeetingRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ActivityLogger, Claims};

fn validate_input(input: &MeetingInput) -> Result<(), AppError> {
    let time_format = Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    if !time_format.is_match(&input.time) {
        return Err(AppError::bad_request(
            "Meeting time must be in HH:MM format",
        ));
    }

    let link_format = Regex::new(r"^https?://\S+$").unwrap();
    if !link_format.is_match(&input.link) {
        return Err(AppError::bad_request(
            "Meeting link must be a valid http(s) URL",
        ));
    }

    if input.participants.is_empty() {
        return Err(AppError::bad_request(
            "At least one participant is required",
        ));
    }

    Ok(())
}

pub async fn create_meeting(
    claims: Claims,
    meeting_repository: web::Data<MeetingRepository>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<MeetingInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let input = request.into_inner();
    validate_input(&input)?;

    // Only creation insists on a future date; edits to a meeting that has
    // since passed remain possible.
    if input.date < Utc::now().naive_utc().date() {
        return Err(AppError::bad_request("Meeting date cannot be in the past"));
    }

    let meeting = Meeting::new(&input, claims.user_id());

    meeting_repository
        .create(&meeting, &input.participants)
        .await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::MEETING,
            meeting.id,
            Action::CREATED,
            format!("Scheduled \"{}\" on {} {}", meeting.title, meeting.date, meeting.time),
            None,
            &req,
        )
        .await;

    let participants = meeting_repository.participants(meeting.id).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(MeetingDetails {
        meeting,
        participants,
    })))
}

/// Employees see meetings they organize or attend; admins see all.
pub async fn list_meetings(
    claims: Claims,
    meeting_repository: web::Data<MeetingRepository>,
) -> Result<HttpResponse, AppError> {
    let meetings = if claims.is_admin() {
        meeting_repository.list_all().await?
    } else {
        meeting_repository.list_for_user(claims.user_id()).await?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(meetings)))
}

pub async fn get_meeting(
    claims: Claims,
    meeting_repository: web::Data<MeetingRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let meeting = meeting_repository
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Meeting not found"))?;

    let participants = meeting_repository.participants(meeting.id).await?;

    if !claims.is_admin()
        && meeting.organizer_id != claims.user_id()
        && !participants.iter().any(|p| p.id == claims.user_id())
    {
        return Err(AppError::forbidden("Not a participant of this meeting"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(MeetingDetails {
        meeting,
        participants,
    })))
}

pub async fn update_meeting(
    claims: Claims,
    meeting_repository: web::Data<MeetingRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    request: web::Json<MeetingInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = meeting_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Meeting not found"))?;

    if !claims.is_admin() && existing.organizer_id != claims.user_id() {
        return Err(AppError::forbidden("Only the organizer can edit a meeting"));
    }

    let input = request.into_inner();
    validate_input(&input)?;

    let updated = meeting_repository
        .update(id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Meeting not found"))?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::MEETING,
            id,
            Action::UPDATED,
            format!("Updated meeting \"{}\"", updated.title),
            None,
            &req,
        )
        .await;

    let participants = meeting_repository.participants(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MeetingDetails {
        meeting: updated,
        participants,
    })))
}

pub async fn delete_meeting(
    claims: Claims,
    meeting_repository: web::Data<MeetingRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = meeting_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Meeting not found"))?;

    if !claims.is_admin() && existing.organizer_id != claims.user_id() {
        return Err(AppError::forbidden(
            "Only the organizer can cancel a meeting",
        ));
    }

    meeting_repository.delete(id).await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::MEETING,
            id,
            Action::DELETED,
            format!("Cancelled meeting \"{}\"", existing.title),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Meeting cancelled")))
}
