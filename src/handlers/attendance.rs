use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;

use crate::database::models::{
    Action, AttendanceListQuery, ClockInRequest, EntityType, MyAttendanceQuery,
};
use crate::database::repositories::AttendanceRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestInfo;
use crate::services::{ActivityLogger, Claims, ClockEngine, workday};

pub async fn clock_in(
    claims: Claims,
    engine: web::Data<ClockEngine>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<ClockInRequest>,
    info: RequestInfo,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now().naive_utc();
    let body = request.into_inner();

    let record = engine
        .clock_in(claims.user_id(), now, info.ip_address, body.location)
        .await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::ATTENDANCE,
            record.id,
            Action::CLOCK_IN,
            format!("Clocked in on {}", record.date),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(record)))
}

pub async fn clock_out(
    claims: Claims,
    engine: web::Data<ClockEngine>,
    activity: web::Data<ActivityLogger>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now().naive_utc();

    let record = engine.clock_out(claims.user_id(), now).await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::ATTENDANCE,
            record.id,
            Action::CLOCK_OUT,
            format!(
                "Clocked out on {} ({} hours)",
                record.date,
                record.working_hours.unwrap_or_default()
            ),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

pub async fn my_attendance(
    claims: Claims,
    attendance_repository: web::Data<AttendanceRepository>,
    query: web::Query<MyAttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let (from, to) = workday::month_filter(query.month, query.year)?;

    let records = attendance_repository
        .list_for_employee(claims.user_id(), from, to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

/// Ledger listing across employees, admin only.
pub async fn all_attendance(
    claims: Claims,
    attendance_repository: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let filters = query.into_inner();
    let (from, to) = workday::month_filter(filters.month, filters.year)?;

    let records = attendance_repository
        .list_all(filters.employee_id, filters.status, from, to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}
