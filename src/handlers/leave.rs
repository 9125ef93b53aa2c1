use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{
    Action, ApplyLeaveRequest, EntityType, LeaveDecisionRequest, LeaveListQuery, LeaveStatus,
};
use crate::database::repositories::LeaveRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::{ActivityLogger, Claims, LeaveReconciler};

pub async fn apply_leave(
    claims: Claims,
    reconciler: web::Data<LeaveReconciler>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<ApplyLeaveRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let leave = reconciler
        .apply(claims.user_id(), request.into_inner())
        .await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::LEAVE,
            leave.id,
            Action::APPLIED,
            format!(
                "Applied for {} leave, {} to {}",
                leave.leave_type, leave.start_date, leave.end_date
            ),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(leave)))
}

pub async fn my_leaves(
    claims: Claims,
    leave_repository: web::Data<LeaveRepository>,
) -> Result<HttpResponse, AppError> {
    let leaves = leave_repository.list_for_employee(claims.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(leaves)))
}

/// Review queue across employees, admin only.
pub async fn all_leaves(
    claims: Claims,
    leave_repository: web::Data<LeaveRepository>,
    query: web::Query<LeaveListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let leaves = leave_repository.list_all(query.into_inner().status).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(leaves)))
}

/// Approve or reject a request, admin only. The ledger is reconciled in
/// the same transaction as the decision.
pub async fn decide_leave(
    claims: Claims,
    reconciler: web::Data<LeaveReconciler>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    request: web::Json<LeaveDecisionRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let leave_id = path.into_inner();
    let decision = request.into_inner();
    let decision_status = decision.status.clone();

    match reconciler
        .decide(leave_id, decision.status, claims.user_id(), decision.notes)
        .await
    {
        Ok(leave) => {
            let action = if decision_status == LeaveStatus::Approved {
                Action::APPROVED
            } else {
                Action::REJECTED
            };

            activity
                .log(
                    Some(claims.user_id()),
                    EntityType::LEAVE,
                    leave.id,
                    action,
                    format!(
                        "Leave {} to {} {}",
                        leave.start_date, leave.end_date, leave.status
                    ),
                    ActivityLogger::detail(&[("status", leave.status.as_str())]),
                    &req,
                )
                .await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(leave)))
        }
        Err(err @ (AppError::DatabaseError(_) | AppError::InternalServerError(_))) => {
            let trace = req.request_id().unwrap_or_else(|| "untracked".to_string());
            activity
                .log(
                    Some(claims.user_id()),
                    EntityType::LEAVE,
                    leave_id,
                    Action::RECONCILE_FAILED,
                    format!(
                        "Ledger reconciliation failed for leave {} (request {})",
                        leave_id, trace
                    ),
                    None,
                    &req,
                )
                .await;
            Err(err)
        }
        Err(err) => Err(err),
    }
}
