use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{
    Action, EmiQuery, EmiQuote, EntityType, Loan, LoanApplication, LoanDecisionRequest,
    LoanListQuery, LoanStatus,
};
use crate::database::repositories::LoanRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ActivityLogger, Claims, workday};

pub async fn apply_for_loan(
    claims: Claims,
    loan_repository: web::Data<LoanRepository>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<LoanApplication>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let application = request.into_inner();
    if application.amount <= 0.0 {
        return Err(AppError::bad_request("Loan amount must be positive"));
    }
    if !(1..=60).contains(&application.repayment_period_months) {
        return Err(AppError::bad_request(
            "Repayment period must be between 1 and 60 months",
        ));
    }

    let loan = Loan::new(application, claims.user_id());
    loan_repository.create(&loan).await?;

    let action = if loan.status == LoanStatus::Submitted {
        Action::SUBMITTED
    } else {
        Action::CREATED
    };
    activity
        .log(
            Some(claims.user_id()),
            EntityType::LOAN,
            loan.id,
            action,
            format!("{} loan application for {:.2}", loan.status, loan.amount),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(loan)))
}

pub async fn my_loans(
    claims: Claims,
    loan_repository: web::Data<LoanRepository>,
) -> Result<HttpResponse, AppError> {
    let loans = loan_repository.list_for_employee(claims.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(loans)))
}

/// Sends a kept-back draft into review.
pub async fn submit_loan(
    claims: Claims,
    loan_repository: web::Data<LoanRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let loan = loan_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    if loan.employee_id != claims.user_id() {
        return Err(AppError::forbidden("Not your loan application"));
    }

    let moved = loan_repository
        .transition(id, &LoanStatus::Draft, &LoanStatus::Submitted, None, None)
        .await?;
    if !moved {
        return Err(AppError::AlreadyDecided(format!(
            "Loan is already {}",
            loan.status
        )));
    }

    activity
        .log(
            Some(claims.user_id()),
            EntityType::LOAN,
            id,
            Action::SUBMITTED,
            format!("Submitted loan application for {:.2}", loan.amount),
            None,
            &req,
        )
        .await;

    let submitted = loan_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(submitted)))
}

/// Interest-free installment quote; pure arithmetic, nothing persisted.
pub async fn emi_quote(
    _claims: Claims,
    query: web::Query<EmiQuery>,
) -> Result<HttpResponse, AppError> {
    let EmiQuery { amount, period } = query.into_inner();
    if amount <= 0.0 || period <= 0 {
        return Err(AppError::bad_request(
            "Amount and period must both be positive",
        ));
    }

    let quote = EmiQuote {
        amount,
        period_months: period,
        monthly_installment: workday::round2(amount / period as f64),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(quote)))
}

/// Review queue, admin only. Defaults to submitted applications; an
/// explicit status filter overrides.
pub async fn list_loans(
    claims: Claims,
    loan_repository: web::Data<LoanRepository>,
    query: web::Query<LoanListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let status = query.into_inner().status.unwrap_or(LoanStatus::Submitted);
    let loans = loan_repository.list(Some(status)).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(loans)))
}

/// Approve or reject a submitted application, admin only.
pub async fn decide_loan(
    claims: Claims,
    loan_repository: web::Data<LoanRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    request: web::Json<LoanDecisionRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();
    let decision = request.into_inner();

    if decision.status != LoanStatus::Approved && decision.status != LoanStatus::Rejected {
        return Err(AppError::bad_request(
            "Decision must be approved or rejected",
        ));
    }

    let loan = loan_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    let moved = loan_repository
        .transition(
            id,
            &LoanStatus::Submitted,
            &decision.status,
            Some(claims.user_id()),
            decision.comments.as_deref(),
        )
        .await?;
    if !moved {
        return Err(AppError::AlreadyDecided(format!(
            "Loan is already {}",
            loan.status
        )));
    }

    let action = if decision.status == LoanStatus::Approved {
        Action::APPROVED
    } else {
        Action::REJECTED
    };
    activity
        .log(
            Some(claims.user_id()),
            EntityType::LOAN,
            id,
            action,
            format!("Loan for {:.2} {}", loan.amount, decision.status),
            ActivityLogger::detail(&[("status", decision.status.as_str())]),
            &req,
        )
        .await;

    let decided = loan_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(decided)))
}

/// Pays out an approved loan, admin only.
pub async fn disburse_loan(
    claims: Claims,
    loan_repository: web::Data<LoanRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();

    let loan = loan_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    let moved = loan_repository
        .transition(
            id,
            &LoanStatus::Approved,
            &LoanStatus::Disbursed,
            None,
            None,
        )
        .await?;
    if !moved {
        return Err(AppError::AlreadyDecided(format!(
            "Loan is {}, not approved",
            loan.status
        )));
    }

    activity
        .log(
            Some(claims.user_id()),
            EntityType::LOAN,
            id,
            Action::DISBURSED,
            format!("Disbursed loan of {:.2}", loan.amount),
            None,
            &req,
        )
        .await;

    let disbursed = loan_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Loan not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(disbursed)))
}
