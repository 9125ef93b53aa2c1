use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{Action, CreateUserRequest, EntityType, LoginRequest, UserInfo};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ActivityLogger, AuthService, Claims};

pub async fn login(
    auth_service: web::Data<AuthService>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<LoginRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let login_request = request.into_inner();
    let email = login_request.email.clone();

    match auth_service.login(login_request).await {
        Ok(response) => {
            activity
                .log(
                    Some(response.user.id),
                    EntityType::USER,
                    response.user.id,
                    Action::LOGIN,
                    format!("{} signed in", response.user.email),
                    None,
                    &req,
                )
                .await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
        }
        Err(err) => {
            if matches!(err, AppError::Unauthorized) {
                activity
                    .log(
                        None,
                        EntityType::USER,
                        Uuid::nil(),
                        Action::LOGIN_FAILED,
                        format!("Failed sign-in attempt for {}", email),
                        None,
                        &req,
                    )
                    .await;
            }
            Err(err)
        }
    }
}

pub async fn me(
    claims: Claims,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = auth_service.get_user(claims.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}

/// Employee directory, admin only.
pub async fn all_users(
    claims: Claims,
    user_repository: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let users = user_repository.all_users().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

/// Provision a new account, admin only.
pub async fn register(
    claims: Claims,
    auth_service: web::Data<AuthService>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<CreateUserRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let response = auth_service.register(request.into_inner()).await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::USER,
            response.user.id,
            Action::CREATED,
            format!("Provisioned account for {}", response.user.email),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}
