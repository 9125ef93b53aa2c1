use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, CreateUserRequest, LoginRequest, User, UserRole};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

/// JWT payload. `sub` is the user id, `exp` a unix timestamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Gate for admin-only handlers.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin access required"))
        }
    }
}

fn claims_from_bearer(req: &HttpRequest) -> Result<Claims, ActixError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| ErrorUnauthorized("Missing or invalid authorization header"))?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ErrorUnauthorized("Missing or invalid authorization header"))?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ErrorUnauthorized("Invalid token"))
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_bearer(req))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(config: Config, user_repository: UserRepository) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn register(&self, request: CreateUserRequest) -> Result<AuthResponse, AppError> {
        let name = request.name.trim().to_string();
        if !(2..=50).contains(&name.chars().count()) {
            return Err(AppError::bad_request(
                "Name must be between 2 and 50 characters",
            ));
        }

        // Emails are stored lowercase so lookups stay case-insensitive.
        let email = request.email.trim().to_lowercase();
        if !(6..=50).contains(&email.chars().count()) {
            return Err(AppError::bad_request(
                "Email must be between 6 and 50 characters",
            ));
        }

        let phone = request.phone.trim().to_string();
        let phone_format = Regex::new(r"^\d{10}$").unwrap();
        if !phone_format.is_match(&phone) {
            return Err(AppError::bad_request(
                "Phone number must be exactly 10 digits",
            ));
        }

        if self.user_repository.email_exists(&email).await? {
            return Err(AppError::bad_request("Email already registered"));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|err| AppError::internal_server_error_message(err.to_string()))?;

        let user = User::new(
            name,
            email,
            phone,
            password_hash,
            request.role.unwrap_or_default(),
        );

        self.user_repository.create_user(&user).await?;

        let token = self.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// A wrong email and a wrong password produce the same error, so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_ok = verify(&request.password, &user.password_hash)
            .map_err(|err| AppError::internal_server_error_message(err.to_string()))?;
        if !password_ok {
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| AppError::internal_server_error_message("token expiry overflow"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|err| AppError::internal_server_error_message(err.to_string()))
    }
}
