#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, web};
use anyhow::Result;
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::SqlitePool;
use std::env;
use tempfile::TempDir;

use staffsync_be::config::Config;
use staffsync_be::database::init_database;
use staffsync_be::database::models::*;
use staffsync_be::database::repositories::{
    ActivityRepository, AnnouncementRepository, AttendanceRepository, LeaveRepository,
    LoanRepository, MeetingRepository, NoticePeriodRepository, TaskRepository, UserRepository,
};
use staffsync_be::middleware::RateLimitStore;
use staffsync_be::routes;
use staffsync_be::services::{
    ActivityLogger, AttendancePolicy, AuthService, Claims, ClockEngine, LeaveReconciler,
};

/// Isolated on-disk database plus the config the app under test runs with.
/// The temp dir is dropped with the context, taking the database with it.
pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());

        let config = Config {
            database_url: database_url.clone(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:5173".to_string(),
            late_after: chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            half_day_under_hours: 4.0,
        };

        let pool = init_database(&database_url).await?;

        Ok(TestContext {
            pool,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// The full application as main() wires it, minus the server-level
/// middleware, so tests exercise the real route tree.
pub fn create_app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    let user_repository = UserRepository::new(ctx.pool.clone());
    let attendance_repository = AttendanceRepository::new(ctx.pool.clone());
    let leave_repository = LeaveRepository::new(ctx.pool.clone());
    let announcement_repository = AnnouncementRepository::new(ctx.pool.clone());
    let meeting_repository = MeetingRepository::new(ctx.pool.clone());
    let task_repository = TaskRepository::new(ctx.pool.clone());
    let loan_repository = LoanRepository::new(ctx.pool.clone());
    let notice_period_repository = NoticePeriodRepository::new(ctx.pool.clone());
    let activity_repository = ActivityRepository::new(ctx.pool.clone());

    let auth_service = AuthService::new(ctx.config.clone(), user_repository.clone());
    let activity_logger = ActivityLogger::new(activity_repository.clone());
    let clock_engine = ClockEngine::new(
        attendance_repository.clone(),
        AttendancePolicy::from_config(&ctx.config),
    );
    let leave_reconciler = LeaveReconciler::new(
        ctx.pool.clone(),
        leave_repository.clone(),
        attendance_repository.clone(),
    );

    App::new()
        .app_data(web::Data::new(ctx.config.clone()))
        .app_data(web::Data::new(user_repository))
        .app_data(web::Data::new(attendance_repository))
        .app_data(web::Data::new(leave_repository))
        .app_data(web::Data::new(announcement_repository))
        .app_data(web::Data::new(meeting_repository))
        .app_data(web::Data::new(task_repository))
        .app_data(web::Data::new(loan_repository))
        .app_data(web::Data::new(notice_period_repository))
        .app_data(web::Data::new(activity_repository))
        .app_data(web::Data::new(auth_service))
        .app_data(web::Data::new(activity_logger))
        .app_data(web::Data::new(clock_engine))
        .app_data(web::Data::new(leave_reconciler))
        .configure(routes::configure(RateLimitStore::new()))
}

/// Mock data generators. Emails are fixed per role so a test can create
/// an employee and an admin without tripping the unique constraint.
pub struct MockData;

impl MockData {
    pub fn employee() -> CreateUserRequest {
        CreateUserRequest {
            name: "Test Employee".to_string(),
            email: "employee@example.com".to_string(),
            phone: "5550001111".to_string(),
            password: "Password123!".to_string(),
            role: Some(UserRole::Employee),
        }
    }

    pub fn admin() -> CreateUserRequest {
        CreateUserRequest {
            name: "Test Admin".to_string(),
            email: "admin@example.com".to_string(),
            phone: "5550002222".to_string(),
            password: "Password123!".to_string(),
            role: Some(UserRole::Admin),
        }
    }

    pub fn colleague() -> CreateUserRequest {
        CreateUserRequest {
            name: "Test Colleague".to_string(),
            email: "colleague@example.com".to_string(),
            phone: "5550003333".to_string(),
            password: "Password123!".to_string(),
            role: Some(UserRole::Employee),
        }
    }

    pub fn outsider() -> CreateUserRequest {
        CreateUserRequest {
            name: "Test Outsider".to_string(),
            email: "outsider@example.com".to_string(),
            phone: "5550004444".to_string(),
            password: "Password123!".to_string(),
            role: Some(UserRole::Employee),
        }
    }
}

/// Inserts a user directly, bypassing the admin-gated registration route.
/// The low bcrypt cost keeps the suite fast; these hashes never leave tests.
pub async fn create_test_user(pool: &SqlitePool, user_data: &CreateUserRequest) -> User {
    let password_hash = bcrypt::hash(&user_data.password, 4).expect("Failed to hash password");
    let user = User::new(
        user_data.name.clone(),
        user_data.email.clone(),
        user_data.phone.clone(),
        password_hash,
        user_data.role.clone().unwrap_or_default(),
    );

    UserRepository::new(pool.clone())
        .create_user(&user)
        .await
        .expect("Failed to insert test user");

    user
}

pub struct AuthHelper;

impl AuthHelper {
    /// Mints a token the same way the auth service does, so tests can
    /// authenticate without a login round-trip.
    pub fn create_test_token(user: &User, config: &Config) -> String {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            exp: (chrono::Utc::now() + chrono::Duration::days(config.jwt_expiration_days))
                .timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_ref()),
        )
        .expect("Failed to encode test token")
    }

    pub fn auth_header(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }
}

pub struct TestAssertions;

impl TestAssertions {
    pub fn assert_success_response<T>(body: serde_json::Value) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        let response: staffsync_be::handlers::shared::ApiResponse<T> =
            serde_json::from_value(body).expect("Failed to parse response envelope");

        assert!(
            response.success,
            "Expected successful response but got error: {:?}",
            response.message
        );
        response.data.expect("Expected data in successful response")
    }

    pub async fn assert_record_count(pool: &SqlitePool, table: &str, expected_count: i64) {
        let query = format!("SELECT COUNT(*) as count FROM {}", table);
        let result = sqlx::query_scalar::<_, i64>(&query)
            .fetch_one(pool)
            .await
            .expect("Failed to count records");

        assert_eq!(
            result, expected_count,
            "Expected {} records in {} table, but found {}",
            expected_count, table, result
        );
    }
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
