use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use staffsync_be::Config;
use staffsync_be::database::{
    init_database,
    repositories::{
        ActivityRepository, AnnouncementRepository, AttendanceRepository, LeaveRepository,
        LoanRepository, MeetingRepository, NoticePeriodRepository, TaskRepository, UserRepository,
    },
};
use staffsync_be::middleware::{
    RateLimitStore, RequestIdMiddleware, RequestInfoMiddleware, cleanup_rate_limits,
};
use staffsync_be::routes;
use staffsync_be::services::{
    ActivityLogger, AttendancePolicy, AuthService, ClockEngine, LeaveReconciler,
};

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let user_repository = UserRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let leave_repository = LeaveRepository::new(pool.clone());
    let announcement_repository = AnnouncementRepository::new(pool.clone());
    let meeting_repository = MeetingRepository::new(pool.clone());
    let task_repository = TaskRepository::new(pool.clone());
    let loan_repository = LoanRepository::new(pool.clone());
    let notice_period_repository = NoticePeriodRepository::new(pool.clone());
    let activity_repository = ActivityRepository::new(pool.clone());

    let auth_service = AuthService::new(config.clone(), user_repository.clone());
    let activity_logger = ActivityLogger::new(activity_repository.clone());
    let clock_engine = ClockEngine::new(
        attendance_repository.clone(),
        AttendancePolicy::from_config(&config),
    );
    let leave_reconciler = LeaveReconciler::new(
        pool.clone(),
        leave_repository.clone(),
        attendance_repository.clone(),
    );

    let user_repo_data = web::Data::new(user_repository);
    let attendance_repo_data = web::Data::new(attendance_repository);
    let leave_repo_data = web::Data::new(leave_repository);
    let announcement_repo_data = web::Data::new(announcement_repository);
    let meeting_repo_data = web::Data::new(meeting_repository);
    let task_repo_data = web::Data::new(task_repository);
    let loan_repo_data = web::Data::new(loan_repository);
    let notice_period_repo_data = web::Data::new(notice_period_repository);
    let activity_repo_data = web::Data::new(activity_repository);
    let auth_service_data = web::Data::new(auth_service);
    let activity_logger_data = web::Data::new(activity_logger);
    let clock_engine_data = web::Data::new(clock_engine);
    let leave_reconciler_data = web::Data::new(leave_reconciler);
    let config_data = web::Data::new(config.clone());

    // One store shared by every worker, swept periodically so idle IPs
    // don't accumulate.
    let login_rate_store = RateLimitStore::new();
    tokio::spawn(cleanup_rate_limits(login_rate_store.clone(), 900));

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        // Development accepts any origin; elsewhere only the configured one.
        let cors = if config.is_development() {
            Cors::permissive()
        } else {
            Cors::default()
                .allowed_origin(&config.client_base_url)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    "Authorization",
                    "Content-Type",
                    "Accept",
                    "X-Requested-With",
                    "X-Request-Id",
                ])
                .max_age(3600)
        };

        App::new()
            .app_data(user_repo_data.clone())
            .app_data(attendance_repo_data.clone())
            .app_data(leave_repo_data.clone())
            .app_data(announcement_repo_data.clone())
            .app_data(meeting_repo_data.clone())
            .app_data(task_repo_data.clone())
            .app_data(loan_repo_data.clone())
            .app_data(notice_period_repo_data.clone())
            .app_data(activity_repo_data.clone())
            .app_data(auth_service_data.clone())
            .app_data(activity_logger_data.clone())
            .app_data(clock_engine_data.clone())
            .app_data(leave_reconciler_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(RequestInfoMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{User-Agent}i" %T request_id=%{x-request-id}o"#,
            ))
            .service(health)
            .configure(routes::configure(login_rate_store.clone()))
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
