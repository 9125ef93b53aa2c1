use anyhow::Result;
use chrono::NaiveTime;
use fake::Fake;
use fake::faker::internet::en::*;
use fake::faker::name::en::*;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::database::models::*;
use crate::database::repositories::UserRepository;

/// Isolated on-disk database with the full schema applied.
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_file: NamedTempFile,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(TestDb {
            pool,
            _temp_file: temp_file,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Seed accounts, randomized with `fake` so collisions between cases are
/// impossible.
pub struct MockData;

impl MockData {
    pub fn employee() -> CreateUserRequest {
        CreateUserRequest {
            name: Name().fake(),
            email: SafeEmail().fake(),
            phone: (1_000_000_000u64..9_999_999_999u64).fake::<u64>().to_string(),
            password: "Seedpass1!".to_string(),
            role: Some(UserRole::Employee),
        }
    }

    pub fn admin() -> CreateUserRequest {
        CreateUserRequest {
            role: Some(UserRole::Admin),
            ..Self::employee()
        }
    }
}

/// Insert a user row directly, bypassing the registration flow. The low
/// bcrypt cost keeps the suite fast; these hashes never leave tests.
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

/// Assertions shared by the suites.
pub struct TestAssertions;

impl TestAssertions {
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

impl Config {
    /// Fixed settings for tests: ephemeral port, throwaway secret, and the
    /// default attendance policy.
    pub fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:5173".to_string(),
            late_after: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            half_day_under_hours: 4.0,
        }
    }
}
