#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::ManualClock;
use auth::SigningSecret;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use study_service::domain::authentication::ports::AuthServicePort;
use study_service::domain::authentication::service::AuthService;
use study_service::domain::plan::ports::PlanRepository;
use study_service::domain::plan::service::PlanService;
use study_service::domain::user::models::EmailAddress;
use study_service::domain::user::models::User;
use study_service::domain::user::models::UserId;
use study_service::domain::user::models::Username;
use study_service::domain::user::ports::UserRepository;
use study_service::domain::user::service::UserService;
use study_service::inbound::http::router::create_router;
use study_service::repositories::InMemoryPlanRepository;
use study_service::repositories::InMemoryUserRepository;
use study_service::repositories::PostgresPlanRepository;
use study_service::repositories::PostgresUserRepository;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Admin connection string for the Postgres tests; they are skipped when unset
pub const DATABASE_URL_VAR: &str = "DATABASE__URL";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Option<TestDb>,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub authenticator: Arc<Authenticator>,
    pub user_repository: Arc<dyn UserRepository>,
    pub auth_service: Arc<dyn AuthServicePort>,
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

impl TestApp {
    /// Spawn the application on in-memory stores
    pub async fn spawn() -> Self {
        Self::spawn_with(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPlanRepository::new()),
            None,
        )
        .await
    }

    /// Spawn the application on a fresh Postgres database, or None when
    /// `DATABASE__URL` is not set
    pub async fn spawn_postgres() -> Option<Self> {
        let db = TestDb::new().await?;

        let user_repository = Arc::new(PostgresUserRepository::new(db.pool.clone()));
        let plan_repository = Arc::new(PostgresPlanRepository::new(db.pool.clone()));

        Some(Self::spawn_with(user_repository, plan_repository, Some(db)).await)
    }

    async fn spawn_with<UR, PR>(
        user_repository: Arc<UR>,
        plan_repository: Arc<PR>,
        db: Option<TestDb>,
    ) -> Self
    where
        UR: UserRepository,
        PR: PlanRepository,
    {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::starting_now());
        let secret = SigningSecret::new(TEST_SECRET).expect("Failed to build signing secret");
        let authenticator = Arc::new(Authenticator::with_clock(
            &secret,
            Duration::minutes(TOKEN_TTL_MINUTES),
            clock.clone(),
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repository),
            Arc::clone(&authenticator),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
        let plan_service = Arc::new(PlanService::new(plan_repository));

        let router = create_router(auth_service.clone(), user_service, plan_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            db,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            clock,
            authenticator,
            user_repository,
            auth_service,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user through the API and return the response body
    pub async fn register(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/users")
            .json(&json!({
                "username": username,
                "email_address": format!("{}@example.com", username),
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in through the API and return the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Register and log in, returning the access token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        self.login(username, password).await
    }

    /// Insert a user straight into the store, skipping password hashing
    pub async fn insert_user(&self, username: &str) -> User {
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).expect("Invalid username"),
            email: EmailAddress::new(format!("{}@example.com", username))
                .expect("Invalid email"),
            password_hash: auth::password::DUMMY_PASSWORD_HASH.to_string(),
            created_at: Utc::now(),
        };

        self.user_repository
            .create(user)
            .await
            .expect("Failed to insert user")
    }
}

impl TestDb {
    /// Create a new test database with a unique name, or None when
    /// `DATABASE__URL` is not set
    pub async fn new() -> Option<Self> {
        let admin_url = std::env::var(DATABASE_URL_VAR).ok()?;

        let db_name = format!(
            "test_study_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE__URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            admin_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Cleanup needs a runtime; without one the database is left behind
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();
        handle.spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
                // Terminate existing connections
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
