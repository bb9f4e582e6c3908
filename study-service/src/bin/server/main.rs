use std::sync::Arc;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use study_service::config::Config;
use study_service::domain::authentication::ports::AuthServicePort;
use study_service::domain::authentication::service::AuthService;
use study_service::domain::plan::ports::PlanServicePort;
use study_service::domain::plan::service::PlanService;
use study_service::domain::user::ports::UserServicePort;
use study_service::domain::user::service::UserService;
use study_service::inbound::http::router::create_router;
use study_service::repositories::InMemoryPlanRepository;
use study_service::repositories::InMemoryUserRepository;
use study_service::repositories::PostgresPlanRepository;
use study_service::repositories::PostgresUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

struct Services {
    auth_service: Arc<dyn AuthServicePort>,
    user_service: Arc<dyn UserServicePort>,
    plan_service: Arc<dyn PlanServicePort>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "study-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        run_mode = %config.run_mode,
        database_configured = config.database.url.is_some(),
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let signing_secret = config.signing_secret().map_err(|e| {
        tracing::error!(error = %e, "Refusing to start without a JWT signing secret");
        e
    })?;
    let authenticator = Arc::new(Authenticator::new(&signing_secret, config.token_ttl()));

    let services = match config.database.url.as_deref() {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
            let plan_repository = Arc::new(PostgresPlanRepository::new(pg_pool));

            Services {
                auth_service: Arc::new(AuthService::new(
                    Arc::clone(&user_repository),
                    Arc::clone(&authenticator),
                )),
                user_service: Arc::new(UserService::new(user_repository)),
                plan_service: Arc::new(PlanService::new(plan_repository)),
            }
        }
        None => {
            tracing::warn!("No database URL configured, data is kept in memory and lost on exit");

            let user_repository = Arc::new(InMemoryUserRepository::new());
            let plan_repository = Arc::new(InMemoryPlanRepository::new());

            Services {
                auth_service: Arc::new(AuthService::new(
                    Arc::clone(&user_repository),
                    Arc::clone(&authenticator),
                )),
                user_service: Arc::new(UserService::new(user_repository)),
                plan_service: Arc::new(PlanService::new(plan_repository)),
            }
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        services.auth_service,
        services.user_service,
        services.plan_service,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
