use std::sync::Arc;
use std::time::Duration as StdDuration;

use auth::SessionIssuer;
use chrono::Duration;
use inventory_service::config::Config;
use inventory_service::inbound::http::router::create_router;
use inventory_service::inventory::ports::InventoryRepository;
use inventory_service::inventory::ports::InventoryServicePort;
use inventory_service::inventory::service::InventoryService;
use inventory_service::outbound::provisioning::XcatClient;
use inventory_service::outbound::repositories::InMemoryCredentialStore;
use inventory_service::outbound::repositories::InMemoryInventoryRepository;
use inventory_service::outbound::repositories::InMemoryTokenStore;
use inventory_service::outbound::repositories::PostgresCredentialStore;
use inventory_service::outbound::repositories::PostgresInventoryRepository;
use inventory_service::outbound::repositories::PostgresTokenStore;
use inventory_service::session::ports::CredentialStore;
use inventory_service::session::ports::SessionServicePort;
use inventory_service::session::ports::TokenStore;
use inventory_service::session::service::SessionService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Services = (Arc<dyn SessionServicePort>, Arc<dyn InventoryServicePort>);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "inventory-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        session_hours = config.session.duration_hours,
        stale_grace_hours = config.session.stale_grace_hours,
        xcat_server = ?config.provisioning.xcat_server,
        "Configuration loaded"
    );

    let (session_service, inventory_service) = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_services(
                Arc::new(PostgresCredentialStore::new(pg_pool.clone())),
                Arc::new(PostgresTokenStore::new(pg_pool.clone())),
                Arc::new(PostgresInventoryRepository::new(pg_pool)),
                &config,
            )
            .await?
        }
        None => {
            tracing::warn!("No database configured, state will not survive a restart");

            build_services(
                Arc::new(InMemoryCredentialStore::new()),
                Arc::new(InMemoryTokenStore::new()),
                Arc::new(InMemoryInventoryRepository::new()),
                &config,
            )
            .await?
        }
    };

    spawn_token_purge(
        Arc::clone(&session_service),
        StdDuration::from_secs(config.session.purge_interval_secs),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(session_service, inventory_service);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn build_services<CS, TS, IR>(
    credentials: Arc<CS>,
    tokens: Arc<TS>,
    repository: Arc<IR>,
    config: &Config,
) -> Result<Services, anyhow::Error>
where
    CS: CredentialStore,
    TS: TokenStore,
    IR: InventoryRepository,
{
    if let Some(bootstrap) = &config.bootstrap {
        credentials
            .upsert_account(&bootstrap.username, &bootstrap.password)
            .await?;
        tracing::info!(username = %bootstrap.username, "Bootstrap account seeded");
    }

    let issuer = SessionIssuer::new(
        Duration::hours(config.session.duration_hours),
        Duration::hours(config.session.stale_grace_hours),
    );
    let provisioning = Arc::new(XcatClient::new(&config.provisioning));

    Ok((
        Arc::new(SessionService::new(credentials, tokens, issuer)),
        Arc::new(InventoryService::new(repository, provisioning)),
    ))
}

fn spawn_token_purge(session_service: Arc<dyn SessionServicePort>, every: StdDuration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match session_service.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Dead session tokens purged"),
                Err(e) => tracing::error!(error = %e, "Session token purge failed"),
            }
        }
    });
}
