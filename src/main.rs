use std::{process, sync::Arc};

use buques::{
    application::{
        error::AppError, repos::VesselsRepo, source::SourceFetcher, vessels::VesselService,
    },
    cache::{CacheConfig, CacheGateway, CacheStore, MemoryStore},
    config::{self, CacheBackend},
    infra::{
        cache::RedisStore,
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Check(_) => run_check(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let store = init_cache_store(&settings.cache).await?;

    let cache_config = CacheConfig::from(&settings.cache);
    let gateway = CacheGateway::new(store, cache_config.operation_timeout);
    let repo: Arc<dyn VesselsRepo> = repositories;
    let source = SourceFetcher::new(repo, settings.database.query_timeout);
    let vessels = Arc::new(VesselService::new(
        gateway,
        source,
        cache_config,
        settings.database.port_id,
    ));

    let state = HttpState {
        vessels,
        expose_error_detail: settings.http.expose_error_detail,
    };

    serve_http(&settings, state).await
}

async fn run_check(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    init_cache_store(&settings.cache).await?;
    info!(target = "buques::check", "database and cache are reachable");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    let repositories = PostgresRepositories::new(pool);
    repositories
        .health_check()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    info!(
        target = "buques::startup",
        max_connections = settings.database.max_connections.get(),
        "connected to database"
    );
    Ok(Arc::new(repositories))
}

async fn init_cache_store(
    settings: &config::CacheSettings,
) -> Result<Arc<dyn CacheStore>, AppError> {
    match settings.backend {
        CacheBackend::Redis => {
            let store = RedisStore::connect(&settings.redis, settings.operation_timeout)
                .await
                .map_err(|err| AppError::from(InfraError::cache(err.to_string())))?;
            Ok(Arc::new(store))
        }
        CacheBackend::Memory => {
            info!(target = "buques::startup", "using in-process cache store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "buques::startup",
        addr = %settings.server.addr,
        "listening for requests"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "buques::startup", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
