use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCatalog, InMemoryMissingLog};
use crate::routes::app_router;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use food_grader::config::AppConfig;
use food_grader::error::AppError;
use food_grader::grading::{load_catalog, GradingService};
use food_grader::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed.take() {
        config.storage.seed_catalog = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        public_dir: Arc::new(config.server.public_dir.clone()),
    };

    let app = storage_router(&config)?
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ingredient grader ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("ingredient grader stopped");
    Ok(())
}

#[cfg(feature = "mysql")]
fn storage_router(config: &AppConfig) -> Result<Router, AppError> {
    match &config.storage.database {
        Some(database) => {
            let (catalog, missing) = crate::mysql::connect(database)?;
            if config.storage.seed_catalog.is_some() {
                warn!("seed catalog is ignored when a database is configured");
            }
            info!(?database, "using mysql catalog");
            let service = GradingService::new(Arc::new(catalog), Arc::new(missing));
            Ok(app_router(Arc::new(service)))
        }
        None => in_memory_router(config),
    }
}

#[cfg(not(feature = "mysql"))]
fn storage_router(config: &AppConfig) -> Result<Router, AppError> {
    if let Some(database) = &config.storage.database {
        warn!(
            ?database,
            "database configured but mysql support is not compiled in; using in-memory catalog"
        );
    }
    in_memory_router(config)
}

fn in_memory_router(config: &AppConfig) -> Result<Router, AppError> {
    let catalog = Arc::new(InMemoryCatalog::default());
    if let Some(path) = &config.storage.seed_catalog {
        catalog.seed(load_catalog(path)?);
    }
    info!("using in-memory catalog");

    let service = GradingService::new(catalog, Arc::new(InMemoryMissingLog::default()));
    Ok(app_router(Arc::new(service)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
