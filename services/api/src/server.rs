use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::http::{header, Method};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use benefits::config::AppConfig;
use benefits::enrollment::{EnrollmentService, PgEnrollmentStore};
use benefits::error::AppError;
use benefits::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        static_dir: Arc::new(config.server.static_dir.clone()),
    };

    // Setup runs to completion before the listener binds, so no request
    // ever races the schema-creation transaction.
    let store = PgEnrollmentStore::connect(&config.database).await?;
    store.setup().await?;

    let service = Arc::new(EnrollmentService::new(Arc::new(store)));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "benefits enrollment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// One-shot schema setup for deploy pipelines: create tables, seed the
/// sample catalog, exit.
pub(crate) async fn run_setup() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = PgEnrollmentStore::connect(&config.database).await?;
    store.setup().await?;

    info!("database setup complete");
    Ok(())
}
