use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPortalRepository};
use crate::routes::with_scheduling_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use parent_portal::config::AppConfig;
use parent_portal::error::AppError;
use parent_portal::telemetry;
use parent_portal::workflows::scheduling::{LeaveRequestService, UnlimitedCapacity};
use std::sync::atomic::Ordering;
use std::sync::Arc;
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
    };

    let repository = Arc::new(InMemoryPortalRepository::seeded(Local::now().date_naive()));
    let scheduling_service = Arc::new(LeaveRequestService::new(
        repository,
        Arc::new(UnlimitedCapacity),
        config.scheduling.eligibility(),
    ));

    let app = with_scheduling_routes(scheduling_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "parent portal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
