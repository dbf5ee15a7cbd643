use crate::cli::ServeArgs;
use crate::infra::{open_store, AppState};
use crate::routes::with_result_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_qa::config::AppConfig;
use lead_qa::error::AppError;
use lead_qa::screening::ResultStore;
use lead_qa::telemetry;
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

    let store = open_store(&config.storage, args.database.take())?;
    let stored = store.stats_by_verdict()?.total();
    let store_location = store.location().clone();

    let app = with_result_routes(store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        store = ?store_location,
        stored,
        "lead result reporting ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
