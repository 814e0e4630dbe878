use crate::cli::ServeArgs;
use crate::infra::{AppState, ComplianceState};
use crate::routes::with_compliance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_compliance::compliance::ComplianceEngine;
use fleet_compliance::config::AppConfig;
use fleet_compliance::error::AppError;
use fleet_compliance::notifications::RoutingPolicy;
use fleet_compliance::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = ComplianceEngine::from_config(&config.compliance);
    let compliance_state = ComplianceState::new(engine, RoutingPolicy::default());

    let app = with_compliance_routes(compliance_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        urgent_days = config.compliance.thresholds.urgent_within_days(),
        warning_days = config.compliance.thresholds.warning_within_days(),
        missing_parent = ?config.compliance.missing_parent,
        "fleet compliance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
