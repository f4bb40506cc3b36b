use crate::cli::ServeArgs;
use crate::error::AppError;
use crate::infra::{AppState, EvaluationDefaults};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use roster_engine::config::AppConfig;
use roster_engine::telemetry;
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

    let defaults = EvaluationDefaults::load(&config.evaluation)?;
    let has_default_rules = defaults.rules.is_some();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        evaluation: Arc::new(defaults),
    };

    let app = router().layer(Extension(app_state)).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        profile = %config.evaluation.default_profile,
        has_default_rules,
        "roster evaluation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
