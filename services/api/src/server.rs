use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredAnalyzer, ConfiguredProfileStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use content_guard::analysis::ContentAnalysisService;
use content_guard::config::AppConfig;
use content_guard::error::AppError;
use content_guard::telemetry::{self, LogSink};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.analyzer.api_key.is_none() {
        warn!("ANALYZER_API_KEY not set; the remote analyzer may reject requests");
    }
    let analyzer = Arc::new(ConfiguredAnalyzer::from_config(&config.analyzer, false)?);
    let analyzer_target = analyzer.describe().to_string();
    let profiles = Arc::new(ConfiguredProfileStore::open(&config.profiles)?);
    let analysis_service = Arc::new(ContentAnalysisService::new(analyzer, profiles));

    let app = with_service_routes(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        analyzer = %analyzer_target,
        "content guard service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
