use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDonationRepository, InMemoryMatchNotifier, StaticGeocoder};
use crate::routes::with_donation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use donor_match::config::AppConfig;
use donor_match::donation::geocode::{CachingGeocoder, Geocoder};
use donor_match::donation::requests::DonationBoard;
use donor_match::error::AppError;
use donor_match::telemetry;
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

    let repository = Arc::new(InMemoryDonationRepository::default());
    let notifier = Arc::new(InMemoryMatchNotifier::default());
    let board = Arc::new(DonationBoard::new(
        repository,
        notifier,
        config.board.clone(),
    ));
    let geocoder: Arc<dyn Geocoder> = Arc::new(CachingGeocoder::new(StaticGeocoder));

    let app = with_donation_routes(board)
        .layer(Extension(app_state))
        .layer(Extension(geocoder))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "donation matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
