use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use donor_match::donation::clinics::{self, ClinicView};
use donor_match::donation::eligibility::{
    EligibilityAnswers, EligibilityResult, Question, Questionnaire,
};
use donor_match::donation::geocode::{Address, Geocoder, PlaceCandidate};
use donor_match::donation::requests::repository::{DonationRepository, MatchNotifier};
use donor_match::donation::requests::{donation_router, DonationBoard};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

pub(crate) fn with_donation_routes<R, N>(board: Arc<DonationBoard<R, N>>) -> axum::Router
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    donation_router(board)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/eligibility/questions",
            axum::routing::get(eligibility_questions_endpoint),
        )
        .route(
            "/api/v1/eligibility/evaluate",
            axum::routing::post(eligibility_evaluate_endpoint),
        )
        .route("/api/v1/clinics", axum::routing::get(clinics_endpoint))
        .route("/api/v1/places", axum::routing::get(places_endpoint))
        .route(
            "/api/v1/geocode/reverse",
            axum::routing::get(reverse_geocode_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityRequest {
    pub(crate) answers: EligibilityAnswers,
}

pub(crate) async fn eligibility_questions_endpoint() -> Json<Vec<Question>> {
    Json(Questionnaire::standard().questions().to_vec())
}

pub(crate) async fn eligibility_evaluate_endpoint(
    Json(payload): Json<EligibilityRequest>,
) -> Json<EligibilityResult> {
    Json(Questionnaire::standard().evaluate(&payload.answers))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClinicsQuery {
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    #[serde(default)]
    pub(crate) lng: Option<f64>,
}

pub(crate) async fn clinics_endpoint(Query(query): Query<ClinicsQuery>) -> Json<Vec<ClinicView>> {
    Json(clinics::nearby(query.lat.zip(query.lng)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesQuery {
    pub(crate) q: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReverseQuery {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

/// Reverse geocoding for the map picker. A dead provider degrades to the
/// generic placeholder address rather than an error.
pub(crate) async fn reverse_geocode_endpoint(
    Extension(geocoder): Extension<Arc<dyn Geocoder>>,
    Query(query): Query<ReverseQuery>,
) -> Json<Address> {
    Json(geocoder.reverse_or_fallback(query.lat, query.lng))
}

/// Forward geocoding for the hospital picker. Provider failures degrade to
/// an empty candidate list; the caller may simply retry.
pub(crate) async fn places_endpoint(
    Extension(geocoder): Extension<Arc<dyn Geocoder>>,
    Query(query): Query<PlacesQuery>,
) -> Json<Vec<PlaceCandidate>> {
    match geocoder.search(&query.q) {
        Ok(candidates) => Json(candidates),
        Err(error) => {
            warn!(%error, query = %query.q, "place search failed, returning no candidates");
            Json(Vec::new())
        }
    }
}
