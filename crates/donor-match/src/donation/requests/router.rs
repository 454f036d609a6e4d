use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::discovery::DonorContext;
use super::domain::{
    ProfileId, RequestId, RequestStatus, RequestSubmission, ResponseId, ResponseStatus,
    ResponseSubmission,
};
use super::repository::{DonationRepository, MatchNotifier};
use super::service::{BoardError, DonationBoard};
use crate::donation::blood::BloodType;

/// Router builder exposing HTTP endpoints for the donation board.
pub fn donation_router<R, N>(board: Arc<DonationBoard<R, N>>) -> Router
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    Router::new()
        .route("/api/v1/requests", post(create_handler::<R, N>))
        .route("/api/v1/requests/open", get(discover_handler::<R, N>))
        .route(
            "/api/v1/requests/:request_id/responses",
            post(respond_handler::<R, N>).get(list_responses_handler::<R, N>),
        )
        .route(
            "/api/v1/requests/:request_id/status",
            post(request_status_handler::<R, N>),
        )
        .route(
            "/api/v1/requesters/:requester_id/requests",
            get(requester_overview_handler::<R, N>),
        )
        .route(
            "/api/v1/donors/:donor_id/responses",
            get(donor_overview_handler::<R, N>),
        )
        .route(
            "/api/v1/responses/:response_id/status",
            post(response_status_handler::<R, N>),
        )
        .with_state(board)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiscoverQuery {
    pub(crate) blood_type: BloodType,
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    #[serde(default)]
    pub(crate) lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerQuery {
    pub(crate) requester_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RequestStatusChange {
    pub(crate) requester_id: ProfileId,
    pub(crate) status: RequestStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseStatusChange {
    pub(crate) actor_id: ProfileId,
    pub(crate) status: ResponseStatus,
}

pub(crate) async fn create_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    axum::Json(submission): axum::Json<RequestSubmission>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    match board.create_request(submission, Utc::now()) {
        Ok(request) => (StatusCode::CREATED, axum::Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn discover_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Query(query): Query<DiscoverQuery>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    let donor = DonorContext {
        blood_type: query.blood_type,
        location: query.lat.zip(query.lng),
    };

    match board.discover(&donor, Utc::now()) {
        Ok(open) => (StatusCode::OK, axum::Json(open)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn respond_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Path(request_id): Path<String>,
    axum::Json(submission): axum::Json<ResponseSubmission>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    match board.respond(&RequestId(request_id), submission, Utc::now()) {
        Ok(response) => (StatusCode::CREATED, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_responses_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Path(request_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    let requester = ProfileId(query.requester_id);
    match board.responses_for_request(&RequestId(request_id), &requester) {
        Ok(responses) => (StatusCode::OK, axum::Json(responses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn request_status_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Path(request_id): Path<String>,
    axum::Json(change): axum::Json<RequestStatusChange>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    match board.update_request_status(&RequestId(request_id), &change.requester_id, change.status)
    {
        Ok(request) => (StatusCode::OK, axum::Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn requester_overview_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Path(requester_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    match board.requester_overview(&ProfileId(requester_id), Utc::now()) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn donor_overview_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Path(donor_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    match board.donor_overview(&ProfileId(donor_id)) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn response_status_handler<R, N>(
    State(board): State<Arc<DonationBoard<R, N>>>,
    Path(response_id): Path<String>,
    axum::Json(change): axum::Json<ResponseStatusChange>,
) -> Response
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    match board.update_response_status(&ResponseId(response_id), &change.actor_id, change.status) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: BoardError) -> Response {
    let (status, code) = match &error {
        BoardError::QuotaExceeded { .. } => (StatusCode::CONFLICT, "quota_exceeded"),
        BoardError::DuplicateResponse => (StatusCode::CONFLICT, "duplicate_response"),
        BoardError::CapacityReached => (StatusCode::CONFLICT, "capacity_reached"),
        BoardError::RequestClosed => (StatusCode::CONFLICT, "request_closed"),
        BoardError::RequestNotFound | BoardError::ResponseNotFound => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        BoardError::NotRequestOwner | BoardError::NotResponseParticipant => {
            (StatusCode::FORBIDDEN, "forbidden")
        }
        BoardError::InvalidRequestTransition { .. }
        | BoardError::InvalidResponseTransition { .. } => {
            (StatusCode::CONFLICT, "invalid_transition")
        }
        BoardError::MessageTooLong { .. } | BoardError::Submission(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_submission")
        }
        BoardError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };

    let payload = json!({
        "error": error.to_string(),
        "code": code,
    });
    (status, axum::Json(payload)).into_response()
}
