use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::discovery::{discover, DonorContext, OpenRequest};
use super::domain::{
    DonationRequest, DonorResponse, ProfileId, RequestId, RequestStatus, RequestSubmission,
    ResponseId, ResponseStatus, ResponseSubmission,
};
use super::intake::{RequestIntake, SubmissionError};
use super::policy::BoardPolicy;
use super::repository::{
    AdmissionError, DonationRepository, MatchEvent, MatchNotifier, RepositoryError,
};

/// Service composing the intake guard, repository, and discovery pipeline.
///
/// Every operation is a synchronous, single-attempt unit; conflicts are
/// terminal user-facing outcomes, never retried here.
pub struct DonationBoard<R, N> {
    intake: RequestIntake,
    repository: Arc<R>,
    notifier: Arc<N>,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RESPONSE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> RequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("req-{id:06}"))
}

fn next_response_id() -> ResponseId {
    let id = RESPONSE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResponseId(format!("resp-{id:06}"))
}

/// A request paired with how many donors answered it.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    #[serde(flatten)]
    pub request: DonationRequest,
    pub response_count: usize,
    /// Read-time status: stored `active` past expiry renders as `expired`.
    pub effective_status: RequestStatus,
}

/// Requester dashboard: open requests split from the closed history.
#[derive(Debug, Clone, Serialize)]
pub struct RequesterOverview {
    pub active: Vec<RequestSummary>,
    pub history: Vec<RequestSummary>,
}

/// Donor dashboard: own responses plus tallies.
#[derive(Debug, Clone, Serialize)]
pub struct DonorOverview {
    pub responded: usize,
    pub completed: usize,
    pub responses: Vec<DonorResponse>,
}

impl<R, N> DonationBoard<R, N>
where
    R: DonationRepository + 'static,
    N: MatchNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, policy: BoardPolicy) -> Self {
        Self {
            intake: RequestIntake::new(policy),
            repository,
            notifier,
        }
    }

    pub fn policy(&self) -> &BoardPolicy {
        self.intake.policy()
    }

    /// Open a new donation request for a requester, subject to the active
    /// quota. Quota counts only requests that are still open; a stored
    /// `active` past its expiry does not occupy a slot.
    pub fn create_request(
        &self,
        submission: RequestSubmission,
        now: DateTime<Utc>,
    ) -> Result<DonationRequest, BoardError> {
        let open_count = self
            .repository
            .requests_by_requester(&submission.requester_id)?
            .iter()
            .filter(|request| request.is_open(now))
            .count();

        let limit = self.policy().max_active_requests;
        if open_count >= limit {
            return Err(BoardError::QuotaExceeded { limit });
        }

        let request = self
            .intake
            .request_from_submission(submission, next_request_id(), now)?;
        let stored = self.repository.insert_request(request)?;

        self.notify(MatchEvent::RequestOpened {
            request_id: stored.id.clone(),
            patient_blood_type: stored.patient_blood_type,
            urgency: stored.urgency,
        });

        Ok(stored)
    }

    /// Ordered discoverable requests for one donor.
    pub fn discover(
        &self,
        donor: &DonorContext,
        now: DateTime<Utc>,
    ) -> Result<Vec<OpenRequest>, BoardError> {
        let requests = self.repository.active_requests()?;
        let mut candidates = Vec::with_capacity(requests.len());
        for request in requests {
            let count = self.repository.response_count(&request.id)?;
            candidates.push((request, count));
        }

        Ok(discover(candidates, donor, now))
    }

    /// Admit a donor response against a request's remaining capacity.
    pub fn respond(
        &self,
        request_id: &RequestId,
        submission: ResponseSubmission,
        now: DateTime<Utc>,
    ) -> Result<DonorResponse, BoardError> {
        let request = self
            .repository
            .fetch_request(request_id)?
            .ok_or(BoardError::RequestNotFound)?;

        if !request.is_open(now) {
            return Err(BoardError::RequestClosed);
        }

        if let Some(message) = &submission.message {
            let limit = self.policy().max_message_len;
            if message.chars().count() > limit {
                return Err(BoardError::MessageTooLong { limit });
            }
        }

        let response = DonorResponse {
            id: next_response_id(),
            request_id: request.id.clone(),
            donor_id: submission.donor_id,
            status: ResponseStatus::Interested,
            response_message: submission.message,
            created_at: now,
        };

        let stored = self
            .repository
            .admit_response(response, request.max_responses)?;

        self.notify(MatchEvent::ResponseReceived {
            request_id: stored.request_id.clone(),
            response_id: stored.id.clone(),
            donor_id: stored.donor_id.clone(),
        });

        Ok(stored)
    }

    /// Requester-initiated close: active -> fulfilled or active -> cancelled.
    /// Nothing else goes through this entry point; expiry in particular is
    /// never written.
    pub fn update_request_status(
        &self,
        request_id: &RequestId,
        requester: &ProfileId,
        status: RequestStatus,
    ) -> Result<DonationRequest, BoardError> {
        let mut request = self
            .repository
            .fetch_request(request_id)?
            .ok_or(BoardError::RequestNotFound)?;

        if &request.requester_id != requester {
            return Err(BoardError::NotRequestOwner);
        }

        let allowed = request.status == RequestStatus::Active
            && matches!(status, RequestStatus::Fulfilled | RequestStatus::Cancelled);
        if !allowed {
            return Err(BoardError::InvalidRequestTransition {
                from: request.status,
                to: status,
            });
        }

        self.repository.update_request_status(request_id, status)?;
        request.status = status;
        Ok(request)
    }

    /// Advance a response's status; only the donor or the request's owner
    /// may act, and only along the monotonic path.
    pub fn update_response_status(
        &self,
        response_id: &ResponseId,
        actor: &ProfileId,
        status: ResponseStatus,
    ) -> Result<DonorResponse, BoardError> {
        let mut response = self
            .repository
            .fetch_response(response_id)?
            .ok_or(BoardError::ResponseNotFound)?;

        let request = self
            .repository
            .fetch_request(&response.request_id)?
            .ok_or(BoardError::RequestNotFound)?;

        if actor != &response.donor_id && actor != &request.requester_id {
            return Err(BoardError::NotResponseParticipant);
        }

        if !response.status.can_advance_to(status) {
            return Err(BoardError::InvalidResponseTransition {
                from: response.status,
                to: status,
            });
        }

        self.repository.update_response_status(response_id, status)?;
        response.status = status;
        Ok(response)
    }

    /// Requester dashboard data: open requests and the closed history, each
    /// with response counts.
    pub fn requester_overview(
        &self,
        requester: &ProfileId,
        now: DateTime<Utc>,
    ) -> Result<RequesterOverview, BoardError> {
        let mut requests = self.repository.requests_by_requester(requester)?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut overview = RequesterOverview {
            active: Vec::new(),
            history: Vec::new(),
        };

        for request in requests {
            let response_count = self.repository.response_count(&request.id)?;
            let effective_status = request.effective_status(now);
            let summary = RequestSummary {
                request,
                response_count,
                effective_status,
            };
            if effective_status == RequestStatus::Active {
                overview.active.push(summary);
            } else {
                overview.history.push(summary);
            }
        }

        Ok(overview)
    }

    /// Donor dashboard data: own responses with tallies.
    pub fn donor_overview(&self, donor: &ProfileId) -> Result<DonorOverview, BoardError> {
        let mut responses = self.repository.responses_by_donor(donor)?;
        responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let completed = responses
            .iter()
            .filter(|response| response.status == ResponseStatus::Completed)
            .count();

        Ok(DonorOverview {
            responded: responses.len(),
            completed,
            responses,
        })
    }

    /// Responses to one request, for the owning requester's coordination
    /// view. Contact details are exchanged here, so ownership is enforced.
    pub fn responses_for_request(
        &self,
        request_id: &RequestId,
        requester: &ProfileId,
    ) -> Result<Vec<DonorResponse>, BoardError> {
        let request = self
            .repository
            .fetch_request(request_id)?
            .ok_or(BoardError::RequestNotFound)?;

        if &request.requester_id != requester {
            return Err(BoardError::NotRequestOwner);
        }

        let mut responses = self.repository.responses_by_request(request_id)?;
        responses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(responses)
    }

    fn notify(&self, event: MatchEvent) {
        if let Err(error) = self.notifier.publish(event) {
            warn!(%error, "match notification dropped");
        }
    }
}

/// Error raised by the donation board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("requester already has {limit} active requests")]
    QuotaExceeded { limit: usize },
    #[error("donor already responded to this request")]
    DuplicateResponse,
    #[error("request already has its maximum number of responses")]
    CapacityReached,
    #[error("request is no longer open")]
    RequestClosed,
    #[error("request not found")]
    RequestNotFound,
    #[error("response not found")]
    ResponseNotFound,
    #[error("only the requester who opened the request may change it")]
    NotRequestOwner,
    #[error("only the donor or the requester may update this response")]
    NotResponseParticipant,
    #[error("request cannot move from {from} to {to}")]
    InvalidRequestTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("response cannot move from {from} to {to}")]
    InvalidResponseTransition {
        from: ResponseStatus,
        to: ResponseStatus,
    },
    #[error("response message exceeds {limit} characters")]
    MessageTooLong { limit: usize },
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AdmissionError> for BoardError {
    fn from(value: AdmissionError) -> Self {
        match value {
            AdmissionError::Duplicate => Self::DuplicateResponse,
            AdmissionError::CapacityReached => Self::CapacityReached,
            AdmissionError::Storage(error) => Self::Repository(error),
        }
    }
}
