use serde::{Deserialize, Serialize};

use super::domain::{
    DonationRequest, DonorResponse, ProfileId, RequestId, RequestStatus, ResponseId,
    ResponseStatus, Urgency,
};
use crate::donation::blood::BloodType;

/// Storage abstraction so the board can be exercised in isolation.
///
/// `admit_response` carries the admission invariant: implementations must
/// make the duplicate check, the capacity check, and the insert atomic per
/// request: two concurrent donors can never push a request past its
/// capacity, and one donor can never register twice. Everything else is
/// plain CRUD.
pub trait DonationRepository: Send + Sync {
    fn insert_request(&self, request: DonationRequest) -> Result<DonationRequest, RepositoryError>;
    fn fetch_request(&self, id: &RequestId) -> Result<Option<DonationRequest>, RepositoryError>;
    fn requests_by_requester(
        &self,
        requester: &ProfileId,
    ) -> Result<Vec<DonationRequest>, RepositoryError>;
    /// Requests stored as `active`; expiry filtering stays with the caller.
    fn active_requests(&self) -> Result<Vec<DonationRequest>, RepositoryError>;
    fn update_request_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> Result<(), RepositoryError>;

    /// Atomic duplicate + capacity check and insert for one response.
    fn admit_response(
        &self,
        response: DonorResponse,
        capacity: u32,
    ) -> Result<DonorResponse, AdmissionError>;
    fn fetch_response(&self, id: &ResponseId) -> Result<Option<DonorResponse>, RepositoryError>;
    fn response_count(&self, request: &RequestId) -> Result<usize, RepositoryError>;
    fn responses_by_request(
        &self,
        request: &RequestId,
    ) -> Result<Vec<DonorResponse>, RepositoryError>;
    fn responses_by_donor(&self, donor: &ProfileId)
        -> Result<Vec<DonorResponse>, RepositoryError>;
    fn update_response_status(
        &self,
        id: &ResponseId,
        status: ResponseStatus,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of the atomic response admission check.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("donor already responded to this request")]
    Duplicate,
    #[error("request already has its maximum number of responses")]
    CapacityReached,
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Events pushed to the counterpart side when the board changes.
///
/// Delivery is best-effort; the board's invariants never depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    RequestOpened {
        request_id: RequestId,
        patient_blood_type: BloodType,
        urgency: Urgency,
    },
    ResponseReceived {
        request_id: RequestId,
        response_id: ResponseId,
        donor_id: ProfileId,
    },
}

/// Trait describing outbound notification hooks (e.g., push or e-mail
/// adapters).
pub trait MatchNotifier: Send + Sync {
    fn publish(&self, event: MatchEvent) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
