use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::donation::blood::BloodType;
use crate::donation::requests::domain::{
    DonationRequest, DonorResponse, ProfileId, RequestId, RequestStatus, RequestSubmission,
    ResponseId, ResponseStatus, Urgency,
};
use crate::donation::requests::repository::{
    AdmissionError, DonationRepository, MatchEvent, MatchNotifier, NotifyError, RepositoryError,
};
use crate::donation::requests::{donation_router, BoardPolicy, DonationBoard};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn submission(requester: &str) -> RequestSubmission {
    RequestSubmission {
        requester_id: ProfileId(requester.to_string()),
        patient_name: "Ana Torres".to_string(),
        patient_blood_type: BloodType::APositive,
        units_needed: 2,
        hospital_name: "Hospital General de México".to_string(),
        hospital_address: "Dr. Balmis 148, Doctores".to_string(),
        hospital_city: "Ciudad de México".to_string(),
        hospital_state: "CDMX".to_string(),
        hospital_lat: 19.4132,
        hospital_lng: -99.1517,
        contact_phone: "5512345678".to_string(),
        medical_condition: None,
        additional_notes: None,
        urgency: Urgency::Medium,
        max_responses: 5,
    }
}

/// A stored request built directly, bypassing intake, for discovery tests.
pub(super) fn stored_request(
    id: &str,
    patient_blood_type: BloodType,
    urgency: Urgency,
    hospital: (f64, f64),
    created_at: DateTime<Utc>,
) -> DonationRequest {
    DonationRequest {
        id: RequestId(id.to_string()),
        requester_id: ProfileId("requester-1".to_string()),
        patient_name: "Ana Torres".to_string(),
        patient_blood_type,
        units_needed: 2,
        hospital_name: "Hospital General de México".to_string(),
        hospital_address: "Dr. Balmis 148, Doctores".to_string(),
        hospital_city: "Ciudad de México".to_string(),
        hospital_state: "CDMX".to_string(),
        hospital_lat: hospital.0,
        hospital_lng: hospital.1,
        contact_phone: "+525512345678".to_string(),
        medical_condition: None,
        additional_notes: None,
        urgency,
        max_responses: 5,
        status: RequestStatus::Active,
        created_at,
        expires_at: created_at + Duration::days(14),
    }
}

pub(super) fn build_board() -> (
    DonationBoard<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let board = DonationBoard::new(
        repository.clone(),
        notifier.clone(),
        BoardPolicy::default(),
    );
    (board, repository, notifier)
}

pub(super) fn board_router() -> (
    axum::Router,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let (board, repository, notifier) = build_board();
    (donation_router(Arc::new(board)), repository, notifier)
}

#[derive(Default)]
struct StoreInner {
    requests: HashMap<RequestId, DonationRequest>,
    responses: HashMap<ResponseId, DonorResponse>,
}

/// Single-mutex store: locking the whole map for `admit_response` is what
/// makes the duplicate + capacity check-and-insert atomic.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    store: Arc<Mutex<StoreInner>>,
}

impl DonationRepository for MemoryRepository {
    fn insert_request(&self, request: DonationRequest) -> Result<DonationRequest, RepositoryError> {
        let mut store = self.store.lock().expect("store mutex poisoned");
        store.requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn fetch_request(&self, id: &RequestId) -> Result<Option<DonationRequest>, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store.requests.get(id).cloned())
    }

    fn requests_by_requester(
        &self,
        requester: &ProfileId,
    ) -> Result<Vec<DonationRequest>, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store
            .requests
            .values()
            .filter(|request| &request.requester_id == requester)
            .cloned()
            .collect())
    }

    fn active_requests(&self) -> Result<Vec<DonationRequest>, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store
            .requests
            .values()
            .filter(|request| request.status == RequestStatus::Active)
            .cloned()
            .collect())
    }

    fn update_request_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("store mutex poisoned");
        let request = store.requests.get_mut(id).ok_or(RepositoryError::NotFound)?;
        request.status = status;
        Ok(())
    }

    fn admit_response(
        &self,
        response: DonorResponse,
        capacity: u32,
    ) -> Result<DonorResponse, AdmissionError> {
        let mut store = self.store.lock().expect("store mutex poisoned");

        let duplicate = store.responses.values().any(|existing| {
            existing.request_id == response.request_id && existing.donor_id == response.donor_id
        });
        if duplicate {
            return Err(AdmissionError::Duplicate);
        }

        let count = store
            .responses
            .values()
            .filter(|existing| existing.request_id == response.request_id)
            .count();
        if count >= capacity as usize {
            return Err(AdmissionError::CapacityReached);
        }

        store.responses.insert(response.id.clone(), response.clone());
        Ok(response)
    }

    fn fetch_response(&self, id: &ResponseId) -> Result<Option<DonorResponse>, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store.responses.get(id).cloned())
    }

    fn response_count(&self, request: &RequestId) -> Result<usize, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store
            .responses
            .values()
            .filter(|response| &response.request_id == request)
            .count())
    }

    fn responses_by_request(
        &self,
        request: &RequestId,
    ) -> Result<Vec<DonorResponse>, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store
            .responses
            .values()
            .filter(|response| &response.request_id == request)
            .cloned()
            .collect())
    }

    fn responses_by_donor(
        &self,
        donor: &ProfileId,
    ) -> Result<Vec<DonorResponse>, RepositoryError> {
        let store = self.store.lock().expect("store mutex poisoned");
        Ok(store
            .responses
            .values()
            .filter(|response| &response.donor_id == donor)
            .cloned()
            .collect())
    }

    fn update_response_status(
        &self,
        id: &ResponseId,
        status: ResponseStatus,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("store mutex poisoned");
        let response = store.responses.get_mut(id).ok_or(RepositoryError::NotFound)?;
        response.status = status;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<MatchEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl MatchNotifier for MemoryNotifier {
    fn publish(&self, event: MatchEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

/// Notifier whose transport always fails; operations must still succeed.
pub(super) struct FailingNotifier;

impl MatchNotifier for FailingNotifier {
    fn publish(&self, _event: MatchEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("push gateway offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl DonationRepository for UnavailableRepository {
    fn insert_request(
        &self,
        _request: DonationRequest,
    ) -> Result<DonationRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_request(&self, _id: &RequestId) -> Result<Option<DonationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn requests_by_requester(
        &self,
        _requester: &ProfileId,
    ) -> Result<Vec<DonationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn active_requests(&self) -> Result<Vec<DonationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_request_status(
        &self,
        _id: &RequestId,
        _status: RequestStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn admit_response(
        &self,
        _response: DonorResponse,
        _capacity: u32,
    ) -> Result<DonorResponse, AdmissionError> {
        Err(AdmissionError::Storage(RepositoryError::Unavailable(
            "database offline".to_string(),
        )))
    }

    fn fetch_response(&self, _id: &ResponseId) -> Result<Option<DonorResponse>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn response_count(&self, _request: &RequestId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn responses_by_request(
        &self,
        _request: &RequestId,
    ) -> Result<Vec<DonorResponse>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn responses_by_donor(
        &self,
        _donor: &ProfileId,
    ) -> Result<Vec<DonorResponse>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_response_status(
        &self,
        _id: &ResponseId,
        _status: ResponseStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
