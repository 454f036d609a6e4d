use donor_match::donation::blood::BloodType;
use donor_match::donation::geo::distance_km;
use donor_match::donation::geocode::{Address, GeocodeError, Geocoder, PlaceCandidate};
use donor_match::donation::requests::domain::{
    DonationRequest, DonorResponse, ProfileId, RequestId, RequestStatus, ResponseId,
    ResponseStatus,
};
use donor_match::donation::requests::repository::{
    AdmissionError, DonationRepository, MatchEvent, MatchNotifier, NotifyError, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreInner {
    requests: HashMap<RequestId, DonationRequest>,
    responses: HashMap<ResponseId, DonorResponse>,
}

/// In-process store backing the board until a database adapter lands.
///
/// One mutex over the whole store is what makes `admit_response` atomic:
/// the duplicate check, the capacity count, and the insert all happen under
/// the same lock.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDonationRepository {
    store: Arc<Mutex<StoreInner>>,
}

impl DonationRepository for InMemoryDonationRepository {
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

/// Notifier that records events in memory; a push/e-mail transport slots in
/// behind the same trait later.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchNotifier {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl MatchNotifier for InMemoryMatchNotifier {
    fn publish(&self, event: MatchEvent) -> Result<(), NotifyError> {
        let mut events = self.events.lock().expect("notifier mutex poisoned");
        events.push(event);
        Ok(())
    }
}

impl InMemoryMatchNotifier {
    pub(crate) fn events(&self) -> Vec<MatchEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

struct KnownPlace {
    name: &'static str,
    street: &'static str,
    postcode: &'static str,
    lat: f64,
    lng: f64,
}

const KNOWN_PLACES: &[KnownPlace] = &[
    KnownPlace {
        name: "Hospital General de México Dr. Eduardo Liceaga",
        street: "Dr. Balmis 148, Doctores",
        postcode: "06726",
        lat: 19.4132,
        lng: -99.1517,
    },
    KnownPlace {
        name: "Hospital Juárez de México",
        street: "Av. Instituto Politécnico Nacional 5160",
        postcode: "07760",
        lat: 19.4912,
        lng: -99.1265,
    },
    KnownPlace {
        name: "Instituto Nacional de Cardiología Ignacio Chávez",
        street: "Juan Badiano 1, Tlalpan",
        postcode: "14080",
        lat: 19.2889,
        lng: -99.1600,
    },
    KnownPlace {
        name: "Hospital Ángeles Clínica Londres",
        street: "Durango 50, Roma Norte",
        postcode: "06700",
        lat: 19.4204,
        lng: -99.1610,
    },
    KnownPlace {
        name: "Centro Médico ABC Campus Observatorio",
        street: "Sur 136 No. 116, Las Américas",
        postcode: "01120",
        lat: 19.3984,
        lng: -99.2038,
    },
    KnownPlace {
        name: "Hospital General La Villa",
        street: "Av. San Juan de Aragón 285",
        postcode: "07050",
        lat: 19.4719,
        lng: -99.1106,
    },
];

impl KnownPlace {
    fn address(&self) -> Address {
        Address {
            full: format!("{}, Ciudad de México, CDMX", self.street),
            street: self.street.to_string(),
            city: "Ciudad de México".to_string(),
            state: "CDMX".to_string(),
            country: "México".to_string(),
            postcode: self.postcode.to_string(),
        }
    }
}

/// Fixture-backed geocoder over a short list of known hospitals.
///
/// Stands in for the real provider so the service runs self-contained; the
/// HTTP transport is a collaborator concern and slots in behind the same
/// trait.
#[derive(Default, Clone)]
pub(crate) struct StaticGeocoder;

impl Geocoder for StaticGeocoder {
    fn reverse(&self, lat: f64, lng: f64) -> Result<Address, GeocodeError> {
        KNOWN_PLACES
            .iter()
            .min_by(|a, b| {
                let da = distance_km(lat, lng, a.lat, a.lng);
                let db = distance_km(lat, lng, b.lat, b.lng);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(KnownPlace::address)
            .ok_or_else(|| GeocodeError::Transport("no reference places loaded".to_string()))
    }

    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let needle = query.trim().to_lowercase();
        Ok(KNOWN_PLACES
            .iter()
            .filter(|place| place.name.to_lowercase().contains(&needle))
            .map(|place| PlaceCandidate {
                name: place.name.to_string(),
                lat: place.lat,
                lng: place.lng,
                address: place.address(),
            })
            .collect())
    }
}

pub(crate) fn parse_blood_type(raw: &str) -> Result<BloodType, String> {
    raw.parse::<BloodType>().map_err(|err| err.to_string())
}
