//! Donor-facing discoverability filter.
//!
//! A pure function of (candidate requests, donor context, now) -> ordered
//! list. Re-running it on a change notification is the whole "live update"
//! story; nothing here subscribes to anything.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use super::domain::{DonationRequest, Profile};
use crate::donation::blood::{can_donate, BloodType};
use crate::donation::geo::{distance_km, format_distance};

/// The donor's side of a discovery query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonorContext {
    pub blood_type: BloodType,
    pub location: Option<(f64, f64)>,
}

impl DonorContext {
    /// Build the discovery context straight from a resolved profile.
    pub fn for_profile(profile: &Profile) -> Self {
        Self {
            blood_type: profile.blood_type,
            location: profile.location(),
        }
    }
}

/// A discoverable request annotated for the donor's view.
#[derive(Debug, Clone, Serialize)]
pub struct OpenRequest {
    #[serde(flatten)]
    pub request: DonationRequest,
    pub response_count: usize,
    pub slots_remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
}

/// Filter and order candidate requests for one donor.
///
/// Keeps requests that are stored active, not yet expired, and whose patient
/// type the donor can supply. Ordering: urgency rank first, then ascending
/// distance when the donor location is known (requests without a computable
/// distance sort after those with one), then newest creation time.
pub fn discover(
    candidates: Vec<(DonationRequest, usize)>,
    donor: &DonorContext,
    now: DateTime<Utc>,
) -> Vec<OpenRequest> {
    let mut open: Vec<OpenRequest> = candidates
        .into_iter()
        .filter(|(request, _)| {
            request.is_open(now) && can_donate(donor.blood_type, request.patient_blood_type)
        })
        .map(|(request, response_count)| {
            let distance = donor.location.map(|(lat, lng)| {
                distance_km(lat, lng, request.hospital_lat, request.hospital_lng)
            });
            let slots_remaining = request.max_responses.saturating_sub(response_count as u32);
            OpenRequest {
                request,
                response_count,
                slots_remaining,
                distance_km: distance,
                distance_label: distance.map(format_distance),
            }
        })
        .collect();

    open.sort_by(|a, b| {
        a.request
            .urgency
            .rank()
            .cmp(&b.request.urgency.rank())
            .then_with(|| compare_distances(a.distance_km, b.distance_km))
            .then_with(|| b.request.created_at.cmp(&a.request.created_at))
    });

    open
}

fn compare_distances(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
