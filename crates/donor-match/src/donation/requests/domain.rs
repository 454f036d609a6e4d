use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::donation::blood::BloodType;

/// Identifier for a profile resolved by the external auth store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier wrapper for donation requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Identifier wrapper for donor responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Donor,
    Requester,
}

/// Caller profile as resolved by the auth subsystem. Consumed read-only;
/// the matching core never authenticates anyone itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub blood_type: BloodType,
    pub role: ProfileRole,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
}

impl Profile {
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location_lat.zip(self.location_lng)
    }
}

/// Requester-assigned priority tier controlling discovery sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Urgent,
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Sort key: lower ranks surface first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Active,
    Fulfilled,
    Cancelled,
    Expired,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Interested,
    Confirmed,
    Completed,
    Cancelled,
}

impl ResponseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interested => "interested",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Status advances monotonically interested -> confirmed -> completed;
    /// any non-terminal status may instead move to cancelled.
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Interested, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Interested, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inbound request payload before intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSubmission {
    pub requester_id: ProfileId,
    pub patient_name: String,
    pub patient_blood_type: BloodType,
    pub units_needed: u32,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_city: String,
    pub hospital_state: String,
    pub hospital_lat: f64,
    pub hospital_lng: f64,
    pub contact_phone: String,
    #[serde(default)]
    pub medical_condition: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    pub urgency: Urgency,
    pub max_responses: u32,
}

/// A validated, stored donation request.
///
/// Requests are soft-retained for requester history and never deleted.
/// `expires_at` is fixed at creation; expiry is always derived at read time
/// through [`DonationRequest::effective_status`], never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRequest {
    pub id: RequestId,
    pub requester_id: ProfileId,
    pub patient_name: String,
    pub patient_blood_type: BloodType,
    pub units_needed: u32,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_city: String,
    pub hospital_state: String,
    pub hospital_lat: f64,
    pub hospital_lng: f64,
    pub contact_phone: String,
    pub medical_condition: Option<String>,
    pub additional_notes: Option<String>,
    pub urgency: Urgency,
    pub max_responses: u32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DonationRequest {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Discoverable by donors: stored as active and not yet past expiry.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == RequestStatus::Active && !self.is_expired(now)
    }

    /// The status a reader should display: a stored `active` past its
    /// expiry reads as `expired` without any write ever happening.
    pub fn effective_status(&self, now: DateTime<Utc>) -> RequestStatus {
        if self.status == RequestStatus::Active && self.is_expired(now) {
            RequestStatus::Expired
        } else {
            self.status
        }
    }
}

/// Inbound donor response payload; the request id arrives out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSubmission {
    pub donor_id: ProfileId,
    #[serde(default)]
    pub message: Option<String>,
}

/// A stored donor response to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorResponse {
    pub id: ResponseId,
    pub request_id: RequestId,
    pub donor_id: ProfileId,
    pub status: ResponseStatus,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
