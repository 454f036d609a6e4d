use chrono::{DateTime, Duration, Utc};

use super::domain::{DonationRequest, RequestId, RequestStatus, RequestSubmission};
use super::policy::BoardPolicy;

/// Validation errors raised while turning a submission into a stored request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("patient name is required")]
    MissingPatientName,
    #[error("hospital name is required")]
    MissingHospitalName,
    #[error("units needed must be between 1 and {max}, got {got}")]
    InvalidUnits { got: u32, max: u32 },
    #[error("max responses must be between 1 and {max}, got {got}")]
    InvalidResponseCap { got: u32, max: u32 },
    #[error("contact phone must be a 10 digit number, got '{0}'")]
    InvalidPhone(String),
    #[error("hospital location ({lat}, {lng}) is outside the service area")]
    InvalidLocation { lat: f64, lng: f64 },
}

/// Guard responsible for producing `DonationRequest` records.
#[derive(Debug, Clone)]
pub struct RequestIntake {
    policy: BoardPolicy,
}

impl RequestIntake {
    pub fn new(policy: BoardPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BoardPolicy {
        &self.policy
    }

    /// Validate an inbound submission and stamp it into a request record.
    ///
    /// The expiry is fixed here, at creation, and never recomputed.
    pub fn request_from_submission(
        &self,
        submission: RequestSubmission,
        id: RequestId,
        now: DateTime<Utc>,
    ) -> Result<DonationRequest, SubmissionError> {
        let patient_name = submission.patient_name.trim().to_string();
        if patient_name.is_empty() {
            return Err(SubmissionError::MissingPatientName);
        }

        let hospital_name = submission.hospital_name.trim().to_string();
        if hospital_name.is_empty() {
            return Err(SubmissionError::MissingHospitalName);
        }

        if submission.units_needed == 0 || submission.units_needed > self.policy.max_units {
            return Err(SubmissionError::InvalidUnits {
                got: submission.units_needed,
                max: self.policy.max_units,
            });
        }

        if submission.max_responses == 0 || submission.max_responses > self.policy.max_response_cap
        {
            return Err(SubmissionError::InvalidResponseCap {
                got: submission.max_responses,
                max: self.policy.max_response_cap,
            });
        }

        if !self
            .policy
            .bounds
            .contains(submission.hospital_lat, submission.hospital_lng)
        {
            return Err(SubmissionError::InvalidLocation {
                lat: submission.hospital_lat,
                lng: submission.hospital_lng,
            });
        }

        let contact_phone = normalize_phone(&submission.contact_phone)?;

        Ok(DonationRequest {
            id,
            requester_id: submission.requester_id,
            patient_name,
            patient_blood_type: submission.patient_blood_type,
            units_needed: submission.units_needed,
            hospital_name,
            hospital_address: submission.hospital_address,
            hospital_city: submission.hospital_city,
            hospital_state: submission.hospital_state,
            hospital_lat: submission.hospital_lat,
            hospital_lng: submission.hospital_lng,
            contact_phone,
            medical_condition: submission.medical_condition,
            additional_notes: submission.additional_notes,
            urgency: submission.urgency,
            max_responses: submission.max_responses,
            status: RequestStatus::Active,
            created_at: now,
            expires_at: now + Duration::days(self.policy.request_ttl_days),
        })
    }
}

impl Default for RequestIntake {
    fn default() -> Self {
        Self::new(BoardPolicy::default())
    }
}

/// Accept a bare 10-digit national number, with or without the +52 prefix,
/// and store it in the prefixed form.
fn normalize_phone(raw: &str) -> Result<String, SubmissionError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("+52").unwrap_or(trimmed);

    if digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(format!("+52{digits}"))
    } else {
        Err(SubmissionError::InvalidPhone(raw.to_string()))
    }
}
