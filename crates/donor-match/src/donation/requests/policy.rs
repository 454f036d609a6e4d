use serde::{Deserialize, Serialize};

use crate::donation::geo::{CountryBounds, MEXICO};

/// Board-wide dials for intake validation and lifecycle limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPolicy {
    /// Concurrent active-request ceiling per requester.
    pub max_active_requests: usize,
    /// Days a request stays discoverable after creation.
    pub request_ttl_days: i64,
    /// Upper bound on requested blood units.
    pub max_units: u32,
    /// Upper bound on a request's response capacity.
    pub max_response_cap: u32,
    /// Upper bound on a donor response message, in characters.
    pub max_message_len: usize,
    /// Service-area rectangle hospital pins must fall inside.
    pub bounds: CountryBounds,
}

impl Default for BoardPolicy {
    fn default() -> Self {
        Self {
            max_active_requests: 3,
            request_ttl_days: 14,
            max_units: 10,
            max_response_cap: 10,
            max_message_len: 500,
            bounds: MEXICO,
        }
    }
}
