//! Geocoding port and caching wrapper.
//!
//! The matching core never talks to a provider directly; it consumes this
//! trait and only ever needs coordinates plus the returned city/state
//! strings. Provider failures degrade to a placeholder address or an empty
//! candidate list rather than failing the surrounding operation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

/// Upper bound on place-search candidates returned to callers.
pub const MAX_PLACE_RESULTS: usize = 5;

/// Queries shorter than this never reach the provider.
pub const MIN_QUERY_LEN: usize = 3;

const CACHE_TTL_DAYS: i64 = 30;

/// Structured address as returned by reverse geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub full: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postcode: String,
}

impl Address {
    /// Generic placeholder used when the provider is unreachable.
    pub fn fallback(lat: f64, lng: f64) -> Self {
        Self {
            full: format!("Lat: {lat:.4}, Lng: {lng:.4}"),
            street: String::new(),
            city: "Ciudad de México".to_string(),
            state: "CDMX".to_string(),
            country: "México".to_string(),
            postcode: String::new(),
        }
    }
}

/// One ranked candidate from a forward place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: Address,
}

/// Geocoding transport failure.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding provider unavailable: {0}")]
    Transport(String),
}

/// Reverse/forward geocoding provider contract.
pub trait Geocoder: Send + Sync {
    fn reverse(&self, lat: f64, lng: f64) -> Result<Address, GeocodeError>;

    /// Up to [`MAX_PLACE_RESULTS`] ranked candidates for a free-text query.
    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError>;

    /// Reverse lookup that degrades to [`Address::fallback`] on failure.
    fn reverse_or_fallback(&self, lat: f64, lng: f64) -> Address {
        match self.reverse(lat, lng) {
            Ok(address) => address,
            Err(error) => {
                warn!(%lat, %lng, %error, "reverse geocode failed, using fallback address");
                Address::fallback(lat, lng)
            }
        }
    }
}

struct CacheEntry {
    address: Address,
    stamped_at: DateTime<Utc>,
}

/// Caching wrapper around a provider.
///
/// Reverse lookups are cached under coordinates rounded to four decimals so
/// near-identical pins share an entry; entries expire after thirty days.
/// Forward searches pass through, with the short-query guard and result cap
/// applied here so no provider implementation has to repeat them.
pub struct CachingGeocoder<G> {
    inner: G,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<G: Geocoder> CachingGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self::with_ttl(inner, Duration::days(CACHE_TTL_DAYS))
    }

    pub fn with_ttl(inner: G, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(lat: f64, lng: f64) -> String {
        format!("{lat:.4},{lng:.4}")
    }
}

impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    fn reverse(&self, lat: f64, lng: f64) -> Result<Address, GeocodeError> {
        let key = Self::cache_key(lat, lng);
        let now = Utc::now();

        {
            let entries = self.entries.lock().expect("geocode cache mutex poisoned");
            if let Some(entry) = entries.get(&key) {
                if now - entry.stamped_at < self.ttl {
                    return Ok(entry.address.clone());
                }
            }
        }

        let address = self.inner.reverse(lat, lng)?;
        self.entries
            .lock()
            .expect("geocode cache mutex poisoned")
            .insert(
                key,
                CacheEntry {
                    address: address.clone(),
                    stamped_at: now,
                },
            );
        Ok(address)
    }

    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        if query.trim().len() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let mut candidates = self.inner.search(query)?;
        candidates.truncate(MAX_PLACE_RESULTS);
        Ok(candidates)
    }
}
