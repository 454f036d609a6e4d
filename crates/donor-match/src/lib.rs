//! Matching core for a donor/requester blood donation service.
//!
//! Requesters open time-boxed donation requests tied to a hospital location;
//! compatible donors discover them nearest-first and respond against a
//! bounded capacity. The crate holds the compatibility table, the geospatial
//! math, the eligibility questionnaire, and the request/response lifecycle
//! engine, all behind repository and notifier traits so an embedding service
//! chooses the storage and transport.

pub mod config;
pub mod donation;
pub mod error;
pub mod telemetry;
