//! Core types and domain logic for Vigil, the fleet expiry tracker.
//!
//! Tracks two kinds of regulated assets (driver licenses and vehicle fire
//! extinguishers) and classifies each by how close it is to expiring.
//!
//! This crate is deliberately free of HTTP and storage dependencies. All
//! other crates depend on it.

pub mod clock;
pub mod collection;
pub mod error;
pub mod extinguisher;
pub mod license;
pub mod report;
pub mod resolved;
pub mod status;
pub mod store;

pub use error::{Error, Result};
