//! JSON-file backend for the Vigil fleet store.
//!
//! Each collection lives in its own pretty-printed JSON array. Every
//! operation reads the whole file and, for writes, rewrites it.

mod document;
mod store;

pub mod error;

pub use document::Document;
pub use error::{Error, Result};
pub use store::{EXTINGUISHERS_FILE, JsonStore, LICENSES_FILE};
