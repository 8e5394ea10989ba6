//! JSON REST API for Vigil.
//!
//! Exposes an axum [`Router`] backed by any [`vigil_core::store::FleetStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vigil_api::api_router(state))
//! ```

pub mod dashboard;
pub mod error;
pub mod extinguishers;
pub mod licenses;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use vigil_core::{clock::Clock, store::FleetStore};

pub use error::ApiError;

/// State shared by every API handler.
pub struct ApiState<S> {
  pub store: Arc<S>,
  /// Reference date for status, history stamps, and the dashboard.
  pub clock: Arc<dyn Clock>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), clock: Arc::clone(&self.clock) }
  }
}

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: FleetStore + 'static,
{
  Router::new()
    // Licenses
    .route(
      "/licenses",
      get(licenses::list::<S>).post(licenses::create::<S>),
    )
    .route(
      "/licenses/{legajo}",
      get(licenses::get_one::<S>)
        .put(licenses::update::<S>)
        .delete(licenses::delete_one::<S>),
    )
    .route("/licenses/{legajo}/renew", post(licenses::renew::<S>))
    // Extinguishers
    .route(
      "/extinguishers",
      get(extinguishers::list::<S>).post(extinguishers::create::<S>),
    )
    .route(
      "/extinguishers/replace-by-vehicle",
      post(extinguishers::replace_by_vehicle::<S>),
    )
    .route(
      "/extinguishers/{id}",
      get(extinguishers::get_one::<S>)
        .put(extinguishers::update::<S>)
        .delete(extinguishers::delete_one::<S>),
    )
    .route("/extinguishers/{id}/replace", post(extinguishers::replace::<S>))
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(state)
}
