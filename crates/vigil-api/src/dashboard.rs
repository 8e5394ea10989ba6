//! Handler for `GET /dashboard`.

use axum::{Json, extract::State};
use vigil_core::{
  report::{Dashboard, dashboard},
  store::FleetStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /dashboard`: counts and the 30-day lookahead for both collections.
pub async fn handler<S: FleetStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Dashboard>, ApiError> {
  let licenses = state.store.list_licenses().await?;
  let extinguishers = state.store.list_extinguishers().await?;
  Ok(Json(dashboard(&licenses, &extinguishers, state.clock.today())))
}
