//! Handlers for `/extinguishers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/extinguishers` | Every unit with its computed `status` |
//! | `POST`   | `/extinguishers` | Body: [`ExtinguisherBody`]; id is assigned; returns 201 |
//! | `GET`    | `/extinguishers/:id` | 404 if not found |
//! | `PUT`    | `/extinguishers/:id` | Body: [`ExtinguisherBody`] |
//! | `DELETE` | `/extinguishers/:id` | 204 |
//! | `POST`   | `/extinguishers/:id/replace` | Body: [`ReplaceBody`]; new number and expiry |
//! | `POST`   | `/extinguishers/replace-by-vehicle` | Body: [`VehicleRefreshBody`]; expiry only |
//!
//! The two replacement endpoints differ: replacing by id swaps the
//! unit's number, replacing by vehicle keeps it and records the same number
//! on both sides of the history entry.

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use vigil_core::{
  extinguisher::{ExpiryRefresh, ExtinguisherDraft, ExtinguisherRecord, Replacement},
  resolved::Resolved,
  store::FleetStore,
};

use crate::{ApiState, error::ApiError};

/// A vehicle number sent either as a JSON string or a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VehicleNumber {
  Text(String),
  Number(serde_json::Number),
}

impl From<VehicleNumber> for String {
  fn from(v: VehicleNumber) -> Self {
    match v {
      VehicleNumber::Text(s) => s,
      VehicleNumber::Number(n) => n.to_string(),
    }
  }
}

/// JSON body accepted by `POST /extinguishers` and `PUT /extinguishers/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtinguisherBody {
  pub extinguisher_number: Option<String>,
  pub vehicle_number:      Option<VehicleNumber>,
  pub expiry_date:         Option<NaiveDate>,
}

impl TryFrom<ExtinguisherBody> for ExtinguisherDraft {
  type Error = vigil_core::Error;

  fn try_from(b: ExtinguisherBody) -> Result<Self, Self::Error> {
    ExtinguisherDraft::from_parts(
      b.extinguisher_number,
      b.vehicle_number.map(String::from),
      b.expiry_date,
    )
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /extinguishers`
pub async fn list<S: FleetStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Resolved<ExtinguisherRecord>>>, ApiError> {
  let units = state.store.list_extinguishers().await?;
  Ok(Json(Resolved::all(units, state.clock.today())))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /extinguishers/:id`
pub async fn get_one<S: FleetStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Resolved<ExtinguisherRecord>>, ApiError> {
  let Path(id) = id?;
  let unit = state
    .store
    .get_extinguisher(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("extinguisher not found: {id}")))?;
  Ok(Json(Resolved::new(unit, state.clock.today())))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /extinguishers`: returns 201 + the stored unit with its new id.
pub async fn create<S: FleetStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<ExtinguisherBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let draft = ExtinguisherDraft::try_from(body)?;
  let unit = state.store.create_extinguisher(draft).await?;
  Ok((StatusCode::CREATED, Json(Resolved::new(unit, state.clock.today()))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /extinguishers/:id`: replaces every field but the id and history.
pub async fn update<S: FleetStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<u64>, PathRejection>,
  body: Result<Json<ExtinguisherBody>, JsonRejection>,
) -> Result<Json<Resolved<ExtinguisherRecord>>, ApiError> {
  let Path(id) = id?;
  let Json(body) = body?;
  let draft = ExtinguisherDraft::try_from(body)?;
  let unit = state.store.update_extinguisher(id, draft).await?;
  Ok(Json(Resolved::new(unit, state.clock.today())))
}

// ─── Replace by id ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceBody {
  pub new_extinguisher_number: Option<String>,
  pub new_expiry_date:         Option<NaiveDate>,
  pub notes:                   Option<String>,
}

/// `POST /extinguishers/:id/replace`
pub async fn replace<S: FleetStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<u64>, PathRejection>,
  body: Result<Json<ReplaceBody>, JsonRejection>,
) -> Result<Json<Resolved<ExtinguisherRecord>>, ApiError> {
  let Path(id) = id?;
  let Json(body) = body?;
  let replacement = Replacement::from_parts(
    body.new_extinguisher_number,
    body.new_expiry_date,
    body.notes,
  )?;
  let today = state.clock.today();
  let unit = state.store.replace_extinguisher(id, replacement, today).await?;
  Ok(Json(Resolved::new(unit, today)))
}

// ─── Replace by vehicle ───────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRefreshBody {
  pub vehicle_number:  Option<VehicleNumber>,
  pub new_expiry_date: Option<NaiveDate>,
  pub notes:           Option<String>,
}

/// `POST /extinguishers/replace-by-vehicle`
pub async fn replace_by_vehicle<S: FleetStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<VehicleRefreshBody>, JsonRejection>,
) -> Result<Json<Resolved<ExtinguisherRecord>>, ApiError> {
  let Json(body) = body?;
  let vehicle = vigil_core::error::required_text(
    "vehicleNumber",
    body.vehicle_number.map(String::from),
  )?;
  let refresh = ExpiryRefresh::from_parts(body.new_expiry_date, body.notes)?;
  let today = state.clock.today();
  let unit = state.store.refresh_by_vehicle(vehicle, refresh, today).await?;
  Ok(Json(Resolved::new(unit, today)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /extinguishers/:id`
pub async fn delete_one<S: FleetStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
  let Path(id) = id?;
  state.store.delete_extinguisher(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
