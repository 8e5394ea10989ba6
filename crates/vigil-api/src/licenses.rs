//! Handlers for `/licenses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/licenses` | Every license with its computed `status` |
//! | `POST`   | `/licenses` | Body: [`LicenseBody`]; returns 201 |
//! | `GET`    | `/licenses/:legajo` | 404 if not found |
//! | `PUT`    | `/licenses/:legajo` | Body: [`LicenseBody`]; may rename the `legajo` |
//! | `DELETE` | `/licenses/:legajo` | 204 |
//! | `POST`   | `/licenses/:legajo/renew` | Body: [`RenewBody`] |

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
  license::{LicenseDraft, LicenseRecord, Renewal},
  resolved::Resolved,
  store::FleetStore,
};

use crate::{ApiState, error::ApiError};

/// JSON body accepted by `POST /licenses` and `PUT /licenses/:legajo`.
///
/// Every field is required; they are optional here so a missing one is
/// reported by name rather than as a generic parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseBody {
  pub legajo:      Option<String>,
  pub name:        Option<String>,
  pub surname:     Option<String>,
  pub national_id: Option<String>,
  pub expiry_date: Option<NaiveDate>,
}

impl TryFrom<LicenseBody> for LicenseDraft {
  type Error = vigil_core::Error;

  fn try_from(b: LicenseBody) -> Result<Self, Self::Error> {
    LicenseDraft::from_parts(b.legajo, b.name, b.surname, b.national_id, b.expiry_date)
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /licenses`
pub async fn list<S: FleetStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Resolved<LicenseRecord>>>, ApiError> {
  let licenses = state.store.list_licenses().await?;
  Ok(Json(Resolved::all(licenses, state.clock.today())))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /licenses/:legajo`
pub async fn get_one<S: FleetStore>(
  State(state): State<ApiState<S>>,
  legajo: Result<Path<String>, PathRejection>,
) -> Result<Json<Resolved<LicenseRecord>>, ApiError> {
  let Path(legajo) = legajo?;
  let license = state
    .store
    .get_license(legajo.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("license not found: {legajo}")))?;
  Ok(Json(Resolved::new(license, state.clock.today())))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /licenses`: returns 201 + the stored license.
pub async fn create<S: FleetStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<LicenseBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let draft = LicenseDraft::try_from(body)?;
  let license = state.store.create_license(draft).await?;
  Ok((StatusCode::CREATED, Json(Resolved::new(license, state.clock.today()))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /licenses/:legajo`: replaces every field but the renewal history.
pub async fn update<S: FleetStore>(
  State(state): State<ApiState<S>>,
  legajo: Result<Path<String>, PathRejection>,
  body: Result<Json<LicenseBody>, JsonRejection>,
) -> Result<Json<Resolved<LicenseRecord>>, ApiError> {
  let Path(legajo) = legajo?;
  let Json(body) = body?;
  let draft = LicenseDraft::try_from(body)?;
  let license = state.store.update_license(legajo, draft).await?;
  Ok(Json(Resolved::new(license, state.clock.today())))
}

// ─── Renew ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewBody {
  pub new_expiry_date: Option<NaiveDate>,
  pub notes:           Option<String>,
}

/// `POST /licenses/:legajo/renew`: body: `{"newExpiryDate":"YYYY-MM-DD","notes":"..."}`.
pub async fn renew<S: FleetStore>(
  State(state): State<ApiState<S>>,
  legajo: Result<Path<String>, PathRejection>,
  body: Result<Json<RenewBody>, JsonRejection>,
) -> Result<Json<Resolved<LicenseRecord>>, ApiError> {
  let Path(legajo) = legajo?;
  let Json(body) = body?;
  let renewal = Renewal::from_parts(body.new_expiry_date, body.notes)?;
  let today = state.clock.today();
  let license = state.store.renew_license(legajo, renewal, today).await?;
  Ok(Json(Resolved::new(license, today)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /licenses/:legajo`
pub async fn delete_one<S: FleetStore>(
  State(state): State<ApiState<S>>,
  legajo: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
  let Path(legajo) = legajo?;
  state.store.delete_license(legajo).await?;
  Ok(StatusCode::NO_CONTENT)
}
