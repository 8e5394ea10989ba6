//! The `FleetStore` trait.
//!
//! Implemented by storage backends (e.g. `vigil-store-json`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.
//!
//! Every method is a single whole-collection round trip: load, apply one of
//! the [`collection`](crate::collection) operations or a history transition,
//! and save only on success. Nothing is cached between calls and concurrent
//! writers are not coordinated; the last save wins.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  Result,
  extinguisher::{ExpiryRefresh, ExtinguisherDraft, ExtinguisherRecord, Replacement},
  license::{LicenseDraft, LicenseRecord, Renewal},
};

pub trait FleetStore: Send + Sync {
  // ── Licenses ──────────────────────────────────────────────────────────

  /// All licenses in stored order.
  fn list_licenses(
    &self,
  ) -> impl Future<Output = Result<Vec<LicenseRecord>>> + Send + '_;

  /// Returns `None` if no license has this `legajo`.
  fn get_license(
    &self,
    legajo: String,
  ) -> impl Future<Output = Result<Option<LicenseRecord>>> + Send + '_;

  /// Fails with `DuplicateKey` if the `legajo` is taken.
  fn create_license(
    &self,
    draft: LicenseDraft,
  ) -> impl Future<Output = Result<LicenseRecord>> + Send + '_;

  /// Replace every editable field of the license stored under `legajo`,
  /// keeping its renewal history. The draft may rename the `legajo`.
  fn update_license(
    &self,
    legajo: String,
    draft: LicenseDraft,
  ) -> impl Future<Output = Result<LicenseRecord>> + Send + '_;

  /// Append a renewal dated `today` and move the expiry.
  fn renew_license(
    &self,
    legajo: String,
    renewal: Renewal,
    today: NaiveDate,
  ) -> impl Future<Output = Result<LicenseRecord>> + Send + '_;

  /// Remove the license and return it.
  fn delete_license(
    &self,
    legajo: String,
  ) -> impl Future<Output = Result<LicenseRecord>> + Send + '_;

  // ── Extinguishers ─────────────────────────────────────────────────────

  fn list_extinguishers(
    &self,
  ) -> impl Future<Output = Result<Vec<ExtinguisherRecord>>> + Send + '_;

  fn get_extinguisher(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<Option<ExtinguisherRecord>>> + Send + '_;

  /// Persist a new extinguisher under the next free id.
  fn create_extinguisher(
    &self,
    draft: ExtinguisherDraft,
  ) -> impl Future<Output = Result<ExtinguisherRecord>> + Send + '_;

  fn update_extinguisher(
    &self,
    id: u64,
    draft: ExtinguisherDraft,
  ) -> impl Future<Output = Result<ExtinguisherRecord>> + Send + '_;

  /// Swap the unit with id `id` for a new one.
  fn replace_extinguisher(
    &self,
    id: u64,
    replacement: Replacement,
    today: NaiveDate,
  ) -> impl Future<Output = Result<ExtinguisherRecord>> + Send + '_;

  /// Refresh the expiry of the first unit carried by `vehicle_number`,
  /// keeping its number. Fails with `NotFound` if the vehicle has none.
  fn refresh_by_vehicle(
    &self,
    vehicle_number: String,
    refresh: ExpiryRefresh,
    today: NaiveDate,
  ) -> impl Future<Output = Result<ExtinguisherRecord>> + Send + '_;

  fn delete_extinguisher(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<ExtinguisherRecord>> + Send + '_;
}
