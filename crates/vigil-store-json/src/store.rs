//! [`JsonStore`]: the JSON-file implementation of [`FleetStore`].

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use vigil_core::{
  Error as CoreError, Result,
  collection::{self, find_by_key},
  extinguisher::{
    ExpiryRefresh, ExtinguisherDraft, ExtinguisherRecord, Replacement,
    find_by_vehicle, next_id,
  },
  license::{LicenseDraft, LicenseRecord, Renewal},
  store::FleetStore,
};

use crate::document::Document;

pub const LICENSES_FILE: &str = "licenses.json";
pub const EXTINGUISHERS_FILE: &str = "extinguishers.json";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fleet store backed by two JSON documents in one directory.
///
/// Cloning is cheap; the store holds only paths. Writes are not coordinated
/// across callers, so two concurrent writes to the same collection can lose
/// one of them.
#[derive(Debug, Clone)]
pub struct JsonStore {
  dir:           PathBuf,
  licenses:      Document<LicenseRecord>,
  extinguishers: Document<ExtinguisherRecord>,
}

impl JsonStore {
  /// Open a store rooted at `dir`. Nothing is touched on disk until the
  /// first write.
  pub fn open(dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    Self {
      licenses:      Document::new(dir.join(LICENSES_FILE)),
      extinguishers: Document::new(dir.join(EXTINGUISHERS_FILE)),
      dir,
    }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn licenses(&self) -> &Document<LicenseRecord> { &self.licenses }

  pub fn extinguishers(&self) -> &Document<ExtinguisherRecord> {
    &self.extinguishers
  }

  async fn load_licenses(&self) -> Result<Vec<LicenseRecord>> {
    Ok(self.licenses.load_all().await?)
  }

  async fn save_licenses(&self, records: &[LicenseRecord]) -> Result<()> {
    Ok(self.licenses.save_all(records).await?)
  }

  async fn load_extinguishers(&self) -> Result<Vec<ExtinguisherRecord>> {
    Ok(self.extinguishers.load_all().await?)
  }

  async fn save_extinguishers(&self, records: &[ExtinguisherRecord]) -> Result<()> {
    Ok(self.extinguishers.save_all(records).await?)
  }
}

// ─── FleetStore impl ─────────────────────────────────────────────────────────

impl FleetStore for JsonStore {
  // ── Licenses ──────────────────────────────────────────────────────────

  async fn list_licenses(&self) -> Result<Vec<LicenseRecord>> {
    self.load_licenses().await
  }

  async fn get_license(&self, legajo: String) -> Result<Option<LicenseRecord>> {
    let records = self.load_licenses().await?;
    Ok(find_by_key(&records, &legajo).cloned())
  }

  async fn create_license(&self, draft: LicenseDraft) -> Result<LicenseRecord> {
    let mut records = self.load_licenses().await?;
    let created = collection::insert(&mut records, LicenseRecord::from_draft(draft))?.clone();
    self.save_licenses(&records).await?;
    tracing::info!(legajo = %created.legajo, "license created");
    Ok(created)
  }

  async fn update_license(
    &self,
    legajo: String,
    draft: LicenseDraft,
  ) -> Result<LicenseRecord> {
    let mut records = self.load_licenses().await?;
    let updated =
      collection::replace(&mut records, &legajo, LicenseRecord::from_draft(draft))?.clone();
    self.save_licenses(&records).await?;
    if updated.legajo != legajo {
      tracing::info!(from = %legajo, to = %updated.legajo, "license renamed");
    }
    Ok(updated)
  }

  async fn renew_license(
    &self,
    legajo: String,
    renewal: Renewal,
    today: NaiveDate,
  ) -> Result<LicenseRecord> {
    let mut records = self.load_licenses().await?;
    let index = collection::position(&records, &legajo)?;
    let record = &mut records[index];
    let entry = record.renew(renewal, today).clone();
    let renewed = record.clone();
    self.save_licenses(&records).await?;
    tracing::info!(
      legajo = %legajo,
      previous = %entry.previous_expiry_date,
      new = %entry.new_expiry_date,
      "license renewed"
    );
    Ok(renewed)
  }

  async fn delete_license(&self, legajo: String) -> Result<LicenseRecord> {
    let mut records = self.load_licenses().await?;
    let removed = collection::delete_by_key(&mut records, &legajo)?;
    self.save_licenses(&records).await?;
    tracing::info!(legajo = %legajo, "license deleted");
    Ok(removed)
  }

  // ── Extinguishers ─────────────────────────────────────────────────────

  async fn list_extinguishers(&self) -> Result<Vec<ExtinguisherRecord>> {
    self.load_extinguishers().await
  }

  async fn get_extinguisher(&self, id: u64) -> Result<Option<ExtinguisherRecord>> {
    let records = self.load_extinguishers().await?;
    Ok(find_by_key(&records, &id).cloned())
  }

  async fn create_extinguisher(
    &self,
    draft: ExtinguisherDraft,
  ) -> Result<ExtinguisherRecord> {
    let mut records = self.load_extinguishers().await?;
    let id = next_id(&records);
    let created =
      collection::insert(&mut records, ExtinguisherRecord::from_draft(id, draft))?.clone();
    self.save_extinguishers(&records).await?;
    tracing::info!(id, vehicle = %created.vehicle_number, "extinguisher created");
    Ok(created)
  }

  async fn update_extinguisher(
    &self,
    id: u64,
    draft: ExtinguisherDraft,
  ) -> Result<ExtinguisherRecord> {
    let mut records = self.load_extinguishers().await?;
    let updated =
      collection::replace(&mut records, &id, ExtinguisherRecord::from_draft(id, draft))?
        .clone();
    self.save_extinguishers(&records).await?;
    Ok(updated)
  }

  async fn replace_extinguisher(
    &self,
    id: u64,
    replacement: Replacement,
    today: NaiveDate,
  ) -> Result<ExtinguisherRecord> {
    let mut records = self.load_extinguishers().await?;
    let index = collection::position(&records, &id)?;
    let record = &mut records[index];
    let entry = record.replace(replacement, today).clone();
    let replaced = record.clone();
    self.save_extinguishers(&records).await?;
    tracing::info!(
      id,
      previous = %entry.previous_extinguisher_number,
      new = %entry.new_extinguisher_number,
      "extinguisher replaced"
    );
    Ok(replaced)
  }

  async fn refresh_by_vehicle(
    &self,
    vehicle_number: String,
    refresh: ExpiryRefresh,
    today: NaiveDate,
  ) -> Result<ExtinguisherRecord> {
    let mut records = self.load_extinguishers().await?;
    let id = find_by_vehicle(&records, &vehicle_number)
      .map(|r| r.id)
      .ok_or_else(|| CoreError::not_found("extinguisher for vehicle", &vehicle_number))?;
    let index = collection::position(&records, &id)?;
    let record = &mut records[index];
    record.refresh(refresh, today);
    let refreshed = record.clone();
    self.save_extinguishers(&records).await?;
    tracing::info!(id, vehicle = %vehicle_number, expiry = %refreshed.expiry_date, "extinguisher refreshed");
    Ok(refreshed)
  }

  async fn delete_extinguisher(&self, id: u64) -> Result<ExtinguisherRecord> {
    let mut records = self.load_extinguishers().await?;
    let removed = collection::delete_by_key(&mut records, &id)?;
    self.save_extinguishers(&records).await?;
    tracing::info!(id, "extinguisher deleted");
    Ok(removed)
  }
}
