//! Vehicle fire extinguishers and their replacement history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  collection::Record,
  error::{required, required_text},
};

/// One replacement (or recharge) of the unit assigned to a vehicle.
///
/// When only the expiry was refreshed the previous and new extinguisher
/// numbers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementEntry {
  #[serde(alias = "fechaReemplazo")]
  pub replacement_date:             NaiveDate,
  #[serde(alias = "numeroMatafuegoAnterior")]
  pub previous_extinguisher_number: String,
  #[serde(alias = "numeroMatafuegoNuevo")]
  pub new_extinguisher_number:      String,
  #[serde(alias = "fechaVencimientoAnterior")]
  pub previous_expiry_date:         NaiveDate,
  #[serde(alias = "fechaVencimientoNueva")]
  pub new_expiry_date:              NaiveDate,
  #[serde(default, alias = "observaciones")]
  pub notes:                        String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtinguisherRecord {
  /// Surrogate key assigned on creation.
  pub id:                  u64,
  #[serde(alias = "numeroMatafuego")]
  pub extinguisher_number: String,
  #[serde(alias = "numeroCoche")]
  pub vehicle_number:      String,
  #[serde(alias = "fechaVencimiento")]
  pub expiry_date:         NaiveDate,
  #[serde(default, alias = "historialReemplazos")]
  pub replacement_history: Vec<ReplacementEntry>,
}

impl ExtinguisherRecord {
  pub fn from_draft(id: u64, draft: ExtinguisherDraft) -> Self {
    Self {
      id,
      extinguisher_number: draft.extinguisher_number,
      vehicle_number: draft.vehicle_number,
      expiry_date: draft.expiry_date,
      replacement_history: Vec::new(),
    }
  }

  /// Swap in a new unit: both the number and the expiry change.
  pub fn replace(
    &mut self,
    replacement: Replacement,
    today: NaiveDate,
  ) -> &ReplacementEntry {
    self.replacement_history.push(ReplacementEntry {
      replacement_date:             today,
      previous_extinguisher_number: self.extinguisher_number.clone(),
      new_extinguisher_number:      replacement.new_extinguisher_number.clone(),
      previous_expiry_date:         self.expiry_date,
      new_expiry_date:              replacement.new_expiry_date,
      notes:                        replacement.notes.unwrap_or_default(),
    });
    self.extinguisher_number = replacement.new_extinguisher_number;
    self.expiry_date = replacement.new_expiry_date;
    &self.replacement_history[self.replacement_history.len() - 1]
  }

  /// Refresh the expiry of the unit already on board. Recorded as a
  /// replacement whose previous and new numbers are the same.
  pub fn refresh(&mut self, refresh: ExpiryRefresh, today: NaiveDate) -> &ReplacementEntry {
    let replacement = Replacement {
      new_extinguisher_number: self.extinguisher_number.clone(),
      new_expiry_date:         refresh.new_expiry_date,
      notes:                   refresh.notes,
    };
    self.replace(replacement, today)
  }
}

impl Record for ExtinguisherRecord {
  type Key = u64;

  const ENTITY: &'static str = "extinguisher";

  fn key(&self) -> &u64 { &self.id }

  fn expiry_date(&self) -> NaiveDate { self.expiry_date }

  fn inherit_history(&mut self, previous: Self) {
    self.replacement_history = previous.replacement_history;
  }
}

/// Next surrogate id: one past the largest in use, or 1 for an empty fleet.
///
/// Ids freed by deleting the newest record are handed out again.
pub fn next_id(records: &[ExtinguisherRecord]) -> u64 {
  records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
}

/// First extinguisher carried by `vehicle_number`.
pub fn find_by_vehicle<'a>(
  records: &'a [ExtinguisherRecord],
  vehicle_number: &str,
) -> Option<&'a ExtinguisherRecord> {
  records.iter().find(|r| r.vehicle_number == vehicle_number)
}

/// The editable fields of an extinguisher, as accepted by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtinguisherDraft {
  pub extinguisher_number: String,
  pub vehicle_number:      String,
  pub expiry_date:         NaiveDate,
}

impl ExtinguisherDraft {
  pub fn from_parts(
    extinguisher_number: Option<String>,
    vehicle_number: Option<String>,
    expiry_date: Option<NaiveDate>,
  ) -> Result<Self> {
    Ok(Self {
      extinguisher_number: required_text("extinguisherNumber", extinguisher_number)?,
      vehicle_number:      required_text("vehicleNumber", vehicle_number)?,
      expiry_date:         required("expiryDate", expiry_date)?,
    })
  }
}

/// Input to a replacement by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
  pub new_extinguisher_number: String,
  pub new_expiry_date:         NaiveDate,
  pub notes:                   Option<String>,
}

impl Replacement {
  pub fn from_parts(
    new_extinguisher_number: Option<String>,
    new_expiry_date: Option<NaiveDate>,
    notes: Option<String>,
  ) -> Result<Self> {
    Ok(Self {
      new_extinguisher_number: required_text(
        "newExtinguisherNumber",
        new_extinguisher_number,
      )?,
      new_expiry_date: required("newExpiryDate", new_expiry_date)?,
      notes,
    })
  }
}

/// Input to a replacement by vehicle number, where only the expiry changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryRefresh {
  pub new_expiry_date: NaiveDate,
  pub notes:           Option<String>,
}

impl ExpiryRefresh {
  pub fn from_parts(
    new_expiry_date: Option<NaiveDate>,
    notes: Option<String>,
  ) -> Result<Self> {
    Ok(Self { new_expiry_date: required("newExpiryDate", new_expiry_date)?, notes })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn unit(id: u64, number: &str, vehicle: &str) -> ExtinguisherRecord {
    ExtinguisherRecord::from_draft(id, ExtinguisherDraft {
      extinguisher_number: number.into(),
      vehicle_number:      vehicle.into(),
      expiry_date:         d("2024-03-01"),
    })
  }

  #[test]
  fn next_id_is_one_past_the_max() {
    assert_eq!(next_id(&[]), 1);
    assert_eq!(next_id(&[unit(3, "A", "1"), unit(7, "B", "2"), unit(5, "C", "3")]), 8);
  }

  #[test]
  fn replace_swaps_number_and_expiry() {
    let mut u = unit(1, "MF-100", "12");
    let entry = u
      .replace(
        Replacement {
          new_extinguisher_number: "MF-200".into(),
          new_expiry_date:         d("2025-03-01"),
          notes:                   Some("dented".into()),
        },
        d("2024-02-20"),
      )
      .clone();

    assert_eq!(u.extinguisher_number, "MF-200");
    assert_eq!(u.expiry_date, d("2025-03-01"));
    assert_eq!(entry, ReplacementEntry {
      replacement_date:             d("2024-02-20"),
      previous_extinguisher_number: "MF-100".into(),
      new_extinguisher_number:      "MF-200".into(),
      previous_expiry_date:         d("2024-03-01"),
      new_expiry_date:              d("2025-03-01"),
      notes:                        "dented".into(),
    });
  }

  #[test]
  fn refresh_keeps_the_same_number_on_both_sides() {
    let mut u = unit(1, "MF-100", "12");
    let entry = u
      .refresh(
        ExpiryRefresh { new_expiry_date: d("2025-03-01"), notes: None },
        d("2024-02-20"),
      )
      .clone();

    assert_eq!(entry.previous_extinguisher_number, entry.new_extinguisher_number);
    assert_eq!(entry.new_extinguisher_number, "MF-100");
    assert_eq!(entry.notes, "");
    assert_eq!(u.extinguisher_number, "MF-100");
    assert_eq!(u.expiry_date, d("2025-03-01"));
  }

  #[test]
  fn find_by_vehicle_returns_first_match() {
    let records = [unit(1, "A", "12"), unit(2, "B", "12"), unit(3, "C", "14")];
    assert_eq!(find_by_vehicle(&records, "12").map(|r| r.id), Some(1));
    assert!(find_by_vehicle(&records, "99").is_none());
  }

  #[test]
  fn replacement_requires_number_and_date() {
    assert!(matches!(
      Replacement::from_parts(None, Some(d("2025-01-01")), None),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      Replacement::from_parts(Some("X".into()), None, None),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn reads_legacy_field_names() {
    let u: ExtinguisherRecord = serde_json::from_str(
      r#"{"id":4,"numeroMatafuego":"MF-9","numeroCoche":"31","fechaVencimiento":"2024-08-01"}"#,
    )
    .unwrap();
    assert_eq!(u.vehicle_number, "31");
    assert!(u.replacement_history.is_empty());
  }
}
