//! Personnel licenses and their renewal history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  collection::Record,
  error::{required, required_text},
};

/// One renewal of a license. Entries are appended, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalEntry {
  #[serde(alias = "fechaRenovacion")]
  pub renewal_date:         NaiveDate,
  #[serde(alias = "fechaVencimientoAnterior")]
  pub previous_expiry_date: NaiveDate,
  #[serde(alias = "fechaVencimientoNueva")]
  pub new_expiry_date:      NaiveDate,
  #[serde(default, alias = "observaciones")]
  pub notes:                String,
}

/// A driver's license, keyed by `legajo` (personnel file number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
  pub legajo:          String,
  #[serde(alias = "nombre")]
  pub name:            String,
  #[serde(alias = "apellido")]
  pub surname:         String,
  #[serde(alias = "dni")]
  pub national_id:     String,
  #[serde(alias = "fechaVencimiento")]
  pub expiry_date:     NaiveDate,
  #[serde(default, alias = "historialRenovaciones")]
  pub renewal_history: Vec<RenewalEntry>,
}

impl LicenseRecord {
  /// A fresh record with an empty history.
  pub fn from_draft(draft: LicenseDraft) -> Self {
    Self {
      legajo:          draft.legajo,
      name:            draft.name,
      surname:         draft.surname,
      national_id:     draft.national_id,
      expiry_date:     draft.expiry_date,
      renewal_history: Vec::new(),
    }
  }

  /// Record a renewal dated `today` and move the expiry forward (or back;
  /// the new date is taken as given).
  pub fn renew(&mut self, renewal: Renewal, today: NaiveDate) -> &RenewalEntry {
    self.renewal_history.push(RenewalEntry {
      renewal_date:         today,
      previous_expiry_date: self.expiry_date,
      new_expiry_date:      renewal.new_expiry_date,
      notes:                renewal.notes.unwrap_or_default(),
    });
    self.expiry_date = renewal.new_expiry_date;
    // Just pushed.
    &self.renewal_history[self.renewal_history.len() - 1]
  }
}

impl Record for LicenseRecord {
  type Key = String;

  const ENTITY: &'static str = "license";

  fn key(&self) -> &String { &self.legajo }

  fn expiry_date(&self) -> NaiveDate { self.expiry_date }

  fn inherit_history(&mut self, previous: Self) {
    self.renewal_history = previous.renewal_history;
  }
}

/// The editable fields of a license, as accepted by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseDraft {
  pub legajo:      String,
  pub name:        String,
  pub surname:     String,
  pub national_id: String,
  pub expiry_date: NaiveDate,
}

impl LicenseDraft {
  /// Build a draft from optional inputs, failing with
  /// [`Error::InvalidInput`](crate::Error::InvalidInput) on the first missing
  /// or blank field.
  pub fn from_parts(
    legajo: Option<String>,
    name: Option<String>,
    surname: Option<String>,
    national_id: Option<String>,
    expiry_date: Option<NaiveDate>,
  ) -> Result<Self> {
    Ok(Self {
      legajo:      required_text("legajo", legajo)?,
      name:        required_text("name", name)?,
      surname:     required_text("surname", surname)?,
      national_id: required_text("nationalId", national_id)?,
      expiry_date: required("expiryDate", expiry_date)?,
    })
  }
}

/// Input to a license renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renewal {
  pub new_expiry_date: NaiveDate,
  pub notes:           Option<String>,
}

impl Renewal {
  pub fn from_parts(
    new_expiry_date: Option<NaiveDate>,
    notes: Option<String>,
  ) -> Result<Self> {
    Ok(Self {
      new_expiry_date: required("newExpiryDate", new_expiry_date)?,
      notes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn license() -> LicenseRecord {
    LicenseRecord::from_draft(LicenseDraft {
      legajo:      "1001".into(),
      name:        "Ana".into(),
      surname:     "Gómez".into(),
      national_id: "30111222".into(),
      expiry_date: d("2024-02-01"),
    })
  }

  #[test]
  fn renew_appends_one_entry_and_moves_expiry() {
    let mut l = license();
    l.renew(
      Renewal { new_expiry_date: d("2025-02-01"), notes: None },
      d("2024-01-20"),
    );
    let entry = l
      .renew(
        Renewal {
          new_expiry_date: d("2026-02-01"),
          notes:           Some("second".into()),
        },
        d("2025-01-15"),
      )
      .clone();

    assert_eq!(l.expiry_date, d("2026-02-01"));
    assert_eq!(l.renewal_history.len(), 2);
    assert_eq!(l.renewal_history[0], RenewalEntry {
      renewal_date:         d("2024-01-20"),
      previous_expiry_date: d("2024-02-01"),
      new_expiry_date:      d("2025-02-01"),
      notes:                String::new(),
    });
    assert_eq!(entry.previous_expiry_date, d("2025-02-01"));
    assert_eq!(entry.new_expiry_date, d("2026-02-01"));
    assert_eq!(entry.notes, "second");
  }

  #[test]
  fn renewal_requires_new_expiry() {
    assert!(matches!(
      Renewal::from_parts(None, Some("x".into())),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn draft_rejects_missing_field() {
    let err = LicenseDraft::from_parts(
      Some("1001".into()),
      Some("Ana".into()),
      None,
      Some("30111222".into()),
      Some(d("2024-02-01")),
    )
    .unwrap_err();
    assert!(err.to_string().contains("surname"), "{err}");
  }

  #[test]
  fn serialises_camel_case_and_reads_legacy_names() {
    let json = serde_json::to_value(license()).unwrap();
    assert_eq!(json["nationalId"], "30111222");
    assert_eq!(json["expiryDate"], "2024-02-01");
    assert!(json["renewalHistory"].as_array().unwrap().is_empty());

    let legacy = r#"{
      "legajo": "7",
      "nombre": "Luis",
      "apellido": "Paz",
      "dni": "20999888",
      "fechaVencimiento": "2024-05-05",
      "historialRenovaciones": [{
        "fechaRenovacion": "2023-05-01",
        "fechaVencimientoAnterior": "2023-05-05",
        "fechaVencimientoNueva": "2024-05-05",
        "observaciones": "ok"
      }],
      "estado": "OK"
    }"#;
    let l: LicenseRecord = serde_json::from_str(legacy).unwrap();
    assert_eq!(l.surname, "Paz");
    assert_eq!(l.renewal_history[0].previous_expiry_date, d("2023-05-05"));
  }

  #[test]
  fn missing_history_reads_as_empty() {
    let l: LicenseRecord = serde_json::from_str(
      r#"{"legajo":"1","name":"a","surname":"b","nationalId":"c","expiryDate":"2024-01-01"}"#,
    )
    .unwrap();
    assert!(l.renewal_history.is_empty());
  }
}
