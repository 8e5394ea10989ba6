//! Records bundled with their status as of a reference date.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  collection::Record,
  status::{Status, classify},
};

/// The read model returned to callers: the stored record with its computed
/// [`Status`] flattened alongside. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved<R> {
  #[serde(flatten)]
  pub record: R,
  pub status: Status,
}

impl<R: Record> Resolved<R> {
  pub fn new(record: R, today: NaiveDate) -> Self {
    let status = classify(record.expiry_date(), today);
    Self { record, status }
  }

  pub fn all(records: Vec<R>, today: NaiveDate) -> Vec<Self> {
    records.into_iter().map(|r| Self::new(r, today)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::extinguisher::{ExtinguisherDraft, ExtinguisherRecord};

  #[test]
  fn status_is_flattened_next_to_record_fields() {
    let today: NaiveDate = "2024-01-10".parse().unwrap();
    let unit = ExtinguisherRecord::from_draft(3, ExtinguisherDraft {
      extinguisher_number: "MF-3".into(),
      vehicle_number:      "40".into(),
      expiry_date:         "2024-01-09".parse().unwrap(),
    });

    let json = serde_json::to_value(Resolved::new(unit, today)).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["vehicleNumber"], "40");
    assert_eq!(json["status"], "VENCIDO");
  }
}
