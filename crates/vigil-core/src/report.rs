//! Dashboard aggregation.
//!
//! Counts are derived from the four-tier [`Status`]; the lookahead list uses
//! the separate `0..=30` day window from [`within_lookahead`], so an item 20
//! days out is `OK` yet still listed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  collection::Record,
  extinguisher::ExtinguisherRecord,
  license::LicenseRecord,
  status::{Status, classify, within_lookahead},
};

/// Summary of one collection as of a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary<P> {
  pub total:         usize,
  /// Records classified [`Status::Expired`].
  pub expired_count: usize,
  /// Records classified [`Status::Urgent`] or [`Status::Near`].
  pub near_count:    usize,
  /// Records due within the lookahead window, soonest first.
  #[serde(rename = "within30Days")]
  pub within_30_days: Vec<P>,
}

/// Summarise `records`, projecting each lookahead entry through `project`.
pub fn summarize<R, P>(
  records: &[R],
  today: NaiveDate,
  project: impl Fn(&R) -> P,
) -> Summary<P>
where
  R: Record,
{
  let mut expired_count = 0;
  let mut near_count = 0;
  for record in records {
    match classify(record.expiry_date(), today) {
      Status::Expired => expired_count += 1,
      s if s.is_near() => near_count += 1,
      _ => {}
    }
  }

  let mut due: Vec<&R> = records
    .iter()
    .filter(|r| within_lookahead(r.expiry_date(), today))
    .collect();
  due.sort_by_key(|r| r.expiry_date());

  Summary {
    total: records.len(),
    expired_count,
    near_count,
    within_30_days: due.into_iter().map(project).collect(),
  }
}

/// Lookahead entry for a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDue {
  pub legajo:      String,
  pub expiry_date: NaiveDate,
}

/// Lookahead entry for an extinguisher, identified by the vehicle carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtinguisherDue {
  pub vehicle_number: String,
  pub expiry_date:    NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
  pub licenses:      Summary<LicenseDue>,
  pub extinguishers: Summary<ExtinguisherDue>,
}

/// Build the dashboard for both collections.
pub fn dashboard(
  licenses: &[LicenseRecord],
  extinguishers: &[ExtinguisherRecord],
  today: NaiveDate,
) -> Dashboard {
  Dashboard {
    licenses:      summarize(licenses, today, |l| LicenseDue {
      legajo:      l.legajo.clone(),
      expiry_date: l.expiry_date,
    }),
    extinguishers: summarize(extinguishers, today, |e| ExtinguisherDue {
      vehicle_number: e.vehicle_number.clone(),
      expiry_date:    e.expiry_date,
    }),
  }
}
