//! Expiry status: the urgency tier derived from an expiry date.
//!
//! Status is never stored. It is recomputed against a caller-supplied
//! reference date every time a record is read, so the same record moves
//! through the tiers as days pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Last day-count (inclusive) classified as [`Status::Urgent`].
pub const URGENT_WITHIN_DAYS: i64 = 7;
/// Last day-count (inclusive) classified as [`Status::Near`].
pub const NEAR_WITHIN_DAYS: i64 = 15;
/// Upper bound (inclusive) of the dashboard lookahead window.
pub const LOOKAHEAD_DAYS: i64 = 30;

/// The four urgency tiers.
///
/// Serialised with the labels the fleet office uses on its boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
  /// More than [`NEAR_WITHIN_DAYS`] days left.
  #[serde(rename = "OK")]
  Ok,
  /// Between `URGENT_WITHIN_DAYS + 1` and [`NEAR_WITHIN_DAYS`] days left.
  #[serde(rename = "PRÓXIMO")]
  Near,
  /// Between zero and [`URGENT_WITHIN_DAYS`] days left.
  #[serde(rename = "URGENTE")]
  Urgent,
  /// The expiry date is strictly before the reference date.
  #[serde(rename = "VENCIDO")]
  Expired,
}

impl Status {
  /// Map a signed day count onto its tier.
  pub fn from_days_remaining(days: i64) -> Self {
    if days < 0 {
      Self::Expired
    } else if days <= URGENT_WITHIN_DAYS {
      Self::Urgent
    } else if days <= NEAR_WITHIN_DAYS {
      Self::Near
    } else {
      Self::Ok
    }
  }

  /// `true` for the two "coming up" tiers counted on the dashboard.
  pub fn is_near(self) -> bool { matches!(self, Self::Urgent | Self::Near) }

  pub fn label(self) -> &'static str {
    match self {
      Self::Ok => "OK",
      Self::Near => "PRÓXIMO",
      Self::Urgent => "URGENTE",
      Self::Expired => "VENCIDO",
    }
  }
}

impl std::fmt::Display for Status {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Whole calendar days from `today` until `expiry`; negative once expired.
pub fn days_remaining(expiry: NaiveDate, today: NaiveDate) -> i64 {
  expiry.signed_duration_since(today).num_days()
}

/// Classify `expiry` relative to `today`.
pub fn classify(expiry: NaiveDate, today: NaiveDate) -> Status {
  Status::from_days_remaining(days_remaining(expiry, today))
}

/// `true` when `expiry` falls in `today ..= today + LOOKAHEAD_DAYS`.
///
/// This window is independent of the tiers above; an expired item is never
/// inside it.
pub fn within_lookahead(expiry: NaiveDate, today: NaiveDate) -> bool {
  (0..=LOOKAHEAD_DAYS).contains(&days_remaining(expiry, today))
}
