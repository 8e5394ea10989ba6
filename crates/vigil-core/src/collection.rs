//! Key-based operations over a whole in-memory collection.
//!
//! A backend loads the full collection, applies one of these functions, and
//! writes the collection back only if the function succeeded. Every function
//! leaves the vector untouched when it returns an error.

use std::fmt::Display;

use chrono::NaiveDate;

use crate::{Error, Result};

/// A persisted record with a unique key and an append-only history.
pub trait Record {
  type Key: PartialEq + Display;

  /// Entity name used in error messages.
  const ENTITY: &'static str;

  fn key(&self) -> &Self::Key;

  fn expiry_date(&self) -> NaiveDate;

  /// Take over the history of the record this one is replacing.
  fn inherit_history(&mut self, previous: Self);
}

pub fn find_by_key<'a, R: Record>(records: &'a [R], key: &R::Key) -> Option<&'a R> {
  records.iter().find(|r| r.key() == key)
}

pub fn position<R: Record>(records: &[R], key: &R::Key) -> Result<usize> {
  records
    .iter()
    .position(|r| r.key() == key)
    .ok_or_else(|| Error::not_found(R::ENTITY, key))
}

/// Append `record`, rejecting a key that is already present.
pub fn insert<R: Record>(records: &mut Vec<R>, record: R) -> Result<&R> {
  if find_by_key(records, record.key()).is_some() {
    return Err(Error::duplicate(R::ENTITY, record.key()));
  }
  records.push(record);
  Ok(&records[records.len() - 1])
}

/// Replace the record stored under `key` with `record`, carrying the old
/// history forward. `record` may carry a different key (a rename) as long as
/// no other record already uses it.
pub fn replace<'a, R: Record>(
  records: &'a mut [R],
  key: &R::Key,
  record: R,
) -> Result<&'a R> {
  let index = position(records, key)?;
  if record.key() != key
    && records
      .iter()
      .enumerate()
      .any(|(i, r)| i != index && r.key() == record.key())
  {
    return Err(Error::duplicate(R::ENTITY, record.key()));
  }
  let previous = std::mem::replace(&mut records[index], record);
  records[index].inherit_history(previous);
  Ok(&records[index])
}

/// Remove and return the record stored under `key`.
pub fn delete_by_key<R: Record>(records: &mut Vec<R>, key: &R::Key) -> Result<R> {
  let index = position(records, key)?;
  Ok(records.remove(index))
}
