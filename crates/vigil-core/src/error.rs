//! Error types for `vigil-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No record matched the given key, id, or vehicle number.
  #[error("{entity} not found: {key}")]
  NotFound { entity: &'static str, key: String },

  /// A create or rename would leave two records sharing a key.
  #[error("{entity} already exists: {key}")]
  DuplicateKey { entity: &'static str, key: String },

  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The backing store could not be read or written. A store that does not
  /// exist yet is an empty collection, never this error.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
    Self::NotFound { entity, key: key.to_string() }
  }

  pub fn duplicate(entity: &'static str, key: impl ToString) -> Self {
    Self::DuplicateKey { entity, key: key.to_string() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unwrap a required input field, rejecting `None`.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T> {
  value.ok_or_else(|| Error::InvalidInput(format!("`{field}` is required")))
}

/// Like [`required`], but also rejects blank strings.
pub fn required_text(field: &str, value: Option<String>) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(Error::InvalidInput(format!("`{field}` is required"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn required_text_rejects_missing_and_blank() {
    assert!(matches!(
      required_text("name", None),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      required_text("name", Some("   ".into())),
      Err(Error::InvalidInput(_))
    ));
    assert_eq!(required_text("name", Some("Ana".into())).unwrap(), "Ana");
  }

  #[test]
  fn error_messages_name_entity_and_key() {
    let e = Error::not_found("license", "L-42");
    assert_eq!(e.to_string(), "license not found: L-42");
    let e = Error::duplicate("license", "L-42");
    assert_eq!(e.to_string(), "license already exists: L-42");
  }
}
