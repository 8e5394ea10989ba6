//! Shared-passphrase gate.
//!
//! There are no user accounts. Everyone who knows the fleet office's
//! passphrase gets full access. API requests carry it as the password of an
//! HTTP Basic `Authorization` header; the username part is ignored.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{Request, State, rejection::JsonRejection},
  http::{HeaderMap, StatusCode},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Error;

/// The passphrase accepted by this server instance.
#[derive(Clone, Default)]
pub struct AuthConfig {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`. `None` turns
  /// the gate off.
  pub passphrase_hash: Option<String>,
}

impl AuthConfig {
  pub fn is_enabled(&self) -> bool { self.passphrase_hash.is_some() }
}

/// Check `passphrase` against the configured hash.
pub fn verify_passphrase(passphrase: &str, config: &AuthConfig) -> Result<(), Error> {
  let Some(hash) = &config.passphrase_hash else {
    return Ok(());
  };

  let parsed_hash = PasswordHash::new(hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(passphrase.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Verify the Basic credentials in `headers`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  if !config.is_enabled() {
    return Ok(());
  }

  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (_user, passphrase) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  verify_passphrase(passphrase, config)
}

/// Middleware rejecting requests that fail [`verify_auth`].
pub async fn require_passphrase(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Response {
  match verify_auth(req.headers(), &auth) {
    Ok(()) => next.run(req).await,
    Err(e) => {
      tracing::debug!(uri = %req.uri(), "rejected request without valid passphrase");
      e.into_response()
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub passphrase: Option<String>,
}

/// `POST /api/login`: body: `{"passphrase":"..."}`. 204 if it matches.
pub async fn login(
  State(auth): State<Arc<AuthConfig>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<StatusCode, Error> {
  let Json(body) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
  let passphrase = body
    .passphrase
    .filter(|p| !p.trim().is_empty())
    .ok_or_else(|| Error::BadRequest("`passphrase` is required".into()))?;

  verify_passphrase(passphrase.trim(), &auth)?;
  Ok(StatusCode::NO_CONTENT)
}
