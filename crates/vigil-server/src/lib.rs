//! HTTP server for Vigil.
//!
//! Wraps the [`vigil_api`] router with the shared-passphrase gate and request
//! tracing, and owns the runtime configuration.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{Router, middleware, routing::post};
use rand_core::OsRng;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vigil_api::ApiState;
use vigil_core::{clock::Clock, store::FleetStore};

use auth::{AuthConfig, login, require_passphrase};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VIGIL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Directory holding `licenses.json` and `extinguishers.json`.
  pub data_dir:        PathBuf,
  /// Argon2 PHC string of the shared passphrase; unset disables the gate.
  #[serde(default)]
  pub passphrase_hash: Option<String>,
}

impl ServerConfig {
  pub const DEFAULT_HOST: &'static str = "0.0.0.0";
  pub const DEFAULT_PORT: u16 = 3000;
  pub const DEFAULT_DATA_DIR: &'static str = "data";
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the server needs to build its router.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub clock:  Arc<dyn Clock>,
  pub auth:   Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      clock:  Arc::clone(&self.clock),
      auth:   Arc::clone(&self.auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the API under `/api`, gated by the
/// passphrase except for `/api/login`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: FleetStore + 'static,
{
  let gated = vigil_api::api_router(ApiState::new(
    Arc::clone(&state.store),
    Arc::clone(&state.clock),
  ))
  .layer(middleware::from_fn_with_state(
    Arc::clone(&state.auth),
    require_passphrase,
  ));

  let open = Router::new()
    .route("/login", post(login))
    .with_state(Arc::clone(&state.auth));

  Router::new()
    .nest("/api", gated.merge(open))
    .layer(TraceLayer::new_for_http())
}

/// Hash `passphrase` into an argon2 PHC string for `passphrase_hash`.
pub fn hash_passphrase(passphrase: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(passphrase.as_bytes(), &salt)?
      .to_string(),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use tempfile::TempDir;
  use tower::ServiceExt as _;
  use vigil_core::clock::FixedClock;
  use vigil_store_json::JsonStore;

  fn make_state(passphrase: Option<&str>) -> (TempDir, AppState<JsonStore>) {
    let dir = tempfile::tempdir().unwrap();
    let passphrase_hash = passphrase.map(|p| hash_passphrase(p).unwrap());

    let state = AppState {
      store: Arc::new(JsonStore::open(dir.path())),
      clock: Arc::new(FixedClock("2024-01-10".parse().unwrap())),
      auth:  Arc::new(AuthConfig { passphrase_hash }),
    };
    (dir, state)
  }

  fn auth_header(pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("fleet:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<JsonStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, String)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json");
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  #[tokio::test]
  async fn api_without_credentials_returns_401() {
    let (_dir, state) = make_state(Some("administrador"));
    let resp = oneshot_raw(state, "GET", "/api/licenses", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn api_with_wrong_passphrase_returns_401() {
    let (_dir, state) = make_state(Some("administrador"));
    let resp = oneshot_raw(
      state,
      "GET",
      "/api/dashboard",
      vec![(header::AUTHORIZATION, auth_header("guess"))],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn api_with_passphrase_reaches_handlers() {
    let (_dir, state) = make_state(Some("administrador"));
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/licenses",
      vec![(header::AUTHORIZATION, auth_header("administrador"))],
      r#"{"legajo":"1","name":"a","surname":"b","nationalId":"c","expiryDate":"2024-01-12"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot_raw(
      state,
      "GET",
      "/api/licenses/1",
      vec![(header::AUTHORIZATION, auth_header("administrador"))],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "URGENTE");
  }

  #[tokio::test]
  async fn login_checks_passphrase_without_basic_auth() {
    let (_dir, state) = make_state(Some("administrador"));
    let ok = oneshot_raw(
      state.clone(),
      "POST",
      "/api/login",
      vec![],
      r#"{"passphrase":"administrador"}"#,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    let bad = oneshot_raw(
      state.clone(),
      "POST",
      "/api/login",
      vec![],
      r#"{"passphrase":"nope"}"#,
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let empty = oneshot_raw(state, "POST", "/api/login", vec![], r#"{}"#).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn disabled_gate_serves_api_openly() {
    let (_dir, state) = make_state(None);
    let resp = oneshot_raw(state, "GET", "/api/extinguishers", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
