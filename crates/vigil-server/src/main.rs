//! vigil server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus `VIGIL_*`
//! environment variables, opens the JSON store, and serves the API over HTTP.
//!
//! # Passphrase hash generation
//!
//! To generate the argon2 PHC string for `passphrase_hash` in config.toml:
//!
//! ```text
//! cargo run -p vigil-server -- --hash-passphrase
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::PasswordHash;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vigil_core::clock::SystemClock;
use vigil_server::{AppState, ServerConfig, auth::AuthConfig, hash_passphrase};
use vigil_store_json::JsonStore;

#[derive(Parser)]
#[command(author, version, about = "Vigil fleet expiry tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a passphrase entered on stdin and exit.
  #[arg(long)]
  hash_passphrase: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a passphrase and exit.
  if cli.hash_passphrase {
    let passphrase = read_passphrase()?;
    let hash = hash_passphrase(&passphrase)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", ServerConfig::DEFAULT_HOST)?
    .set_default("port", i64::from(ServerConfig::DEFAULT_PORT))?
    .set_default("data_dir", ServerConfig::DEFAULT_DATA_DIR)?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("VIGIL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if let Some(hash) = &server_cfg.passphrase_hash {
    PasswordHash::new(hash)
      .map_err(|e| anyhow::anyhow!("passphrase_hash is not a valid PHC string: {e}"))?;
  } else {
    tracing::warn!("no passphrase_hash configured; the API is open to anyone");
  }

  // Expand `~` in the data directory.
  let data_dir = expand_tilde(&server_cfg.data_dir);
  tracing::info!(data_dir = %data_dir.display(), "using JSON store");
  let store = JsonStore::open(data_dir);

  // Build application state.
  let state = AppState {
    store: Arc::new(store),
    clock: Arc::new(SystemClock),
    auth:  Arc::new(AuthConfig {
      passphrase_hash: server_cfg.passphrase_hash.clone(),
    }),
  };

  let app = vigil_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a passphrase from stdin.
fn read_passphrase() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Passphrase: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_tilde_only_touches_home_prefix() {
    assert_eq!(expand_tilde(Path::new("/srv/vigil")), PathBuf::from("/srv/vigil"));
    assert_eq!(expand_tilde(Path::new("data/~/x")), PathBuf::from("data/~/x"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/vigil")), PathBuf::from(home).join("vigil"));
    }
  }
}
