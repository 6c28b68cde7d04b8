//! HTTP server composition for Daybook.
//!
//! Mounts the JSON API from `daybook-api` under `/api` over any
//! [`PresenceStore`] and adds request tracing.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use daybook_api::{ApiSettings, api_router};
use daybook_core::{country::CountryCode, store::PresenceStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DAYBOOK_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  /// ISO 3166-1 alpha-2 code of the user's tax home, if designated.
  #[serde(default)]
  pub residence_country: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5233 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/daybook/daybook.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              default_host(),
      port:              default_port(),
      store_path:        default_store_path(),
      residence_country: None,
    }
  }
}

impl ServerConfig {
  /// Validate the parts of the configuration the API consumes.
  pub fn api_settings(&self) -> daybook_core::Result<ApiSettings> {
    let residence_country = self
      .residence_country
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .map(CountryCode::parse)
      .transpose()?;
    Ok(ApiSettings { residence_country })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(store: Arc<S>, settings: ApiSettings) -> Router
where
  S: PresenceStore + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api_router(store, settings))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
