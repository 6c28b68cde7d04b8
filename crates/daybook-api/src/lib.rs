//! JSON REST API for Daybook.
//!
//! Exposes an axum [`Router`] backed by any
//! [`daybook_core::store::PresenceStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", daybook_api::api_router(store.clone(), settings))
//! ```

pub mod days;
pub mod error;
pub mod etag;
pub mod extract;
pub mod stats;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use chrono::{Datelike, NaiveDate, Utc};
use daybook_core::{
  country::{CountryCode, CountryEntry, catalog},
  store::PresenceStore,
};

pub use error::ApiError;

/// Per-deployment knobs the handlers need.
#[derive(Debug, Clone, Default)]
pub struct ApiSettings {
  /// Residence country used by `/stats` when the request names none.
  pub residence_country: Option<CountryCode>,
}

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub settings: Arc<ApiSettings>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), settings: Arc::clone(&self.settings) }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, settings: ApiSettings) -> Router<()>
where
  S: PresenceStore + 'static,
{
  let state = ApiState { store, settings: Arc::new(settings) };

  Router::new()
    .route("/countries", get(countries))
    // Days
    .route("/days", get(days::list::<S>).post(days::create::<S>))
    .route("/days/bulk", post(days::create_bulk::<S>))
    .route("/days/today", post(days::log_today::<S>))
    .route(
      "/days/{date}",
      get(days::get_one::<S>)
        .put(days::update::<S>)
        .delete(days::delete::<S>),
    )
    // Stats
    .route("/stats", get(stats::handler::<S>))
    .with_state(state)
}

/// `GET /countries`: the picker catalog, sorted by name.
async fn countries() -> Json<Vec<CountryEntry>> { Json(catalog()) }

pub(crate) fn current_year() -> i32 { Utc::now().year() }

pub(crate) fn today() -> NaiveDate { Utc::now().date_naive() }
