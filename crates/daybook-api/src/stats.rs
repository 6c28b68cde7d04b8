//! Handler for `GET /stats`.
//!
//! Stats are recomputed from the year's records on every request; nothing
//! derived is stored.

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
  response::Response,
};
use daybook_core::{
  country::CountryCode,
  ledger::Ledger,
  store::{DayQuery, PresenceStore},
};
use serde::Deserialize;

use crate::{
  ApiState, current_year, days::conditional, error::ApiError, etag, extract::ApiQuery,
};

#[derive(Debug, Deserialize, Default)]
pub struct StatsParams {
  pub year:      Option<i32>,
  /// Overrides the configured residence country for this request.
  pub residence: Option<CountryCode>,
}

/// `GET /stats[?year=2026][&residence=MC]`: a
/// [`ResidenceStats`](daybook_core::stats::ResidenceStats) summary.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<StatsParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PresenceStore,
{
  let year = params.year.unwrap_or_else(current_year);
  let residence = params
    .residence
    .or_else(|| state.settings.residence_country.clone());

  let days = state
    .store
    .list_days(DayQuery::year(year))
    .await
    .map_err(ApiError::store)?;

  let scope = format!(
    "stats:{year}:{}",
    residence.as_ref().map(CountryCode::as_str).unwrap_or_default()
  );
  let tag = etag::compute_etag(&scope, &days);
  if etag::is_fresh(&headers, &tag) {
    return Ok(conditional(&headers, &tag, ()));
  }

  let ledger: Ledger = days.into_iter().collect();
  let stats = ledger.stats(year, residence.as_ref());
  Ok(conditional(&headers, &tag, Json(stats)))
}
