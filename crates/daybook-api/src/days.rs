//! Handlers for `/days` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/days` | Optional `?year=` (default current) and `?month=`; carries an `ETag` |
//! | `POST`   | `/days` | Body: [`NewDayBody`]; returns 201 + stored day |
//! | `POST`   | `/days/bulk` | Body: [`BulkBody`]; at most 90 days, inclusive |
//! | `POST`   | `/days/today` | Body: [`TodayBody`]; returns a [`LogOutcome`] |
//! | `GET`    | `/days/{date}` | 404 if not found |
//! | `PUT`    | `/days/{date}` | Body: [`DayPatch`]; 404 if not found |
//! | `DELETE` | `/days/{date}` | 404 if not found |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use daybook_core::{
  autolog::{self, LogOutcome},
  country::CountryCode,
  presence::{DayPatch, DayPresence, NewDay, PresenceStatus},
  range::DayRange,
  store::{DayQuery, PresenceStore},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
  ApiState, current_year,
  error::ApiError,
  etag,
  extract::{ApiJson, ApiPath, ApiQuery},
  today,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub year:  Option<i32>,
  pub month: Option<u32>,
}

/// `GET /days[?year=2026][&month=2]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PresenceStore,
{
  if let Some(m) = params.month
    && !(1..=12).contains(&m)
  {
    return Err(ApiError::BadRequest(format!("month must be 1-12, got {m}")));
  }

  let query = DayQuery { year: params.year.unwrap_or_else(current_year), month: params.month };
  let days = state.store.list_days(query).await.map_err(ApiError::store)?;

  let scope = format!("days:{}:{}", query.year, query.month.unwrap_or(0));
  let tag = etag::compute_etag(&scope, &days);
  Ok(conditional(&headers, &tag, Json(days)))
}

/// `304` when the client already holds `tag`, otherwise `body` with the tag.
pub(crate) fn conditional(headers: &HeaderMap, tag: &str, body: impl IntoResponse) -> Response {
  let mut res = if etag::is_fresh(headers, tag) {
    StatusCode::NOT_MODIFIED.into_response()
  } else {
    body.into_response()
  };
  if let Some(v) = etag::header_value(tag) {
    res.headers_mut().insert(header::ETAG, v);
  }
  res
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /days/{date}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  ApiPath(date): ApiPath<NaiveDate>,
) -> Result<Json<DayPresence>, ApiError>
where
  S: PresenceStore,
{
  let day = state
    .store
    .get_day(date)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no day recorded for {date}")))?;
  Ok(Json(day))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /days`.
#[derive(Debug, Deserialize)]
pub struct NewDayBody {
  pub date:    NaiveDate,
  pub country: CountryCode,
  #[serde(default)]
  pub status:  PresenceStatus,
  pub notes:   Option<String>,
}

impl From<NewDayBody> for NewDay {
  fn from(b: NewDayBody) -> Self {
    NewDay { date: b.date, country: b.country, status: b.status, notes: None }.with_notes(b.notes)
  }
}

/// `POST /days`: returns 201 + the stored [`DayPresence`]. An existing
/// record for the same date is replaced.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewDayBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PresenceStore,
{
  let day = state
    .store
    .put_day(NewDay::from(body))
    .await
    .map_err(ApiError::store)?;
  tracing::info!(date = %day.date, country = %day.country, status = %day.status, "recorded day");
  Ok((StatusCode::CREATED, Json(day)))
}

// ─── Bulk ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /days/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkBody {
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  pub country:    CountryCode,
  pub notes:      Option<String>,
}

/// Response of `POST /days/bulk`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkResponse {
  pub added:      u32,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  pub days:       Vec<DayPresence>,
}

/// `POST /days/bulk`: one manual record per day of the inclusive range.
pub async fn create_bulk<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<BulkBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PresenceStore,
{
  let range = DayRange::new(body.start_date, body.end_date)?;
  let days = state
    .store
    .put_days(range.expand(&body.country, body.notes.as_deref()))
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    start = %range.start(),
    end = %range.end(),
    country = %body.country,
    added = days.len(),
    "recorded day range"
  );

  Ok((
    StatusCode::CREATED,
    Json(BulkResponse {
      added:      days.len() as u32,
      start_date: range.start(),
      end_date:   range.end(),
      days,
    }),
  ))
}

// ─── Log today ────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /days/today`.
#[derive(Debug, Deserialize)]
pub struct TodayBody {
  /// The device's calendar date; defaults to the server's UTC date.
  pub date:    Option<NaiveDate>,
  pub country: CountryCode,
}

/// `POST /days/today`: write a confirmed record unless the date already
/// has one. Never replaces a manual entry.
pub async fn log_today<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<TodayBody>,
) -> Result<Json<LogOutcome>, ApiError>
where
  S: PresenceStore,
{
  let date = body.date.unwrap_or_else(today);
  let outcome = autolog::log_today(state.store.as_ref(), date, body.country)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(outcome))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /days/{date}`: body: any of `country`, `status`, `notes`.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  ApiPath(date): ApiPath<NaiveDate>,
  ApiJson(patch): ApiJson<DayPatch>,
) -> Result<Json<DayPresence>, ApiError>
where
  S: PresenceStore,
{
  if patch.is_empty() {
    return Err(ApiError::BadRequest("nothing to update".into()));
  }

  let day = state
    .store
    .update_day(date, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no day recorded for {date}")))?;
  tracing::info!(%date, country = %day.country, "updated day");
  Ok(Json(day))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /days/{date}`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  ApiPath(date): ApiPath<NaiveDate>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PresenceStore,
{
  let deleted = state.store.delete_day(date).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("no day recorded for {date}")));
  }
  tracing::info!(%date, "deleted day");
  Ok(Json(json!({ "success": true })))
}
