//! Async HTTP client wrapping the daybook JSON API.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use daybook_core::{
  autolog::LogOutcome,
  country::{CountryCode, CountryEntry},
  presence::{DayPresence, PresenceStatus},
  stats::ResidenceStats,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Connection settings for the daybook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Response of `POST /days/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkAdded {
  pub added: u32,
  pub days:  Vec<DayPresence>,
}

/// Why a request produced no usable response.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  /// The request never got an HTTP answer: connect, TLS or timeout.
  #[error("{what} failed")]
  Transport {
    what:   String,
    #[source]
    source: reqwest::Error,
  },
  /// The server answered with a non-success status.
  #[error("{what} → {status}: {message}")]
  Status {
    what:    String,
    status:  StatusCode,
    message: String,
  },
}

impl ClientError {
  /// True when the server could not be reached or failed on its side. A 4xx
  /// is the request's fault and is never papered over with cached data.
  pub fn is_unavailable(&self) -> bool {
    match self {
      Self::Transport { .. } => true,
      Self::Status { status, .. } => status.is_server_error(),
    }
  }
}

/// Whether `err` came from an API call that may be answered from the
/// snapshot cache instead.
pub fn is_unavailable(err: &anyhow::Error) -> bool {
  err
    .downcast_ref::<ClientError>()
    .is_some_and(ClientError::is_unavailable)
}

/// Async HTTP client for the daybook JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req`, turning non-success statuses into errors that carry the
  /// server's `{"error": ...}` message when there is one.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, ClientError> {
    let resp = req
      .send()
      .await
      .map_err(|source| ClientError::Transport { what: what.to_owned(), source })?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
      error: String,
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());
    Err(ClientError::Status { what: what.to_owned(), status, message })
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  /// `GET /api/countries`
  pub async fn countries(&self) -> Result<Vec<CountryEntry>> {
    let resp = self
      .send(self.client.get(self.url("/countries")), "GET /countries")
      .await?;
    resp.json().await.context("deserialising countries")
  }

  // ── Days ──────────────────────────────────────────────────────────────────

  /// `GET /api/days?year=<y>[&month=<m>]`
  pub async fn list_days(&self, year: i32, month: Option<u32>) -> Result<Vec<DayPresence>> {
    let mut query = vec![("year", year.to_string())];
    if let Some(m) = month {
      query.push(("month", m.to_string()));
    }
    let resp = self
      .send(self.client.get(self.url("/days")).query(&query), "GET /days")
      .await?;
    resp.json().await.context("deserialising days")
  }

  /// `POST /api/days`
  pub async fn add_day(
    &self,
    date: NaiveDate,
    country: &CountryCode,
    status: PresenceStatus,
    notes: Option<&str>,
  ) -> Result<DayPresence> {
    let body = json!({ "date": date, "country": country, "status": status, "notes": notes });
    let resp = self
      .send(self.client.post(self.url("/days")).json(&body), "POST /days")
      .await?;
    resp.json().await.context("deserialising day")
  }

  /// `POST /api/days/bulk`
  pub async fn add_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
    country: &CountryCode,
    notes: Option<&str>,
  ) -> Result<BulkAdded> {
    let body = json!({
      "start_date": start,
      "end_date": end,
      "country": country,
      "notes": notes,
    });
    let resp = self
      .send(self.client.post(self.url("/days/bulk")).json(&body), "POST /days/bulk")
      .await?;
    resp.json().await.context("deserialising bulk result")
  }

  /// `POST /api/days/today`
  pub async fn log_today(&self, date: NaiveDate, country: &CountryCode) -> Result<LogOutcome> {
    let body = json!({ "date": date, "country": country });
    let resp = self
      .send(self.client.post(self.url("/days/today")).json(&body), "POST /days/today")
      .await?;
    resp.json().await.context("deserialising log outcome")
  }

  /// `PUT /api/days/<date>`
  pub async fn update_day(
    &self,
    date: NaiveDate,
    country: Option<&CountryCode>,
    status: Option<PresenceStatus>,
    notes: Option<&str>,
  ) -> Result<DayPresence> {
    let body = json!({ "country": country, "status": status, "notes": notes });
    let path = format!("/days/{date}");
    let resp = self
      .send(self.client.put(self.url(&path)).json(&body), &format!("PUT {path}"))
      .await?;
    resp.json().await.context("deserialising day")
  }

  /// `DELETE /api/days/<date>`
  pub async fn delete_day(&self, date: NaiveDate) -> Result<()> {
    let path = format!("/days/{date}");
    self
      .send(self.client.delete(self.url(&path)), &format!("DELETE {path}"))
      .await?;
    Ok(())
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  /// `GET /api/stats?year=<y>[&residence=<cc>]`
  pub async fn stats(&self, year: i32, residence: Option<&CountryCode>) -> Result<ResidenceStats> {
    let mut query = vec![("year", year.to_string())];
    if let Some(r) = residence {
      query.push(("residence", r.to_string()));
    }
    let resp = self
      .send(self.client.get(self.url("/stats")).query(&query), "GET /stats")
      .await?;
    resp.json().await.context("deserialising stats")
  }
}
