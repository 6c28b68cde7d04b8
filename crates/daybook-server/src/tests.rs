//! HTTP tests for the full router against an in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
};
use daybook_api::ApiSettings;
use daybook_core::country::CountryCode;
use daybook_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

async fn make_app(residence: Option<&str>) -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let settings = ApiSettings {
    residence_country: residence.map(|c| CountryCode::parse(c).unwrap()),
  };
  router(Arc::new(store), settings)
}

async fn send(
  app:     &Router,
  method:  &str,
  uri:     &str,
  body:    Option<Value>,
  headers: Vec<(header::HeaderName, &str)>,
) -> (StatusCode, HeaderMap, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, headers, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
  let (status, _, body) = send(app, "GET", uri, None, vec![]).await;
  (status, body)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
  let (status, _, body) = send(app, "POST", uri, Some(body), vec![]).await;
  (status, body)
}

fn country<'a>(stats: &'a Value, code: &str) -> &'a Value {
  stats["countries"]
    .as_array()
    .unwrap()
    .iter()
    .find(|c| c["country"] == code)
    .unwrap_or_else(|| panic!("{code} missing from {stats}"))
}

// ── Health & catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn health_and_countries() {
  let app = make_app(None).await;
  let resp = app
    .clone()
    .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);

  let (status, countries) = get(&app, "/api/countries").await;
  assert_eq!(status, StatusCode::OK);
  let list = countries.as_array().unwrap();
  assert!(list.iter().any(|c| c["code"] == "MC" && c["name"] == "Monaco"));
}

// ── End-to-end ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn single_day_and_range_then_stats() {
  let app = make_app(None).await;

  let (status, day) = post(&app, "/api/days", json!({ "date": "2026-02-04", "country": "FR" })).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(day["country_name"], "France");
  assert_eq!(day["status"], "manual");

  let (status, bulk) = post(
    &app,
    "/api/days/bulk",
    json!({ "start_date": "2026-02-08", "end_date": "2026-02-16", "country": "NL" }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(bulk["added"], 9);
  assert_eq!(bulk["days"].as_array().unwrap().len(), 9);

  let (status, stats) = get(&app, "/api/stats?year=2026").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(country(&stats, "FR")["total_days"], 1);
  assert_eq!(country(&stats, "NL")["total_days"], 9);
  assert_eq!(country(&stats, "NL")["longest_streak"], 9);
  assert_eq!(stats["total_days_tracked"], 10);
  assert_eq!(stats["primary_country"]["country"], "NL");

  let (_, days) = get(&app, "/api/days?year=2026").await;
  assert_eq!(days.as_array().unwrap().len(), 10);
  let (_, feb) = get(&app, "/api/days?year=2026&month=2").await;
  assert_eq!(feb.as_array().unwrap().len(), 10);
  let (_, mar) = get(&app, "/api/days?year=2026&month=3").await;
  assert!(mar.as_array().unwrap().is_empty());
}

// ── Bulk validation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reversed_range_writes_nothing() {
  let app = make_app(None).await;
  let (status, body) = post(
    &app,
    "/api/days/bulk",
    json!({ "start_date": "2026-02-10", "end_date": "2026-02-09", "country": "NL" }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("before"));

  let (_, days) = get(&app, "/api/days?year=2026").await;
  assert!(days.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bulk_cap_is_ninety_days() {
  let app = make_app(None).await;

  let (status, _) = post(
    &app,
    "/api/days/bulk",
    json!({ "start_date": "2026-01-01", "end_date": "2026-04-01", "country": "AU" }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // 2026-01-01 ..= 2026-03-31 is exactly 90 days.
  let (status, body) = post(
    &app,
    "/api/days/bulk",
    json!({ "start_date": "2026-01-01", "end_date": "2026-03-31", "country": "AU" }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["added"], 90);
}

// ── Overwrite by date ────────────────────────────────────────────────────────

#[tokio::test]
async fn same_date_keeps_only_latest_country() {
  let app = make_app(None).await;
  post(&app, "/api/days", json!({ "date": "2026-04-12", "country": "FR" })).await;
  post(&app, "/api/days", json!({ "date": "2026-04-12", "country": "MC", "notes": "Monte-Carlo" })).await;

  let (_, days) = get(&app, "/api/days?year=2026").await;
  let days = days.as_array().unwrap();
  assert_eq!(days.len(), 1);
  assert_eq!(days[0]["country"], "MC");
  assert_eq!(days[0]["notes"], "Monte-Carlo");
}

#[tokio::test]
async fn invalid_country_is_rejected() {
  let app = make_app(None).await;
  let (status, body) =
    post(&app, "/api/days", json!({ "date": "2026-04-12", "country": "France" })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("invalid country code"), "{body}");

  let (_, days) = get(&app, "/api/days?year=2026").await;
  assert!(days.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_country_is_a_json_bad_request() {
  let app = make_app(None).await;
  let (status, body) = post(&app, "/api/days", json!({ "date": "2026-04-12" })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("country"), "{body}");

  let (status, body) = post(
    &app,
    "/api/days/bulk",
    json!({ "start_date": "2026-04-01", "end_date": "2026-04-03" }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn malformed_path_and_query_are_json_bad_requests() {
  let app = make_app(None).await;

  let (status, body) = get(&app, "/api/days/2026-13-01").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");

  let (status, body) = get(&app, "/api/days?year=soon").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");

  let (status, body) = get(&app, "/api/stats?residence=France").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");
}

// ── Log today ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn log_today_twice_yields_one_day() {
  let app = make_app(None).await;
  let body = json!({ "date": "2026-05-25", "country": "FR" });

  let (status, first) = post(&app, "/api/days/today", body.clone()).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(first["outcome"], "logged");
  assert_eq!(first["day"]["status"], "confirmed");

  let (_, second) = post(&app, "/api/days/today", body).await;
  assert_eq!(second["outcome"], "already_logged");

  let (_, days) = get(&app, "/api/days?year=2026").await;
  assert_eq!(days.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn log_today_keeps_manual_entry() {
  let app = make_app(None).await;
  post(&app, "/api/days", json!({ "date": "2026-05-25", "country": "ES" })).await;

  let (_, outcome) = post(&app, "/api/days/today", json!({ "date": "2026-05-25", "country": "FR" })).await;
  assert_eq!(outcome["outcome"], "manual_entry_kept");
  assert_eq!(outcome["day"]["country"], "ES");

  let (_, day) = get(&app, "/api/days/2026-05-25").await;
  assert_eq!(day["country"], "ES");
  assert_eq!(day["status"], "manual");
}

// ── Update & delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_then_delete() {
  let app = make_app(None).await;
  post(&app, "/api/days", json!({ "date": "2026-10-15", "country": "FR", "notes": "Paris" })).await;

  let (status, _, updated) = send(
    &app,
    "PUT",
    "/api/days/2026-10-15",
    Some(json!({ "country": "ES" })),
    vec![],
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["date"], "2026-10-15");
  assert_eq!(updated["country"], "ES");
  assert_eq!(updated["country_name"], "Spain");
  assert_eq!(updated["notes"], "Paris");

  let (status, _, body) = send(&app, "DELETE", "/api/days/2026-10-15", None, vec![]).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);

  let (status, _) = get(&app, "/api/days/2026-10-15").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _, _) = send(&app, "DELETE", "/api/days/2026-10-15", None, vec![]).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_missing_or_empty() {
  let app = make_app(None).await;
  let (status, _, _) = send(
    &app,
    "PUT",
    "/api/days/2026-10-15",
    Some(json!({ "notes": "x" })),
    vec![],
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  post(&app, "/api/days", json!({ "date": "2026-10-15", "country": "FR" })).await;
  let (status, _, _) = send(&app, "PUT", "/api/days/2026-10-15", Some(json!({})), vec![]).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Thresholds ───────────────────────────────────────────────────────────────

async fn add_days(app: &Router, country: &str, ranges: &[(&str, &str)]) {
  for (start, end) in ranges {
    let (status, _) = post(
      app,
      "/api/days/bulk",
      json!({ "start_date": start, "end_date": end, "country": country }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }
}

#[tokio::test]
async fn approaching_and_exceeded_thresholds() {
  let app = make_app(None).await;
  // 90 + 50 = 140 days in Spain.
  add_days(&app, "ES", &[("2026-01-01", "2026-03-31"), ("2026-04-01", "2026-05-20")]).await;
  // 90 + 90 + 10 = 190 days in the United Kingdom, in 2027.
  add_days(
    &app,
    "GB",
    &[("2027-01-01", "2027-03-31"), ("2027-04-01", "2027-06-29"), ("2027-06-30", "2027-07-09")],
  )
  .await;

  let (_, stats) = get(&app, "/api/stats?year=2026").await;
  let es = country(&stats, "ES");
  assert_eq!(es["total_days"], 140);
  assert_eq!(es["percent_of_threshold"], 76.5);
  assert_eq!(es["severity"], "warning");
  assert_eq!(stats["warnings"][0]["kind"], "approaching_threshold");
  assert_eq!(stats["warnings"][0]["days"], 43);

  let (_, stats) = get(&app, "/api/stats?year=2027").await;
  let gb = country(&stats, "GB");
  assert_eq!(gb["total_days"], 190);
  assert_eq!(gb["severity"], "critical");
  assert_eq!(gb["remaining_days"], -7);
  assert_eq!(stats["warnings"][0]["severity"], "critical");
  assert_eq!(stats["warnings"][0]["days"], 7);
}

#[tokio::test]
async fn residence_inverts_and_suppresses_warnings() {
  let app = make_app(Some("ES")).await;
  add_days(&app, "ES", &[("2026-01-01", "2026-03-31"), ("2026-04-01", "2026-05-20")]).await;

  let (_, stats) = get(&app, "/api/stats?year=2026").await;
  let es = country(&stats, "ES");
  assert_eq!(es["is_residence"], true);
  assert_eq!(es["tone"], "caution");
  assert!(stats["warnings"].as_array().unwrap().is_empty());
  assert_eq!(stats["residence_country"], "ES");

  // A per-request residence overrides the configured one.
  let (_, stats) = get(&app, "/api/stats?year=2026&residence=FR").await;
  assert_eq!(country(&stats, "ES")["is_residence"], false);
  assert_eq!(stats["warnings"].as_array().unwrap().len(), 1);
}

// ── Conditional requests ─────────────────────────────────────────────────────

#[tokio::test]
async fn stats_etag_revalidates_until_a_mutation() {
  let app = make_app(None).await;
  post(&app, "/api/days", json!({ "date": "2026-02-04", "country": "FR" })).await;

  let (status, headers, _) = send(&app, "GET", "/api/stats?year=2026", None, vec![]).await;
  assert_eq!(status, StatusCode::OK);
  let tag = headers.get(header::ETAG).unwrap().to_str().unwrap().to_owned();

  let (status, _, _) = send(
    &app,
    "GET",
    "/api/stats?year=2026",
    None,
    vec![(header::IF_NONE_MATCH, tag.as_str())],
  )
  .await;
  assert_eq!(status, StatusCode::NOT_MODIFIED);

  post(&app, "/api/days", json!({ "date": "2026-02-05", "country": "FR" })).await;
  let (status, headers, stats) = send(
    &app,
    "GET",
    "/api/stats?year=2026",
    None,
    vec![(header::IF_NONE_MATCH, tag.as_str())],
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_ne!(headers.get(header::ETAG).unwrap().to_str().unwrap(), tag);
  assert_eq!(stats["total_days_tracked"], 2);
}

#[tokio::test]
async fn invalid_month_is_rejected() {
  let app = make_app(None).await;
  let (status, _) = get(&app, "/api/days?year=2026&month=13").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn config_residence_is_validated() {
  let mut cfg = ServerConfig::default();
  assert!(cfg.api_settings().unwrap().residence_country.is_none());

  cfg.residence_country = Some("mc".into());
  assert_eq!(cfg.api_settings().unwrap().residence_country.unwrap().as_str(), "MC");

  cfg.residence_country = Some("Monaco".into());
  assert!(cfg.api_settings().is_err());
}
