//! ETag computation for ledger listings and stats.
//!
//! ETags are SHA-256 hashes over the sorted (date, updated_at) pairs of the
//! records a response was built from, plus a scope string naming the query.
//! Ordering is deterministic regardless of listing order.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, NaiveDate, Utc};
use daybook_core::presence::DayPresence;
use sha2::{Digest, Sha256};

/// Compute an ETag for a response derived from `days` under `scope`.
pub fn compute_etag(scope: &str, days: &[DayPresence]) -> String {
  let mut pairs: Vec<(NaiveDate, DateTime<Utc>)> =
    days.iter().map(|d| (d.date, d.updated_at)).collect();
  compute_etag_from_pairs(scope, &mut pairs)
}

/// Compute an ETag directly from (date, updated_at) pairs.
///
/// The slice is sorted in-place for determinism.
pub fn compute_etag_from_pairs(
  scope: &str,
  pairs: &mut [(NaiveDate, DateTime<Utc>)],
) -> String {
  pairs.sort_by_key(|(date, _)| *date);

  let mut hasher = Sha256::new();
  hasher.update(scope.as_bytes());
  for (date, ts) in pairs.iter() {
    hasher.update(date.to_string().as_bytes());
    hasher.update(ts.timestamp_micros().to_le_bytes());
  }
  let hash = hasher.finalize();
  format!("\"{}\"", hex::encode(hash))
}

/// Whether the request's `If-None-Match` already names `etag`.
pub fn is_fresh(headers: &HeaderMap, etag: &str) -> bool {
  headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| {
      v.split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || strip_weak(candidate) == etag)
    })
}

pub fn header_value(etag: &str) -> Option<HeaderValue> { HeaderValue::from_str(etag).ok() }

fn strip_weak(tag: &str) -> &str { tag.strip_prefix("W/").unwrap_or(tag) }
