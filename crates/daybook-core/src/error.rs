//! Error types for `daybook-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("end date {end} is before start date {start}")]
  InvalidRange { start: NaiveDate, end: NaiveDate },

  #[error("range covers {days} days; at most {max} days can be added at once")]
  RangeTooLong { days: u32, max: u32 },

  #[error("invalid country code: {0:?}")]
  InvalidCountry(String),

  #[error("unknown presence status: {0:?}")]
  InvalidStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether the error was caused by caller input rather than by the system.
  pub fn is_validation(&self) -> bool {
    !matches!(self, Self::Serialization(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
