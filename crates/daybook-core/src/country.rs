//! Country codes and the static country catalog.
//!
//! Codes are ISO 3166-1 alpha-2. Display names are denormalised onto each
//! [`DayPresence`](crate::presence::DayPresence) when it is written, so the
//! catalog is the single source for them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── CountryCode ─────────────────────────────────────────────────────────────

/// A validated, upper-case ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
  pub fn parse(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(Error::InvalidCountry(s.to_owned()));
    }
    Ok(Self(trimmed.to_ascii_uppercase()))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Display name from the catalog, falling back to the code itself.
  pub fn display_name(&self) -> &str {
    lookup(&self.0).unwrap_or(&self.0)
  }
}

impl fmt::Display for CountryCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl std::str::FromStr for CountryCode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for CountryCode {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<CountryCode> for String {
  fn from(c: CountryCode) -> Self { c.0 }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// One entry of the country picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
  pub code: String,
  pub name: String,
}

const CATALOG: &[(&str, &str)] = &[
  ("AE", "United Arab Emirates"),
  ("AR", "Argentina"),
  ("AT", "Austria"),
  ("AU", "Australia"),
  ("BE", "Belgium"),
  ("BR", "Brazil"),
  ("CA", "Canada"),
  ("CH", "Switzerland"),
  ("CL", "Chile"),
  ("CN", "China"),
  ("CO", "Colombia"),
  ("CZ", "Czechia"),
  ("DE", "Germany"),
  ("DK", "Denmark"),
  ("ES", "Spain"),
  ("FI", "Finland"),
  ("FR", "France"),
  ("GB", "United Kingdom"),
  ("GR", "Greece"),
  ("HR", "Croatia"),
  ("HU", "Hungary"),
  ("IN", "India"),
  ("IT", "Italy"),
  ("JP", "Japan"),
  ("KR", "South Korea"),
  ("MA", "Morocco"),
  ("MC", "Monaco"),
  ("MX", "Mexico"),
  ("NL", "Netherlands"),
  ("NO", "Norway"),
  ("PL", "Poland"),
  ("PT", "Portugal"),
  ("QA", "Qatar"),
  ("RO", "Romania"),
  ("RS", "Serbia"),
  ("SA", "Saudi Arabia"),
  ("SE", "Sweden"),
  ("TN", "Tunisia"),
  ("TR", "Turkey"),
  ("US", "United States"),
];

fn lookup(code: &str) -> Option<&'static str> {
  CATALOG
    .iter()
    .find(|(c, _)| *c == code)
    .map(|(_, name)| *name)
}

/// All catalog entries, sorted by display name.
pub fn catalog() -> Vec<CountryEntry> {
  let mut entries: Vec<CountryEntry> = CATALOG
    .iter()
    .map(|(code, name)| CountryEntry {
      code: (*code).to_owned(),
      name: (*name).to_owned(),
    })
    .collect();
  entries.sort_by(|a, b| a.name.cmp(&b.name));
  entries
}
