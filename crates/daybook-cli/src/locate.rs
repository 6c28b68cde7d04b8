//! [`Locator`] implementations available to the CLI.

use std::time::Duration;

use daybook_core::{
  autolog::{LocateError, Location, Locator},
  country::CountryCode,
};
use reqwest::Client;
use serde::Deserialize;

/// Default IP geolocation endpoint.
pub const DEFAULT_LOCATOR_URL: &str = "https://ipapi.co/json/";

/// Resolves the country from the public IP address.
///
/// The endpoint must answer with a JSON object carrying `country_code`,
/// `country_name` and optionally `city`.
pub struct IpLocator {
  client: Client,
  url:    String,
}

#[derive(Debug, Deserialize)]
struct IpLookup {
  country_code: Option<String>,
  country_name: Option<String>,
  city:         Option<String>,
}

impl IpLocator {
  pub fn new(url: impl Into<String>) -> Result<Self, LocateError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .map_err(|e| LocateError::Unavailable(e.to_string()))?;
    Ok(Self { client, url: url.into() })
  }

  async fn lookup(&self) -> Result<IpLookup, LocateError> {
    let unavailable = |e: reqwest::Error| LocateError::Unavailable(e.to_string());
    self
      .client
      .get(&self.url)
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(unavailable)?
      .json()
      .await
      .map_err(unavailable)
  }
}

impl Locator for IpLocator {
  async fn locate(&self) -> Result<Location, LocateError> {
    let lookup = self.lookup().await?;
    tracing::debug!(?lookup, "ip lookup");
    location_from(lookup)
  }
}

fn location_from(lookup: IpLookup) -> Result<Location, LocateError> {
  let raw = lookup
    .country_code
    .ok_or_else(|| LocateError::Unavailable("lookup returned no country".into()))?;
  let country = CountryCode::parse(&raw).map_err(|_| LocateError::UnknownCountry(raw))?;
  let country_name = lookup
    .country_name
    .filter(|n| !n.trim().is_empty())
    .unwrap_or_else(|| country.display_name().to_string());
  Ok(Location {
    country,
    country_name,
    city: lookup.city.filter(|c| !c.trim().is_empty()),
  })
}

/// A locator pinned to one country, for `--country` overrides.
pub struct FixedLocator(pub CountryCode);

impl Locator for FixedLocator {
  async fn locate(&self) -> Result<Location, LocateError> {
    Ok(Location {
      country_name: self.0.display_name().to_string(),
      country:      self.0.clone(),
      city:         None,
    })
  }
}
