//! Domain types for the Daybook residency ledger: day records, range
//! expansion, per-country statistics and threshold tiers.
//!
//! No HTTP or database code lives here; the store, API and CLI crates build
//! on these types.

// `PresenceStore` and `Locator` use native `async fn` in traits.
#![allow(async_fn_in_trait)]

pub mod autolog;
pub mod classify;
pub mod country;
pub mod error;
pub mod ledger;
pub mod presence;
pub mod range;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
