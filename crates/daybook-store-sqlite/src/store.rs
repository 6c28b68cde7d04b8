//! [`SqliteStore`]: the SQLite implementation of [`PresenceStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;

use daybook_core::{
  presence::{DayPatch, DayPresence, NewDay},
  store::{DayQuery, Inserted, PresenceStore},
};

use crate::{
  Error, Result,
  encode::{DAY_COLUMNS, RawDay, encode_date, encode_dt, encode_status},
  schema::SCHEMA,
};

/// Insert-or-replace keyed on the date. `created_at` survives a replace.
const UPSERT: &str = "
  INSERT INTO days (date, country, country_name, status, notes, created_at, updated_at)
  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
  ON CONFLICT(date) DO UPDATE SET
    country      = excluded.country,
    country_name = excluded.country_name,
    status       = excluded.status,
    notes        = excluded.notes,
    updated_at   = excluded.updated_at
  RETURNING date, country, country_name, status, notes, created_at, updated_at";

/// Insert that leaves an existing record for the date alone.
const INSERT_NEW: &str = "
  INSERT INTO days (date, country, country_name, status, notes, created_at, updated_at)
  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
  ON CONFLICT(date) DO NOTHING
  RETURNING date, country, country_name, status, notes, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A presence store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Bound parameters for one [`UPSERT`].
struct UpsertParams {
  date:         String,
  country:      String,
  country_name: String,
  status:       String,
  notes:        Option<String>,
  at:           String,
}

impl UpsertParams {
  /// The single place where the denormalised country name is resolved.
  fn new(input: &NewDay, at: &str) -> Self {
    Self {
      date:         encode_date(input.date),
      country:      input.country.as_str().to_owned(),
      country_name: input.country.display_name().to_owned(),
      status:       encode_status(input.status),
      notes:        input.notes.clone(),
      at:           at.to_owned(),
    }
  }

  fn execute(&self, conn: &rusqlite::Connection) -> rusqlite::Result<RawDay> {
    self.run(conn, UPSERT)
  }

  fn run(&self, conn: &rusqlite::Connection, sql: &str) -> rusqlite::Result<RawDay> {
    conn.query_row(
      sql,
      rusqlite::params![
        self.date,
        self.country,
        self.country_name,
        self.status,
        self.notes,
        self.at,
      ],
      RawDay::from_row,
    )
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PresenceStore impl ──────────────────────────────────────────────────────

impl PresenceStore for SqliteStore {
  type Error = Error;

  async fn put_day(&self, input: NewDay) -> Result<DayPresence> {
    let params = UpsertParams::new(&input, &encode_dt(Utc::now()));

    let raw = self
      .conn
      .call(move |conn| Ok(params.execute(conn)?))
      .await?;

    tracing::debug!(date = %input.date, country = %input.country, "upserted day");
    raw.into_day()
  }

  async fn insert_day(&self, input: NewDay) -> Result<Inserted> {
    let params = UpsertParams::new(&input, &encode_dt(Utc::now()));

    // Both statements run inside one closure on the connection thread, so no
    // other write can land between them.
    let (raw, created) = self
      .conn
      .call(move |conn| {
        if let Some(raw) = params.run(conn, INSERT_NEW).optional()? {
          return Ok((raw, true));
        }
        let existing = conn.query_row(
          &format!("SELECT {DAY_COLUMNS} FROM days WHERE date = ?1"),
          rusqlite::params![params.date],
          RawDay::from_row,
        )?;
        Ok((existing, false))
      })
      .await?;

    let day = raw.into_day()?;
    tracing::debug!(date = %input.date, created, "insert if absent");
    Ok(if created { Inserted::Created(day) } else { Inserted::Existing(day) })
  }

  async fn put_days(&self, inputs: Vec<NewDay>) -> Result<Vec<DayPresence>> {
    let at = encode_dt(Utc::now());
    let params: Vec<UpsertParams> = inputs.iter().map(|i| UpsertParams::new(i, &at)).collect();
    let count = params.len();

    let raws: Vec<RawDay> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let rows = params
          .iter()
          .map(|p| p.execute(&tx))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(count, "upserted days in one transaction");
    raws.into_iter().map(RawDay::into_day).collect()
  }

  async fn get_day(&self, date: NaiveDate) -> Result<Option<DayPresence>> {
    let date_str = encode_date(date);

    let raw: Option<RawDay> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {DAY_COLUMNS} FROM days WHERE date = ?1"),
            rusqlite::params![date_str],
            RawDay::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDay::into_day).transpose()
  }

  async fn update_day(&self, date: NaiveDate, patch: DayPatch) -> Result<Option<DayPresence>> {
    let date_str     = encode_date(date);
    let country      = patch.country.as_ref().map(|c| c.as_str().to_owned());
    let country_name = patch.country.as_ref().map(|c| c.display_name().to_owned());
    let status       = patch.status.map(encode_status);
    let notes        = patch.notes.clone();
    let at_str       = encode_dt(Utc::now());

    // NULL parameters leave a column untouched; blank notes clear it.
    let raw: Option<RawDay> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE days SET
                 country      = COALESCE(?2, country),
                 country_name = COALESCE(?3, country_name),
                 status       = COALESCE(?4, status),
                 notes        = CASE
                                  WHEN ?5 IS NULL THEN notes
                                  WHEN trim(?5) = '' THEN NULL
                                  ELSE ?5
                                END,
                 updated_at   = ?6
               WHERE date = ?1
               RETURNING {DAY_COLUMNS}"
            ),
            rusqlite::params![date_str, country, country_name, status, notes, at_str],
            RawDay::from_row,
          )
          .optional()?)
      })
      .await?;

    if raw.is_some() {
      tracing::debug!(%date, "updated day");
    }
    raw.map(RawDay::into_day).transpose()
  }

  async fn delete_day(&self, date: NaiveDate) -> Result<bool> {
    let date_str = encode_date(date);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM days WHERE date = ?1", rusqlite::params![date_str])?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn list_days(&self, query: DayQuery) -> Result<Vec<DayPresence>> {
    let Some((first, last)) = query.bounds() else {
      return Ok(Vec::new());
    };
    let first_str = encode_date(first);
    let last_str  = encode_date(last);

    let raws: Vec<RawDay> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DAY_COLUMNS} FROM days
           WHERE date BETWEEN ?1 AND ?2
           ORDER BY date"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![first_str, last_str], RawDay::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDay::into_day).collect()
  }
}
