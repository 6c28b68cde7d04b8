//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Days, NaiveDate};
use daybook_core::{
  autolog::{LogOutcome, log_today},
  country::CountryCode,
  ledger::Ledger,
  presence::{DayPatch, NewDay, PresenceStatus},
  range::DayRange,
  store::{DayQuery, Inserted, PresenceStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn cc(code: &str) -> CountryCode { CountryCode::parse(code).unwrap() }

// ─── Single days ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_day() {
  let s = store().await;

  let input = NewDay::manual(d(2026, 2, 4), cc("FR")).with_notes(Some("Open Sud".into()));
  let day = s.put_day(input).await.unwrap();
  assert_eq!(day.country_name, "France");
  assert_eq!(day.status, PresenceStatus::Manual);
  assert_eq!(day.created_at, day.updated_at);

  let fetched = s.get_day(d(2026, 2, 4)).await.unwrap().unwrap();
  assert_eq!(fetched, day);
  assert_eq!(fetched.notes.as_deref(), Some("Open Sud"));
}

#[tokio::test]
async fn get_missing_day_returns_none() {
  let s = store().await;
  assert!(s.get_day(d(2026, 1, 1)).await.unwrap().is_none());
}

#[tokio::test]
async fn same_date_replaces_instead_of_duplicating() {
  let s = store().await;
  let date = d(2026, 4, 12);

  let first = s.put_day(NewDay::manual(date, cc("FR"))).await.unwrap();
  let second = s
    .put_day(NewDay::confirmed(date, cc("MC")))
    .await
    .unwrap();

  assert_eq!(second.country.as_str(), "MC");
  assert_eq!(second.country_name, "Monaco");
  assert_eq!(second.status, PresenceStatus::Confirmed);
  assert_eq!(second.created_at, first.created_at);
  assert!(second.updated_at >= first.updated_at);

  let days = s.list_days(DayQuery::year(2026)).await.unwrap();
  assert_eq!(days.len(), 1);
  assert_eq!(days[0].country.as_str(), "MC");
}

// ─── Bulk ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_range_writes_every_day() {
  let s = store().await;
  let range = DayRange::new(d(2026, 2, 8), d(2026, 2, 16)).unwrap();

  let written = s.put_days(range.expand(&cc("NL"), None)).await.unwrap();
  assert_eq!(written.len() as u32, range.len());

  let listed = s.list_days(DayQuery::year(2026)).await.unwrap();
  assert_eq!(listed.len(), 9);
  assert_eq!(listed.first().unwrap().date, d(2026, 2, 8));
  assert_eq!(listed.last().unwrap().date, d(2026, 2, 16));
  assert!(listed.iter().all(|day| day.status == PresenceStatus::Manual));
}

#[tokio::test]
async fn bulk_range_overwrites_existing_days() {
  let s = store().await;
  s.put_day(NewDay::confirmed(d(2026, 3, 2), cc("US"))).await.unwrap();

  let range = DayRange::new(d(2026, 3, 1), d(2026, 3, 3)).unwrap();
  s.put_days(range.expand(&cc("MX"), Some("Acapulco"))).await.unwrap();

  let listed = s.list_days(DayQuery::year(2026)).await.unwrap();
  assert_eq!(listed.len(), 3);
  assert!(listed.iter().all(|day| day.country.as_str() == "MX"));
  assert!(listed.iter().all(|day| day.notes.as_deref() == Some("Acapulco")));
}

#[tokio::test]
async fn empty_bulk_is_a_no_op() {
  let s = store().await;
  assert!(s.put_days(Vec::new()).await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_country_keeps_date_and_refreshes_name() {
  let s = store().await;
  let date = d(2026, 10, 15);
  s.put_day(NewDay::manual(date, cc("FR")).with_notes(Some("Paris".into())))
    .await
    .unwrap();

  let patch = DayPatch { country: Some(cc("ES")), ..DayPatch::default() };
  let updated = s.update_day(date, patch).await.unwrap().unwrap();

  assert_eq!(updated.date, date);
  assert_eq!(updated.country.as_str(), "ES");
  assert_eq!(updated.country_name, "Spain");
  assert_eq!(updated.notes.as_deref(), Some("Paris"));
  assert_eq!(updated.status, PresenceStatus::Manual);
}

#[tokio::test]
async fn update_status_and_notes() {
  let s = store().await;
  let date = d(2026, 10, 16);
  s.put_day(NewDay::manual(date, cc("DE")).with_notes(Some("Halle".into())))
    .await
    .unwrap();

  let patch = DayPatch {
    status: Some(PresenceStatus::Confirmed),
    notes: Some("".into()),
    ..DayPatch::default()
  };
  let updated = s.update_day(date, patch).await.unwrap().unwrap();
  assert_eq!(updated.status, PresenceStatus::Confirmed);
  assert_eq!(updated.country.as_str(), "DE");
  assert_eq!(updated.notes, None);
}

#[tokio::test]
async fn update_missing_day_returns_none() {
  let s = store().await;
  let patch = DayPatch { notes: Some("x".into()), ..DayPatch::default() };
  assert!(s.update_day(d(2026, 1, 1), patch).await.unwrap().is_none());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_day() {
  let s = store().await;
  let date = d(2026, 6, 1);
  s.put_day(NewDay::manual(date, cc("FR"))).await.unwrap();

  assert!(s.delete_day(date).await.unwrap());
  assert!(s.get_day(date).await.unwrap().is_none());
  assert!(!s.delete_day(date).await.unwrap());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_year_and_month() {
  let s = store().await;
  let start = d(2025, 12, 20);
  let days: Vec<NewDay> = (0..60)
    .map(|i| NewDay::manual(start + Days::new(i), cc("AU")))
    .collect();
  s.put_days(days).await.unwrap();

  assert_eq!(s.list_days(DayQuery::year(2025)).await.unwrap().len(), 12);
  assert_eq!(s.list_days(DayQuery::year(2026)).await.unwrap().len(), 48);

  let jan = s
    .list_days(DayQuery { year: 2026, month: Some(1) })
    .await
    .unwrap();
  assert_eq!(jan.len(), 31);
  assert!(jan.windows(2).all(|w| w[0].date < w[1].date));

  let bad = s
    .list_days(DayQuery { year: 2026, month: Some(13) })
    .await
    .unwrap();
  assert!(bad.is_empty());
}

// ─── Flows over the store ────────────────────────────────────────────────────

#[tokio::test]
async fn log_today_is_idempotent() {
  let s = store().await;
  let today = d(2026, 5, 25);

  let first = log_today(&s, today, cc("FR")).await.unwrap();
  assert!(matches!(first, LogOutcome::Logged(_)));
  let second = log_today(&s, today, cc("FR")).await.unwrap();
  assert!(matches!(second, LogOutcome::AlreadyLogged(_)));

  let days = s.list_days(DayQuery::year(2026)).await.unwrap();
  assert_eq!(days.len(), 1);
  assert_eq!(days[0].status, PresenceStatus::Confirmed);
}

#[tokio::test]
async fn insert_day_leaves_existing_record_alone() {
  let s = store().await;
  let date = d(2026, 5, 25);

  let first = s.insert_day(NewDay::manual(date, cc("ES"))).await.unwrap();
  assert!(matches!(first, Inserted::Created(ref day) if day.country.as_str() == "ES"));

  let second = s.insert_day(NewDay::confirmed(date, cc("FR"))).await.unwrap();
  let Inserted::Existing(kept) = second else {
    panic!("expected the existing record, got {second:?}");
  };
  assert_eq!(kept.country.as_str(), "ES");
  assert_eq!(kept.status, PresenceStatus::Manual);

  let stored = s.get_day(date).await.unwrap().unwrap();
  assert_eq!(stored, kept);
}

#[tokio::test]
async fn log_today_racing_a_manual_entry_never_replaces_it() {
  let s = store().await;
  let today = d(2026, 5, 25);

  for _ in 0..50 {
    s.delete_day(today).await.unwrap();

    let (outcome, manual) = tokio::join!(
      log_today(&s, today, cc("FR")),
      s.put_day(NewDay::manual(today, cc("ES"))),
    );
    let outcome = outcome.unwrap();
    manual.unwrap();

    // Whichever write landed first, the manual entry is what remains.
    let stored = s.get_day(today).await.unwrap().unwrap();
    assert_eq!(stored.status, PresenceStatus::Manual);
    assert_eq!(stored.country.as_str(), "ES");
    if let LogOutcome::ManualEntryKept(kept) = &outcome {
      assert_eq!(kept.country.as_str(), "ES");
    } else {
      assert!(matches!(outcome, LogOutcome::Logged(_)), "unexpected {outcome:?}");
    }
  }
}

#[tokio::test]
async fn stats_from_stored_days() {
  let s = store().await;
  s.put_day(NewDay::manual(d(2026, 2, 4), cc("FR"))).await.unwrap();
  let range = DayRange::new(d(2026, 2, 8), d(2026, 2, 16)).unwrap();
  s.put_days(range.expand(&cc("NL"), None)).await.unwrap();

  let ledger: Ledger = s
    .list_days(DayQuery::year(2026))
    .await
    .unwrap()
    .into_iter()
    .collect();
  let stats = ledger.stats(2026, None);

  assert_eq!(stats.country("FR").unwrap().total_days, 1);
  assert_eq!(stats.country("NL").unwrap().total_days, 9);
  assert_eq!(stats.country("NL").unwrap().longest_streak, 9);
  assert_eq!(stats.total_days_tracked, 10);
}

#[tokio::test]
async fn persists_across_reopen() {
  let dir = std::env::temp_dir().join(format!("daybook-test-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("reopen.db");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.put_day(NewDay::manual(d(2026, 7, 14), cc("FR"))).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let day = s.get_day(d(2026, 7, 14)).await.unwrap().unwrap();
  assert_eq!(day.country.as_str(), "FR");

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
