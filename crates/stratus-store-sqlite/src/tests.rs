//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stratus_core::{
  rows::{DailyRow, HourlyRow, LocationRow, WeatherBatch},
  store::ObservationStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn at(hour: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap() }

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2026, 1, d).unwrap() }

fn beckley() -> LocationRow {
  LocationRow {
    name:       "Beckley".into(),
    latitude:   37.7785,
    longitude:  -81.1882,
    timezone:   Some("America/New_York".into()),
    typed_name: "beckley".into(),
    population: Some(17_286),
    elevation:  Some(749.0),
    country:    Some("United States".into()),
    admin1:     Some("West Virginia".into()),
  }
}

fn hourly(hour: u32, temp: f64) -> HourlyRow {
  HourlyRow {
    temperature_2m: Some(temp),
    relative_humidity_2m: Some(80.0),
    ..HourlyRow::empty(at(hour))
  }
}

fn daily(d: u32, max: f64) -> DailyRow {
  DailyRow { temperature_2m_max: Some(max), ..DailyRow::empty(day(d)) }
}

fn batch(hourly: Vec<HourlyRow>, daily: Vec<DailyRow>) -> WeatherBatch {
  WeatherBatch { location: beckley(), hourly, daily }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_writes_location_and_rows() {
  let s = store().await;

  let summary = s
    .upsert_batch(batch(
      vec![hourly(9, 70.0), hourly(7, 68.0), hourly(8, 69.0)],
      vec![daily(1, 75.0), daily(2, 77.0)],
    ))
    .await
    .unwrap();
  assert_eq!(summary.hourly_written, 3);
  assert_eq!(summary.hourly_dropped, 0);
  assert_eq!(summary.daily_written, 2);

  let locations = s.list_locations().await.unwrap();
  assert_eq!(locations.len(), 1);
  assert_eq!(locations[0].location_id, summary.location_id);
  assert_eq!(locations[0].location, beckley());

  let rows = s.hourly_between(summary.location_id, at(0), at(23)).await.unwrap();
  let times: Vec<_> = rows.iter().map(|r| r.observation_time).collect();
  assert_eq!(times, vec![at(7), at(8), at(9)]);

  let days = s.daily_between(summary.location_id, day(1), day(31)).await.unwrap();
  assert_eq!(days, vec![daily(1, 75.0), daily(2, 77.0)]);
}

#[tokio::test]
async fn later_duplicate_in_batch_wins() {
  let s = store().await;

  let summary = s
    .upsert_batch(batch(vec![hourly(9, 70.0), hourly(9, 72.0)], vec![]))
    .await
    .unwrap();
  assert_eq!(summary.hourly_written, 1);
  assert_eq!(summary.hourly_dropped, 1);

  let rows = s.hourly_between(summary.location_id, at(9), at(9)).await.unwrap();
  assert_eq!(rows, vec![hourly(9, 72.0)]);
}

#[tokio::test]
async fn later_duplicate_daily_row_wins() {
  let s = store().await;

  let summary = s
    .upsert_batch(batch(vec![], vec![daily(1, 1.0), daily(2, 2.0), daily(1, 3.0)]))
    .await
    .unwrap();
  assert_eq!(summary.daily_written, 2);
  assert_eq!(summary.daily_dropped, 1);

  let days = s.daily_between(summary.location_id, day(1), day(2)).await.unwrap();
  assert_eq!(days, vec![daily(1, 3.0), daily(2, 2.0)]);
}

#[tokio::test]
async fn reingesting_the_same_batch_is_idempotent() {
  let s = store().await;
  let b = batch(vec![hourly(7, 68.0), hourly(8, 69.0)], vec![daily(1, 75.0)]);

  let first = s.upsert_batch(b.clone()).await.unwrap();
  let second = s.upsert_batch(b).await.unwrap();
  assert_eq!(first.location_id, second.location_id);

  assert_eq!(s.list_locations().await.unwrap().len(), 1);
  let rows = s.hourly_between(first.location_id, at(0), at(23)).await.unwrap();
  assert_eq!(rows, vec![hourly(7, 68.0), hourly(8, 69.0)]);
  let days = s.daily_between(first.location_id, day(1), day(1)).await.unwrap();
  assert_eq!(days.len(), 1);
}

#[tokio::test]
async fn conflict_overwrites_every_measurement() {
  let s = store().await;
  let original = HourlyRow {
    temperature_2m: Some(70.0),
    relative_humidity_2m: Some(80.0),
    cloud_cover: Some(10.0),
    rain: Some(0.1),
    ..HourlyRow::empty(at(9))
  };
  let revised = HourlyRow {
    temperature_2m: Some(71.0),
    cloud_cover: Some(50.0),
    wind_speed_10m: Some(12.5),
    ..HourlyRow::empty(at(9))
  };
  let sunny = DailyRow {
    sunrise: Some(at(12)),
    precipitation_sum: Some(0.0),
    ..DailyRow::empty(day(1))
  };
  let stormy = DailyRow { precipitation_sum: Some(1.2), ..DailyRow::empty(day(1)) };

  let id = s.upsert_batch(batch(vec![original], vec![sunny])).await.unwrap().location_id;
  s.upsert_batch(batch(vec![revised.clone()], vec![stormy.clone()])).await.unwrap();

  let rows = s.hourly_between(id, at(9), at(9)).await.unwrap();
  assert_eq!(rows, vec![revised]);
  let days = s.daily_between(id, day(1), day(1)).await.unwrap();
  assert_eq!(days, vec![stormy]);
}

#[tokio::test]
async fn sun_times_round_trip_as_utc_instants() {
  let s = store().await;
  let row = DailyRow {
    sunrise: Some(Utc.with_ymd_and_hms(2026, 1, 1, 12, 50, 0).unwrap()),
    sunset: Some(Utc.with_ymd_and_hms(2026, 1, 1, 22, 30, 0).unwrap()),
    ..daily(1, 40.0)
  };

  let id = s.upsert_batch(batch(vec![], vec![row.clone()])).await.unwrap().location_id;
  assert_eq!(s.daily_between(id, day(1), day(1)).await.unwrap(), vec![row]);
}

// ─── Locations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn location_metadata_is_refreshed_on_conflict() {
  let s = store().await;
  let first = s.upsert_batch(batch(vec![], vec![])).await.unwrap();

  let mut moved_on = batch(vec![], vec![]);
  moved_on.location.population = Some(18_000);
  moved_on.location.typed_name = "Beckley, WV".into();
  let second = s.upsert_batch(moved_on).await.unwrap();

  assert_eq!(first.location_id, second.location_id);
  let stored = s.find_location(37.7785, -81.1882).await.unwrap().unwrap();
  assert_eq!(stored.location.population, Some(18_000));
  assert_eq!(stored.location.typed_name, "Beckley, WV");
  assert_eq!(s.list_locations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn nearby_coordinates_collapse_to_one_location() {
  let s = store().await;

  let mut a = batch(vec![], vec![]);
  a.location.latitude = 37.778_46;
  let mut b = batch(vec![], vec![]);
  b.location.latitude = 37.778_49;

  let first = s.upsert_batch(a).await.unwrap();
  let second = s.upsert_batch(b).await.unwrap();
  assert_eq!(first.location_id, second.location_id);

  let stored = s.find_location(37.778_47, -81.188_17).await.unwrap().unwrap();
  assert_eq!(stored.location.latitude, 37.7785);
}

#[tokio::test]
async fn distinct_places_get_distinct_ids() {
  let s = store().await;
  let beckley = s.upsert_batch(batch(vec![hourly(9, 30.0)], vec![])).await.unwrap();

  let mut nyc = batch(vec![hourly(9, 41.0)], vec![]);
  nyc.location.name = "New York".into();
  nyc.location.latitude = 40.7143;
  nyc.location.longitude = -74.006;
  let nyc = s.upsert_batch(nyc).await.unwrap();

  assert_ne!(beckley.location_id, nyc.location_id);
  // Same instant, different location: both rows exist.
  let here = s.hourly_between(beckley.location_id, at(9), at(9)).await.unwrap();
  let there = s.hourly_between(nyc.location_id, at(9), at(9)).await.unwrap();
  assert_eq!(here, vec![hourly(9, 30.0)]);
  assert_eq!(there, vec![hourly(9, 41.0)]);
}

#[tokio::test]
async fn find_location_missing_returns_none() {
  let s = store().await;
  assert!(s.find_location(0.0, 0.0).await.unwrap().is_none());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn range_queries_are_inclusive_and_ordered() {
  let s = store().await;
  let rows: Vec<_> = (6..=12).rev().map(|h| hourly(h, f64::from(h))).collect();
  let days: Vec<_> = (1..=5).map(|d| daily(d, f64::from(d))).collect();
  let id = s.upsert_batch(batch(rows, days)).await.unwrap().location_id;

  let window = s.hourly_between(id, at(8), at(10)).await.unwrap();
  assert_eq!(window, vec![hourly(8, 8.0), hourly(9, 9.0), hourly(10, 10.0)]);

  let window = s.daily_between(id, day(2), day(3)).await.unwrap();
  assert_eq!(window, vec![daily(2, 2.0), daily(3, 3.0)]);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_batch_on_empty_store_leaves_nothing_behind() {
  let s = store().await;
  let bad = HourlyRow { relative_humidity_2m: Some(150.0), ..HourlyRow::empty(at(10)) };

  let err = s
    .upsert_batch(batch(vec![hourly(9, 70.0), bad], vec![daily(1, 75.0)]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Integrity(_)), "got {err:?}");
  assert!(matches!(stratus_core::Error::from(err), stratus_core::Error::StorageIntegrity(_)));

  assert!(s.list_locations().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_batch_keeps_previous_state() {
  let s = store().await;
  let id = s.upsert_batch(batch(vec![hourly(9, 70.0)], vec![])).await.unwrap().location_id;

  let overcast = HourlyRow { cloud_cover: Some(200.0), ..HourlyRow::empty(at(10)) };
  let mut bad = batch(vec![hourly(9, 99.0), overcast], vec![]);
  bad.location.population = Some(1);
  assert!(s.upsert_batch(bad).await.is_err());

  let rows = s.hourly_between(id, at(0), at(23)).await.unwrap();
  assert_eq!(rows, vec![hourly(9, 70.0)]);
  let stored = s.find_location(37.7785, -81.1882).await.unwrap().unwrap();
  assert_eq!(stored.location.population, Some(17_286));
}

#[tokio::test]
async fn open_in_missing_directory_is_unavailable() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("no").join("such").join("stratus.db");

  let err = SqliteStore::open(&path).await.err().expect("open should fail");
  assert!(matches!(err, Error::Unavailable(_)), "got {err:?}");
  assert!(matches!(stratus_core::Error::from(err), stratus_core::Error::StorageUnavailable(_)));
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("stratus.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.upsert_batch(batch(vec![hourly(9, 70.0)], vec![])).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let locations = s.list_locations().await.unwrap();
  assert_eq!(locations.len(), 1);
  let rows = s.hourly_between(locations[0].location_id, at(9), at(9)).await.unwrap();
  assert_eq!(rows, vec![hourly(9, 70.0)]);
}
