//! The ingest pipeline: resolve → fetch → transform → upsert → export.

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use stratus_core::{
  location::Location,
  lookup::resolve_and_fetch,
  mode::FetchMode,
  rows::WriteSummary,
  source::WeatherSource,
  store::ObservationStore,
  transform::transform,
};

use crate::export::export_batch;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
  pub city:       Option<String>,
  pub mode:       FetchMode,
  pub export_dir: Option<PathBuf>,
}

impl IngestRequest {
  /// Historical mode over `start..=end`, each defaulting to today (UTC).
  pub fn historical(
    city: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  ) -> Self {
    let today = Utc::now().date_naive();
    Self {
      city,
      mode: FetchMode::Historical { start: start.unwrap_or(today), end: end.unwrap_or(today) },
      export_dir: None,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
  pub location:    Location,
  pub horizon:     String,
  pub hourly_rows: usize,
  pub daily_rows:  usize,
  /// Present when a store was given.
  pub written:     Option<WriteSummary>,
  pub exported:    Vec<PathBuf>,
}

/// Run one ingest. Without a store nothing is persisted; without an export
/// directory nothing is written to disk.
pub async fn run_pipeline<W, S>(
  source: &W,
  store: Option<&S>,
  request: &IngestRequest,
) -> anyhow::Result<PipelineReport>
where
  W: WeatherSource,
  S: ObservationStore,
{
  let (location, table) =
    resolve_and_fetch(source, request.city.as_deref(), request.mode).await?;
  let batch = transform(&table, &location)?;
  let horizon = request.mode.label();
  tracing::info!(
    location = %location.name,
    %horizon,
    hourly = batch.hourly.len(),
    daily = batch.daily.len(),
    "transformed"
  );

  let exported = match &request.export_dir {
    Some(dir) => export_batch(dir, &location, &batch, &horizon).await?,
    None => Vec::new(),
  };

  let hourly_rows = batch.hourly.len();
  let daily_rows = batch.daily.len();
  let written = match store {
    Some(store) => {
      let summary = store
        .upsert_batch(batch)
        .await
        .map_err(Into::<stratus_core::Error>::into)
        .with_context(|| format!("failed to store observations for {}", location.name))?;
      tracing::info!(
        location_id = %summary.location_id,
        hourly = summary.hourly_written,
        daily = summary.daily_written,
        dropped = summary.hourly_dropped + summary.daily_dropped,
        "stored"
      );
      Some(summary)
    }
    None => None,
  };

  Ok(PipelineReport { location, horizon, hourly_rows, daily_rows, written, exported })
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use stratus_core::{
    Error,
    location::{Coordinates, effective_query},
    schema::{DAILY, HOURLY},
    table::{Frame, ObservationTable, Series},
  };
  use stratus_store_sqlite::SqliteStore;

  use super::*;

  const MIDNIGHT_LOCAL: i64 = 1_709_269_200; // 2024-03-01T05:00Z

  /// Serves two hours and one day for any place except "Atlantis".
  #[derive(Default)]
  struct StubSource {
    fetched: Mutex<Vec<FetchMode>>,
  }

  fn frame(len: usize, step: i64, variables: &[&str], base: f64) -> Frame {
    Frame {
      time:   (0..len as i64).map(|i| MIDNIGHT_LOCAL + i * step).collect(),
      series: variables
        .iter()
        .map(|name| Series {
          name:   (*name).to_owned(),
          values: (0..len).map(|i| Some(base + i as f64)).collect(),
        })
        .collect(),
    }
  }

  impl WeatherSource for StubSource {
    type Error = Error;

    async fn resolve<'a>(&'a self, query: Option<&'a str>) -> Result<Location, Error> {
      let name = effective_query(query);
      if name == "Atlantis" {
        return Err(Error::NotFound(name.to_owned()));
      }
      Ok(Location {
        typed_name: name.to_owned(),
        name:       "Beckley".into(),
        latitude:   37.778_46,
        longitude:  -81.188_17,
        timezone:   Some("America/New_York".into()),
        elevation:  Some(749.0),
        population: None,
        country:    Some("United States".into()),
        admin1:     Some("West Virginia".into()),
      })
    }

    async fn fetch(&self, _: Coordinates, mode: FetchMode) -> Result<ObservationTable, Error> {
      mode.validate()?;
      self.fetched.lock().unwrap().push(mode);
      Ok(ObservationTable {
        latitude: 37.78,
        longitude: -81.19,
        timezone: Some("America/New_York".into()),
        utc_offset_seconds: -18_000,
        current: None,
        hourly: Some(frame(2, 3600, HOURLY, 40.0)),
        daily: Some(frame(1, 86_400, DAILY, 50.0)),
      })
    }
  }

  fn march_first() -> IngestRequest {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    IngestRequest::historical(Some("Beckley".into()), Some(day), Some(day))
  }

  #[tokio::test]
  async fn ingest_stores_and_reads_back() {
    let source = StubSource::default();
    let store = SqliteStore::open_in_memory().await.unwrap();

    let report = run_pipeline(&source, Some(&store), &march_first()).await.unwrap();
    assert_eq!(report.hourly_rows, 2);
    assert_eq!(report.daily_rows, 1);
    assert_eq!(report.horizon, "2024-03-01_to_2024-03-01");
    let written = report.written.unwrap();
    assert_eq!(written.hourly_written, 2);

    let stored = store.find_location(37.778_46, -81.188_17).await.unwrap().unwrap();
    assert_eq!(stored.location_id, written.location_id);
    assert_eq!(stored.location.latitude, 37.7785);

    let from = chrono::DateTime::from_timestamp(MIDNIGHT_LOCAL, 0).unwrap();
    let to = from + chrono::TimeDelta::hours(1);
    let rows = store.hourly_between(written.location_id, from, to).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].observation_time, from);
    assert_eq!(rows[1].temperature_2m, Some(41.0));

    let days = store
      .daily_between(
        written.location_id,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].precipitation_sum, Some(50.0));
  }

  #[tokio::test]
  async fn running_twice_is_idempotent() {
    let source = StubSource::default();
    let store = SqliteStore::open_in_memory().await.unwrap();

    let first = run_pipeline(&source, Some(&store), &march_first()).await.unwrap();
    let second = run_pipeline(&source, Some(&store), &march_first()).await.unwrap();
    assert_eq!(first.written.unwrap().location_id, second.written.unwrap().location_id);
    assert_eq!(store.list_locations().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn no_store_still_exports() {
    let source = StubSource::default();
    let dir = tempfile::tempdir().unwrap();
    let request = IngestRequest { export_dir: Some(dir.path().to_path_buf()), ..march_first() };

    let report = run_pipeline::<_, SqliteStore>(&source, None, &request).await.unwrap();
    assert!(report.written.is_none());
    assert_eq!(report.exported.len(), 3);
    assert!(report.exported.iter().all(|p| p.exists()));
  }

  #[tokio::test]
  async fn reversed_range_fails_before_fetching() {
    let source = StubSource::default();
    let request = IngestRequest::historical(
      None,
      NaiveDate::from_ymd_opt(2024, 3, 2),
      NaiveDate::from_ymd_opt(2024, 3, 1),
    );

    let err = run_pipeline::<_, SqliteStore>(&source, None, &request).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidRange(_))));
    assert!(source.fetched.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn unknown_place_is_not_found() {
    let source = StubSource::default();
    let request = IngestRequest { city: Some("Atlantis".into()), ..march_first() };

    let err = run_pipeline::<_, SqliteStore>(&source, None, &request).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
  }
}
