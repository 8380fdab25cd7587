//! JSON snapshot export.
//!
//! Writes three pretty-printed files per run:
//! `location_<city>_<state>.json`, `hourly_<city>_<state>_<label>.json` and
//! `daily_<city>_<state>_<label>.json`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use stratus_core::{location::Location, rows::WeatherBatch};

/// `<city>_<state>` with whitespace and path separators replaced by `_`.
pub fn place_stem(location: &Location) -> String {
  let raw = match &location.admin1 {
    Some(state) => format!("{}_{state}", location.name),
    None => location.name.clone(),
  };
  raw
    .chars()
    .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
    .collect()
}

/// Write the location and both row sets under `dir`, creating it if needed.
/// Returns the written paths in location, hourly, daily order.
pub async fn export_batch(
  dir: &Path,
  location: &Location,
  batch: &WeatherBatch,
  label: &str,
) -> anyhow::Result<Vec<PathBuf>> {
  tokio::fs::create_dir_all(dir)
    .await
    .with_context(|| format!("failed to create export directory {}", dir.display()))?;

  let stem = place_stem(location);
  let files = [
    (format!("location_{stem}.json"), to_json(location)?),
    (format!("hourly_{stem}_{label}.json"), to_json(&batch.hourly)?),
    (format!("daily_{stem}_{label}.json"), to_json(&batch.daily)?),
  ];

  let mut written = Vec::with_capacity(files.len());
  for (name, body) in files {
    let path = dir.join(name);
    tokio::fs::write(&path, body)
      .await
      .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported");
    written.push(path);
  }
  Ok(written)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<Vec<u8>> {
  serde_json::to_vec_pretty(value).context("failed to serialise export")
}
