//! `ObservationTable`: the fetched, not yet reshaped provider response.
//!
//! Values are kept column-wise exactly as the provider aligned them: every
//! series in a [`Frame`] has one entry per element of `time`.

use serde::{Deserialize, Serialize};

/// One named variable within a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
  pub name:   String,
  pub values: Vec<Option<f64>>,
}

/// A block of the response (`current`, `hourly` or `daily`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
  /// Epoch seconds, one per row.
  pub time:   Vec<i64>,
  /// Series in the order of the schema list that was requested.
  pub series: Vec<Series>,
}

impl Frame {
  pub fn len(&self) -> usize { self.time.len() }

  pub fn is_empty(&self) -> bool { self.time.is_empty() }

  /// The full column for `name`, if it was requested.
  pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
    self
      .series
      .iter()
      .find(|s| s.name == name)
      .map(|s| s.values.as_slice())
  }

  /// The value at `row` for `name`; `None` when absent or null.
  pub fn value(&self, row: usize, name: &str) -> Option<f64> {
    self.column(name).and_then(|c| c.get(row).copied().flatten())
  }
}

/// Everything one weather call returned for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
  /// Grid-cell coordinates the provider actually used.
  pub latitude:           f64,
  pub longitude:          f64,
  pub timezone:           Option<String>,
  /// Offset of the provider's local time from UTC; used to derive calendar
  /// dates for daily rows.
  pub utc_offset_seconds: i32,
  pub current:            Option<Frame>,
  pub hourly:             Option<Frame>,
  pub daily:              Option<Frame>,
}
