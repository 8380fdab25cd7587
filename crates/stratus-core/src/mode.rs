//! What to fetch: a snapshot, a forecast horizon, or a historical range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Longest daily horizon the forecast endpoint serves.
pub const MAX_FORECAST_DAYS: i64 = 16;
/// Longest hourly horizon the forecast endpoint serves (16 days).
pub const MAX_FORECAST_HOURS: i64 = MAX_FORECAST_DAYS * 24;

/// A fetch request shape. Horizons are signed so that bad caller input can be
/// represented and rejected by [`FetchMode::validate`] instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FetchMode {
  Current,
  HourlyForecast { hours: i64 },
  DailyForecast { days: i64 },
  /// Inclusive on both ends.
  Historical { start: NaiveDate, end: NaiveDate },
}

impl FetchMode {
  /// Reject negative or oversized horizons and reversed ranges before any
  /// request is made.
  pub fn validate(&self) -> Result<()> {
    match *self {
      Self::Current => Ok(()),
      Self::HourlyForecast { hours } => check_horizon("hours", hours, MAX_FORECAST_HOURS),
      Self::DailyForecast { days } => check_horizon("days", days, MAX_FORECAST_DAYS),
      Self::Historical { start, end } if start > end => Err(Error::InvalidRange(format!(
        "start date {start} is after end date {end}"
      ))),
      Self::Historical { .. } => Ok(()),
    }
  }

  pub fn is_historical(&self) -> bool { matches!(self, Self::Historical { .. }) }

  /// Short, filename-safe description of the span covered.
  pub fn label(&self) -> String {
    match self {
      Self::Current => "current".to_owned(),
      Self::HourlyForecast { hours } => format!("next_{hours}h"),
      Self::DailyForecast { days } => format!("next_{days}d"),
      Self::Historical { start, end } => format!("{start}_to_{end}"),
    }
  }
}

fn check_horizon(unit: &str, value: i64, max: i64) -> Result<()> {
  if value < 0 {
    return Err(Error::InvalidRange(format!("{unit} must not be negative, got {value}")));
  }
  if value > max {
    return Err(Error::InvalidRange(format!("{unit} must be at most {max}, got {value}")));
  }
  Ok(())
}
