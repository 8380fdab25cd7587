//! `GET /forecast[?city=<name>][&days=<n>|&hours=<n>]`
//!
//! Defaults to a 7-day daily forecast. When both `days` and `hours` are
//! given, `hours` wins.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use stratus_core::{lookup, mode::FetchMode, source::WeatherSource, view::ForecastView};

use crate::{error::ApiError, extract::Query};

pub const DEFAULT_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
  pub city:  Option<String>,
  pub days:  Option<i64>,
  pub hours: Option<i64>,
}

impl ForecastParams {
  pub fn mode(&self) -> FetchMode {
    match self.hours {
      Some(hours) => FetchMode::HourlyForecast { hours },
      None => FetchMode::DailyForecast { days: self.days.unwrap_or(DEFAULT_DAYS) },
    }
  }
}

pub async fn handler<W: WeatherSource>(
  State(source): State<Arc<W>>,
  Query(params): Query<ForecastParams>,
) -> Result<Json<ForecastView>, ApiError> {
  let view = lookup::forecast(source.as_ref(), params.city.as_deref(), params.mode()).await?;
  Ok(Json(view))
}
