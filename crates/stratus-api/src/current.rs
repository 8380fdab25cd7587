//! `GET /current[?city=<name>]`

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use stratus_core::{lookup, source::WeatherSource, view::CurrentConditions};

use crate::{error::ApiError, extract::Query};

#[derive(Debug, Deserialize)]
pub struct CurrentParams {
  pub city: Option<String>,
}

pub async fn handler<W: WeatherSource>(
  State(source): State<Arc<W>>,
  Query(params): Query<CurrentParams>,
) -> Result<Json<CurrentConditions>, ApiError> {
  let view = lookup::current_conditions(source.as_ref(), params.city.as_deref()).await?;
  Ok(Json(view))
}
