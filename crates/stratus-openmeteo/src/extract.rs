//! Generic extraction of provider blocks into [`Frame`]s.
//!
//! One routine handles every block. A block maps variable names to arrays
//! aligned with its `time` array; the `current` block holds scalars instead,
//! which are read as a single row.

use serde::Deserialize;
use serde_json::{Map, Value};
use stratus_core::table::{Frame, ObservationTable, Series};

use crate::{Error, Result, request::Blocks};

/// Top-level shape of a forecast or archive response.
#[derive(Debug, Deserialize)]
pub struct RawResponse {
  pub latitude:           f64,
  pub longitude:          f64,
  pub timezone:           Option<String>,
  #[serde(default)]
  pub utc_offset_seconds: i32,
  pub current:            Option<Map<String, Value>>,
  pub hourly:             Option<Map<String, Value>>,
  pub daily:              Option<Map<String, Value>>,
}

/// Build the table for a response body, reading exactly the blocks requested.
pub fn extract_table(body: Value, blocks: &Blocks) -> Result<ObservationTable> {
  let raw: RawResponse = serde_json::from_value(body)?;

  let frame = |name: &str, block: Option<&Map<String, Value>>, wanted: Option<&[&str]>| {
    wanted.map(|variables| extract_frame(name, block, variables)).transpose()
  };

  Ok(ObservationTable {
    current: frame("current", raw.current.as_ref(), blocks.current)?,
    hourly: frame("hourly", raw.hourly.as_ref(), blocks.hourly)?,
    daily: frame("daily", raw.daily.as_ref(), blocks.daily)?,
    latitude: raw.latitude,
    longitude: raw.longitude,
    timezone: raw.timezone,
    utc_offset_seconds: raw.utc_offset_seconds,
  })
}

/// Pull `variables` out of `block` in order, checking every column has one
/// value per timestamp.
pub fn extract_frame(
  name: &str,
  block: Option<&Map<String, Value>>,
  variables: &[&str],
) -> Result<Frame> {
  let block = block.ok_or_else(|| Error::Malformed(format!("response has no {name} block")))?;

  let time = cells(block, name, "time")?
    .into_iter()
    .map(|cell| {
      cell
        .as_i64()
        .ok_or_else(|| Error::Malformed(format!("{name}.time holds non-integer {cell}")))
    })
    .collect::<Result<Vec<_>>>()?;

  let series = variables
    .iter()
    .map(|&variable| {
      let values = cells(block, name, variable)?
        .into_iter()
        .map(|cell| number(cell, name, variable))
        .collect::<Result<Vec<_>>>()?;
      if values.len() != time.len() {
        return Err(Error::Malformed(format!(
          "{name}.{variable} has {} values for {} timestamps",
          values.len(),
          time.len()
        )));
      }
      Ok(Series { name: variable.to_owned(), values })
    })
    .collect::<Result<Vec<_>>>()?;

  Ok(Frame { time, series })
}

/// The cells of one column: an array's elements, or a lone scalar.
fn cells<'a>(block: &'a Map<String, Value>, name: &str, key: &str) -> Result<Vec<&'a Value>> {
  match block.get(key) {
    Some(Value::Array(items)) => Ok(items.iter().collect()),
    Some(scalar) => Ok(vec![scalar]),
    None => Err(Error::Malformed(format!("{name} block is missing {key:?}"))),
  }
}

fn number(cell: &Value, name: &str, variable: &str) -> Result<Option<f64>> {
  match cell {
    Value::Null => Ok(None),
    Value::Number(n) => Ok(n.as_f64().filter(|v| v.is_finite())),
    other => Err(Error::Malformed(format!("{name}.{variable} holds non-numeric {other}"))),
  }
}
