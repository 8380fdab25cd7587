//! Open-Meteo implementation of [`WeatherSource`](stratus_core::source::WeatherSource).
//!
//! Geocoding, forecast and archive requests share one HTTP client with a
//! bounded timeout, retry transient failures with capped exponential backoff
//! and can be served from an on-disk response cache.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod request;
pub mod retry;

pub use client::OpenMeteoClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
