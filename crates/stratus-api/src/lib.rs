//! JSON HTTP API for Stratus.
//!
//! Exposes an axum [`Router`] backed by any
//! [`WeatherSource`](stratus_core::source::WeatherSource). Views are computed
//! per request and never stored.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = stratus_api::api_router(Arc::new(client));
//! axum::serve(listener, app).await?;
//! ```

pub mod current;
pub mod error;
pub mod extract;
pub mod forecast;

use std::sync::Arc;

use axum::{Router, routing::get};
use stratus_core::source::WeatherSource;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the API router for `source`.
pub fn api_router<W>(source: Arc<W>) -> Router<()>
where
  W: WeatherSource + 'static,
{
  Router::new()
    .route("/current", get(current::handler::<W>))
    .route("/forecast", get(forecast::handler::<W>))
    .layer(TraceLayer::new_for_http())
    .with_state(source)
}
