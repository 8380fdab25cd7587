//! `stratus`: weather ingestion and serving.
//!
//! # Usage
//!
//! ```text
//! stratus ingest --city Beckley --start 2024-03-01 --end 2024-03-07
//! stratus ingest --city "New York" --forecast-days 7 --no-store --export-dir out/
//! stratus current --city Beckley
//! stratus forecast --city Beckley --hours 24
//! stratus serve
//! ```

mod export;
mod pipeline;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stratus_core::{lookup, mode::FetchMode};
use stratus_openmeteo::OpenMeteoClient;
use stratus_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use pipeline::{IngestRequest, run_pipeline};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "stratus", author, version, about = "Weather ingestion and serving")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "stratus.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch observations for a place and store and/or export them.
  Ingest {
    /// Place name to geocode (default: New York City).
    #[arg(long)]
    city:           Option<String>,
    /// First day of a historical range (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    start:          Option<NaiveDate>,
    /// Last day of a historical range, inclusive (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    end:            Option<NaiveDate>,
    /// Ingest a daily forecast of N days instead of history.
    #[arg(long, value_name = "N", conflicts_with_all = ["start", "end", "forecast_hours"])]
    forecast_days:  Option<i64>,
    /// Ingest an hourly forecast of N hours instead of history.
    #[arg(long, value_name = "N", conflicts_with_all = ["start", "end"])]
    forecast_hours: Option<i64>,
    /// Skip the database write.
    #[arg(long)]
    no_store:       bool,
    /// Write JSON snapshots into this directory.
    #[arg(long, value_name = "DIR")]
    export_dir:     Option<PathBuf>,
  },
  /// Print current conditions as JSON.
  Current {
    #[arg(long)]
    city: Option<String>,
  },
  /// Print a forecast as JSON (7 days unless told otherwise).
  Forecast {
    #[arg(long)]
    city:  Option<String>,
    #[arg(long, conflicts_with = "hours")]
    days:  Option<i64>,
    #[arg(long)]
    hours: Option<i64>,
  },
  /// Serve `/current` and `/forecast` over HTTP.
  Serve,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = settings::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
  let client =
    OpenMeteoClient::new(settings.provider.clone()).context("failed to build HTTP client")?;

  match cli.command {
    Command::Ingest {
      city,
      start,
      end,
      forecast_days,
      forecast_hours,
      no_store,
      export_dir,
    } => {
      let mut request = IngestRequest::historical(city, start, end);
      if let Some(days) = forecast_days {
        request.mode = FetchMode::DailyForecast { days };
      } else if let Some(hours) = forecast_hours {
        request.mode = FetchMode::HourlyForecast { hours };
      }
      request.export_dir = export_dir.or_else(|| settings.export_dir.clone());

      let report = if no_store {
        run_pipeline::<_, SqliteStore>(&client, None, &request).await?
      } else {
        let store = SqliteStore::open(&settings.store_path)
          .await
          .with_context(|| format!("failed to open store at {}", settings.store_path.display()))?;
        run_pipeline(&client, Some(&store), &request).await?
      };
      print_json(&report)?;
    }

    Command::Current { city } => {
      let view = lookup::current_conditions(&client, city.as_deref()).await?;
      print_json(&view)?;
    }

    Command::Forecast { city, days, hours } => {
      let mode = match hours {
        Some(hours) => FetchMode::HourlyForecast { hours },
        None => FetchMode::DailyForecast { days: days.unwrap_or(stratus_api::forecast::DEFAULT_DAYS) },
      };
      let view = lookup::forecast(&client, city.as_deref(), mode).await?;
      print_json(&view)?;
    }

    Command::Serve => {
      let app = stratus_api::api_router(Arc::new(client));
      let address = settings.server.address();

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
