//! SQL schema for the Stratus SQLite store.
//!
//! Executed once at connection startup; `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per geocoded place. Coordinates are rounded to 4 decimals before
-- they reach this table and form the natural key.
CREATE TABLE IF NOT EXISTS locations (
    location_id INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    timezone    TEXT,
    typed_name  TEXT NOT NULL,
    population  INTEGER,
    elevation   REAL,
    country     TEXT,
    admin1      TEXT,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at  TEXT NOT NULL,   -- ISO 8601 UTC; bumped on every upsert
    UNIQUE (latitude, longitude)
);

CREATE TABLE IF NOT EXISTS weather_hourly (
    location_id               INTEGER NOT NULL REFERENCES locations(location_id),
    observation_time          TEXT NOT NULL,   -- ISO 8601 UTC, whole seconds
    temperature_2m            REAL,
    relative_humidity_2m      REAL CHECK (relative_humidity_2m BETWEEN 0 AND 100),
    dew_point_2m              REAL,
    apparent_temperature      REAL,
    rain                      REAL,
    snowfall                  REAL,
    snow_depth                REAL,
    surface_pressure          REAL,
    cloud_cover               REAL CHECK (cloud_cover BETWEEN 0 AND 100),
    wind_speed_10m            REAL,
    wind_gusts_10m            REAL,
    wind_direction_10m        REAL,
    soil_temperature_0_to_7cm REAL,
    soil_moisture_0_to_7cm    REAL,
    PRIMARY KEY (location_id, observation_time)
);

CREATE TABLE IF NOT EXISTS weather_daily (
    location_id                 INTEGER NOT NULL REFERENCES locations(location_id),
    date                        TEXT NOT NULL,   -- YYYY-MM-DD, provider-local
    sunrise                     TEXT,
    sunset                      TEXT,
    precipitation_sum           REAL,
    temperature_2m_max          REAL,
    temperature_2m_min          REAL,
    wind_gusts_10m_max          REAL,
    wind_speed_10m_max          REAL,
    wind_direction_10m_dominant REAL,
    PRIMARY KEY (location_id, date)
);

PRAGMA user_version = 1;
";
