//! Layered configuration: built-in defaults, then the TOML file, then
//! `STRATUS_*` environment variables (`__` separates nested keys, e.g.
//! `STRATUS_PROVIDER__TIMEZONE`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use stratus_openmeteo::ClientConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite database file; `~/` is expanded.
  pub store_path: PathBuf,
  /// Where `ingest` writes JSON snapshots unless `--export-dir` is given.
  pub export_dir: Option<PathBuf>,
  pub server:     ServerSettings,
  pub provider:   ClientConfig,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("stratus.db"),
      export_dir: None,
      server:     ServerSettings::default(),
      provider:   ClientConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
  pub host: String,
  pub port: u16,
}

impl Default for ServerSettings {
  fn default() -> Self { Self { host: "127.0.0.1".to_owned(), port: 8080 } }
}

impl ServerSettings {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn environment() -> Environment {
  Environment::with_prefix("STRATUS")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Load settings from `path` (which may not exist) and the process
/// environment.
pub fn load(path: &Path) -> Result<Settings, ConfigError> { load_with(path, environment()) }

fn load_with(path: &Path, env: Environment) -> Result<Settings, ConfigError> {
  let mut settings: Settings = Config::builder()
    .add_source(File::from(path).required(false))
    .add_source(env)
    .build()?
    .try_deserialize()?;

  settings.store_path = expand_tilde(&settings.store_path);
  settings.export_dir = settings.export_dir.as_deref().map(expand_tilde);
  if let Some(dir) = &settings.provider.cache.dir {
    settings.provider.cache.dir = Some(expand_tilde(dir));
  }
  Ok(settings)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
