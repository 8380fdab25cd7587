//! On-disk cache of provider responses.
//!
//! Each entry is one JSON file named by the SHA-256 of the request (endpoint
//! plus sorted query pairs) and holding `{ fetched_at, body }`. The cache is
//! best-effort: unreadable entries count as misses and failed writes are
//! logged, never surfaced.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How long a cached response stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
  Never,
  After(Duration),
}

impl Expiry {
  fn is_expired(self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match self {
      Expiry::Never => false,
      Expiry::After(ttl) => {
        let age = now.signed_duration_since(fetched_at).num_seconds();
        age >= i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
      }
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
  fetched_at: DateTime<Utc>,
  body:       serde_json::Value,
}

/// Hex SHA-256 of `url` and `query`; pair order does not matter.
pub fn cache_key(url: &str, query: &[(String, String)]) -> String {
  let mut pairs: Vec<_> = query.iter().collect();
  pairs.sort();

  let mut hasher = Sha256::new();
  hasher.update(url.as_bytes());
  for (k, v) in pairs {
    hasher.update(b"\n");
    hasher.update(k.as_bytes());
    hasher.update(b"=");
    hasher.update(v.as_bytes());
  }
  hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
  dir: PathBuf,
}

impl ResponseCache {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  fn path_for(&self, key: &str) -> PathBuf { self.dir.join(format!("{key}.json")) }

  pub async fn get(&self, key: &str, expiry: Expiry) -> Option<serde_json::Value> {
    self.get_at(key, expiry, Utc::now()).await
  }

  pub async fn get_at(
    &self,
    key: &str,
    expiry: Expiry,
    now: DateTime<Utc>,
  ) -> Option<serde_json::Value> {
    let path = self.path_for(key);
    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!(%key, "cache miss");
        return None;
      }
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "unreadable cache entry");
        return None;
      }
    };

    let entry: Entry = match serde_json::from_slice(&bytes) {
      Ok(entry) => entry,
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "corrupt cache entry");
        return None;
      }
    };

    if expiry.is_expired(entry.fetched_at, now) {
      tracing::debug!(%key, fetched_at = %entry.fetched_at, "cache entry expired");
      return None;
    }
    tracing::debug!(%key, "cache hit");
    Some(entry.body)
  }

  pub async fn put(&self, key: &str, body: &serde_json::Value) {
    self.put_at(key, body, Utc::now()).await
  }

  pub async fn put_at(&self, key: &str, body: &serde_json::Value, fetched_at: DateTime<Utc>) {
    if let Err(e) = self.write(key, body, fetched_at).await {
      tracing::warn!(dir = %self.dir.display(), error = %e, "failed to write cache entry");
    }
  }

  async fn write(
    &self,
    key: &str,
    body: &serde_json::Value,
    fetched_at: DateTime<Utc>,
  ) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&self.dir).await?;
    let entry = Entry { fetched_at, body: body.clone() };
    let bytes = serde_json::to_vec(&entry)?;

    // Write then rename so readers never see a partial file.
    let tmp = self.dir.join(format!("{key}.json.tmp"));
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, self.path_for(key)).await
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;
  use serde_json::json;

  use super::*;

  fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
  }

  #[test]
  fn key_ignores_pair_order() {
    let a = cache_key("https://x/v1/archive", &query(&[("a", "1"), ("b", "2")]));
    let b = cache_key("https://x/v1/archive", &query(&[("b", "2"), ("a", "1")]));
    let c = cache_key("https://x/v1/forecast", &query(&[("a", "1"), ("b", "2")]));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
  }

  #[tokio::test]
  async fn round_trip_and_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(dir.path().join("nested"));
    let body = json!({ "hourly": { "time": [1] } });
    let t0 = Utc::now();

    cache.put_at("k", &body, t0).await;

    let ttl = Expiry::After(Duration::from_secs(900));
    assert_eq!(cache.get_at("k", ttl, t0 + TimeDelta::seconds(60)).await, Some(body.clone()));
    assert_eq!(cache.get_at("k", ttl, t0 + TimeDelta::seconds(900)).await, None);
    assert_eq!(cache.get_at("k", Expiry::Never, t0 + TimeDelta::days(3650)).await, Some(body));
  }

  #[tokio::test]
  async fn missing_and_corrupt_entries_are_misses() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(dir.path());
    assert_eq!(cache.get("absent", Expiry::Never).await, None);

    std::fs::write(dir.path().join("bad.json"), b"{ not json").unwrap();
    assert_eq!(cache.get("bad", Expiry::Never).await, None);
  }

  #[tokio::test]
  async fn write_failure_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"").unwrap();

    // The cache "directory" is a regular file, so every write fails.
    let cache = ResponseCache::new(&blocker);
    cache.put("k", &json!({})).await;
    assert_eq!(cache.get("k", Expiry::Never).await, None);
  }
}
