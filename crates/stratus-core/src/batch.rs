//! Binding rows to a location and collapsing duplicate conflict keys.
//!
//! A single bulk upsert must never touch the same target row twice, so every
//! batch goes through [`dedup_last_wins`] before a store writes it.

use std::{collections::HashSet, hash::Hash};

use chrono::{DateTime, NaiveDate, Utc};

use crate::rows::{DailyRow, HourlyRow, LocationId};

/// Rows that have a uniqueness key in storage.
pub trait ConflictKey {
  type Key: Eq + Hash;

  fn conflict_key(&self) -> Self::Key;
}

impl ConflictKey for HourlyRow {
  type Key = DateTime<Utc>;

  fn conflict_key(&self) -> Self::Key { self.observation_time }
}

impl ConflictKey for DailyRow {
  type Key = NaiveDate;

  fn conflict_key(&self) -> Self::Key { self.date }
}

/// An observation row tied to the location it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T> {
  pub location_id: LocationId,
  pub row:         T,
}

impl<T: ConflictKey> ConflictKey for Bound<T> {
  type Key = (LocationId, T::Key);

  fn conflict_key(&self) -> Self::Key { (self.location_id, self.row.conflict_key()) }
}

/// Attach `location_id` to every row.
pub fn bind<T>(location_id: LocationId, rows: Vec<T>) -> Vec<Bound<T>> {
  rows.into_iter().map(|row| Bound { location_id, row }).collect()
}

/// Keep only the last occurrence of each conflict key.
///
/// Survivors are returned in the order of their (last) appearance in the
/// input and are otherwise untouched.
pub fn dedup_last_wins<T: ConflictKey>(rows: Vec<T>) -> Vec<T> {
  let mut seen = HashSet::with_capacity(rows.len());
  let mut kept: Vec<T> = rows
    .into_iter()
    .rev()
    .filter(|row| seen.insert(row.conflict_key()))
    .collect();
  kept.reverse();
  kept
}
