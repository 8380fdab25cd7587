//! Core types and trait definitions for Stratus.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! provider client, the SQLite store, the API and the CLI all depend on it.

pub mod batch;
pub mod error;
pub mod location;
pub mod lookup;
pub mod mode;
pub mod rows;
pub mod schema;
pub mod source;
pub mod store;
pub mod table;
pub mod transform;
pub mod view;

pub use error::{BoxError, Error, Result};
