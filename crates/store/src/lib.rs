//! SQLite persistence for trips and their planning tasks.
//!
//! [`TripStore`] owns the location of the database file. Every operation
//! opens its own short-lived connection and runs in a single transaction,
//! so the store can be cloned freely and used from concurrent tasks.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod model;
mod schema;
mod store;

pub use error::{Result, StoreError};
pub use model::*;
pub use store::TripStore;
