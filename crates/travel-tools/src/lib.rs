//! Travel planning tools for an agent: a weather forecast lookup and a
//! persistent store of trips and their tasks.
//!
//! The crate includes a CLI tool for calling the tools from the terminal or
//! from another process. You can also use it as a library and hand the
//! [`Toolset`] to your own orchestrator.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
pub mod tools;
mod toolset;

pub use config::{Config, DEFAULT_DB_PATH};
pub use toolset::{Toolset, ToolsetBuilder};

/// Re-exports of [`travel_tools_core`] crate.
pub mod core {
    pub use travel_tools_core::*;
}

/// Re-exports of [`travel_tools_forecast`] crate.
pub mod forecast {
    pub use travel_tools_forecast::*;
}

/// Re-exports of [`travel_tools_store`] crate.
pub mod store {
    pub use travel_tools_store::*;
}
