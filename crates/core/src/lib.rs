//! Core tool-calling layer: the [`Tool`] trait, tool errors, structured
//! results and the [`Manager`] that dispatches invocations by name.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod tool;

pub use tool::{Manager, Tool, ToolCall, ToolDefinition, ToolOutput};
