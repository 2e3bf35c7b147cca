//! Tool call supports.

mod error;
mod manager;
mod object;
mod output;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{Error, ErrorKind};
pub use manager::{Manager, ToolCall, ToolDefinition};
pub use output::{ContentBlock, ToolOutput};

/// The result of a tool call.
///
/// The success text and the error are both rendered into a [`ToolOutput`]
/// by the [`Manager`], so tools never need to build content blocks
/// themselves.
pub type ToolResult = Result<String, Error>;

/// A tool that can be called by the orchestrator.
///
/// Implementations of this trait should be stateless. Shared resources such
/// as an HTTP client or a store handle may be held by the tool, but they
/// must be cloned into the future returned by [`Tool::execute`] rather than
/// borrowed from `self`.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`,
    /// and the future should be cancellation safe.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}
