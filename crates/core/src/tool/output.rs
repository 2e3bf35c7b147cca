use serde::{Deserialize, Serialize};

use super::{Error, ErrorKind, ToolResult};

/// A piece of content returned to the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text payload.
        text: String,
    },
}

/// The well-formed result of a tool invocation.
///
/// Every invocation yields one of these, whether the tool succeeded or
/// not. Failures are flagged with `is_error`, classified by `error_kind`
/// and described in the content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The content blocks.
    pub content: Vec<ContentBlock>,
    /// Whether the invocation failed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// The kind of failure, set on error outputs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Whether the same call may succeed if repeated later.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ToolOutput {
    /// Creates a successful output holding a single text block.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
            error_kind: None,
            retryable: false,
        }
    }

    /// Creates an error output describing `err`.
    #[inline]
    pub fn error(err: &Error) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: err.reason().into_owned(),
            }],
            is_error: true,
            error_kind: Some(err.kind()),
            retryable: err.is_transient(),
        }
    }

    /// Concatenates the text of all content blocks.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        for block in &self.content {
            match block {
                ContentBlock::Text { text } => result.push_str(text),
            }
        }
        result
    }
}

impl From<ToolResult> for ToolOutput {
    #[inline]
    fn from(result: ToolResult) -> Self {
        match result {
            Ok(text) => Self::text(text),
            Err(err) => Self::error(&err),
        }
    }
}
