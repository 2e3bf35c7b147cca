use std::collections::BTreeMap;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

use crate::Tool;
use crate::tool::object::{ToolObject, ToolObjectImpl};
use crate::tool::{Error, ToolOutput};

type BoxedOutputFuture = Pin<Box<dyn Future<Output = ToolOutput> + Send>>;

/// Describes a tool so that the orchestrator can offer it to a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// JSON schema of the tool parameters.
    pub parameters: Value,
}

/// A request to call a tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// The unique identifier for the call, echoed back with the result.
    pub id: String,
    /// Name of the tool to call.
    pub name: String,
    /// The arguments, which must match the tool's parameter schema.
    #[serde(default)]
    pub arguments: Value,
}

/// An object that manages the toolset and dispatches invocations.
///
/// Dispatching never fails: unknown tools, malformed arguments and tool
/// errors are all turned into error [`ToolOutput`]s.
#[derive(Default)]
pub struct Manager {
    tools: BTreeMap<String, Box<dyn ToolObject>>,
}

impl Manager {
    /// Registers a tool, replacing any tool with the same name.
    pub fn add_tool<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_owned();
        if self
            .tools
            .insert(name.clone(), Box::new(ToolObjectImpl(tool)))
            .is_some()
        {
            warn!("tool `{name}` registered twice, keeping the last one");
        }
    }

    /// Returns the definitions of all registered tools, ordered by name.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_owned(),
                description: tool.description().trim().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    /// Invokes a tool by name.
    ///
    /// The returned future is independent of `self`.
    pub fn invoke(&self, name: &str, arguments: Value) -> BoxedOutputFuture {
        let Some(tool) = self.tools.get(name) else {
            warn!("tool not found: {name}");
            let err = Error::invalid_input()
                .with_reason(format!("Error: unknown tool `{name}`"));
            return Box::pin(std::future::ready(ToolOutput::error(&err)));
        };

        trace!("invoking tool `{name}` with args: {arguments:?}");
        let fut = tool.execute(arguments);
        let name = name.to_owned();
        Box::pin(
            async move {
                let result = fut.await;
                if let Err(err) = &result {
                    debug!(
                        "tool `{name}` failed ({:?}, transient: {}): {}",
                        err.kind(),
                        err.is_transient(),
                        err.reason()
                    );
                }
                ToolOutput::from(result)
            }
            .instrument(debug_span!("tool manager")),
        )
    }

    /// Hands one future per request to `spawner`, tagged with the request
    /// id. Every request gets a future, including those naming unknown
    /// tools.
    pub fn handle_requests<S>(&self, requests: Vec<ToolCall>, spawner: S)
    where
        S: FnMut(String, BoxedOutputFuture),
    {
        let mut spawner = spawner;

        let span = debug_span!("tool manager");
        let _enter = span.enter();

        for req in requests {
            let id = req.id;
            trace!("spawning a tool ({id}): {}", req.name);
            spawner(id, self.invoke(&req.name, req.arguments));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::tool::{ContentBlock, ErrorKind, ToolResult};

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
    }

    struct EchoTool;

    impl Tool for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "\nEchoes the input back."
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            if input.text.is_empty() {
                return ready(Err(
                    Error::invalid_input().with_reason("text is required")
                ));
            }
            ready(Ok(input.text))
        }
    }

    #[tokio::test]
    async fn test_invoke() {
        let mut manager = Manager::default();
        manager.add_tool(EchoTool);

        let output = manager.invoke("echo", json!({ "text": "hello" })).await;
        assert!(!output.is_error);
        assert_eq!(
            output.content,
            vec![ContentBlock::Text {
                text: "hello".to_owned()
            }]
        );

        let output = manager.invoke("echo", json!({ "text": "" })).await;
        assert!(output.is_error);
        assert_eq!(output.error_kind, Some(ErrorKind::InvalidInput));
        assert_eq!(output.text_content(), "text is required");
    }

    #[tokio::test]
    async fn test_invoke_malformed_arguments() {
        let mut manager = Manager::default();
        manager.add_tool(EchoTool);

        let output = manager.invoke("echo", json!({ "txt": "hello" })).await;
        assert!(output.is_error);
        assert!(output.text_content().contains("text"));

        let output = manager.invoke("echo", Value::Null).await;
        assert!(output.is_error);
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let manager = Manager::default();
        let output = manager.invoke("read_tool", json!({})).await;
        assert!(output.is_error);
        assert!(output.text_content().contains("read_tool"));
    }

    #[test]
    fn test_definitions() {
        let mut manager = Manager::default();
        manager.add_tool(EchoTool);

        let definitions = manager.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "echo");
        assert_eq!(definitions[0].description, "Echoes the input back.");
    }

    #[test]
    fn test_handle_requests() {
        let mut manager = Manager::default();
        manager.add_tool(EchoTool);

        let requests = vec![
            ToolCall {
                id: "tool:1".to_owned(),
                name: "echo".to_owned(),
                arguments: json!({ "text": "hi" }),
            },
            ToolCall {
                id: "tool:2".to_owned(),
                name: "read_tool".to_owned(),
                arguments: json!({}),
            },
        ];

        let mut spawned_ids: Vec<String> = vec![];
        manager.handle_requests(requests, |id, _future| {
            spawned_ids.push(id);
        });

        assert_eq!(spawned_ids, vec!["tool:1", "tool:2"]);
    }
}
