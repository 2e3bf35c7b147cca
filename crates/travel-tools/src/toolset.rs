use std::pin::Pin;

use serde_json::Value;
use travel_tools_core::{Manager, ToolCall, ToolDefinition, ToolOutput};
use travel_tools_forecast::ForecastClient;
use travel_tools_store::TripStore;

use crate::tools::*;

/// A toolset builder.
///
/// See [`Toolset`].
pub struct ToolsetBuilder {
    store: TripStore,
    forecast_client: Option<ForecastClient>,
}

impl ToolsetBuilder {
    /// Creates a toolset builder whose trip tools use `store`.
    #[inline]
    pub fn with_store(store: TripStore) -> Self {
        Self {
            store,
            forecast_client: None,
        }
    }

    /// Sets the client of the forecast tool. A default client is used
    /// otherwise.
    #[inline]
    pub fn with_forecast_client(mut self, client: ForecastClient) -> Self {
        self.forecast_client = Some(client);
        self
    }

    /// Builds a new toolset.
    pub fn build(self) -> Toolset {
        let store = self.store;
        let mut manager = Manager::default();
        manager.add_tool(WeatherForecastTool::new(
            self.forecast_client.unwrap_or_default(),
        ));
        manager.add_tool(CreateTripTool::new(store.clone()));
        manager.add_tool(AddTaskTool::new(store.clone()));
        manager.add_tool(ListTasksTool::new(store.clone()));
        manager.add_tool(CompleteTaskTool::new(store.clone()));
        manager.add_tool(UpdateTaskTool::new(store.clone()));
        manager.add_tool(DeleteTaskTool::new(store.clone()));
        manager.add_tool(ListTripsTool::new(store));

        debug!("toolset ready with {} tools", manager.definitions().len());
        Toolset { manager }
    }
}

/// All travel planning tools behind one dispatcher.
///
/// This is basically a wrapper around [`Manager`] with every tool of the
/// crate registered.
pub struct Toolset {
    manager: Manager,
}

impl Toolset {
    /// Returns the definitions of all tools, ordered by name.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.manager.definitions()
    }

    /// Invokes a tool by name. The returned future is independent of `self`
    /// and always yields an output.
    #[inline]
    pub fn invoke(
        &self,
        name: &str,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = ToolOutput> + Send>> {
        self.manager.invoke(name, arguments)
    }

    /// Dispatches a batch of tool calls, see [`Manager::handle_requests`].
    #[inline]
    pub fn handle_requests<S>(&self, requests: Vec<ToolCall>, spawner: S)
    where
        S: FnMut(String, Pin<Box<dyn Future<Output = ToolOutput> + Send>>),
    {
        self.manager.handle_requests(requests, spawner);
    }
}
