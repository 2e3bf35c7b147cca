use std::fmt::Write as _;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use travel_tools_core::tool::{Tool, ToolResult};
use travel_tools_store::{TripCreation, TripStore, TripSummary};

use super::with_store;

#[derive(Deserialize, JsonSchema)]
pub struct CreateTripParameters {
    #[schemars(
        description = "Name of the trip, e.g. \"Summer 2026 Marbella\"."
    )]
    trip_name: String,
}

/// A tool for creating trips.
pub struct CreateTripTool {
    store: TripStore,
    parameter_schema: Value,
}

impl CreateTripTool {
    /// Creates a new create trip tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        CreateTripTool {
            store,
            parameter_schema: schema_for!(CreateTripParameters).to_value(),
        }
    }
}

impl Tool for CreateTripTool {
    type Input = CreateTripParameters;

    fn name(&self) -> &str {
        "create_trip"
    }

    fn description(&self) -> &str {
        r#"
Create a new trip to organize planning tasks.
Returns the trip_id for adding tasks."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: CreateTripParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        let trip_name = input.trip_name;
        async move {
            let name = trip_name.clone();
            let creation = with_store(store, "creating trip", move |store| {
                store.create_trip(&name)
            })
            .await?;

            Ok(match creation {
                TripCreation::Created(trip) => format!(
                    "✓ Created trip '{}' with ID: {}\n\n\
                     You can now add tasks using this trip_id.",
                    trip.trip_name, trip.trip_id
                ),
                TripCreation::Existing(trip) => format!(
                    "Trip '{trip_name}' already exists with ID: {}",
                    trip.trip_id
                ),
            })
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct ListTripsParameters {}

/// A tool for listing trips with their task counts.
pub struct ListTripsTool {
    store: TripStore,
    parameter_schema: Value,
}

impl ListTripsTool {
    /// Creates a new list trips tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        ListTripsTool {
            store,
            parameter_schema: schema_for!(ListTripsParameters).to_value(),
        }
    }
}

impl Tool for ListTripsTool {
    type Input = ListTripsParameters;

    fn name(&self) -> &str {
        "list_trips"
    }

    fn description(&self) -> &str {
        "List all trips with task counts."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        _input: ListTripsParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        async move {
            let trips =
                with_store(store, "listing trips", |store| store.list_trips())
                    .await?;
            Ok(render_trips(&trips))
        }
    }
}

fn render_trips(trips: &[TripSummary]) -> String {
    if trips.is_empty() {
        return "No trips found. Create a trip using create_trip to get \
                started!"
            .to_owned();
    }

    let mut text = String::from("**Your Trips:**\n\n");
    for summary in trips {
        let trip = &summary.trip;
        write!(
            text,
            "**{}** (ID: {})\n  Created: {}\n  \
             Tasks: {} total ({} pending, {} completed)\n\n",
            trip.trip_name,
            trip.trip_id,
            trip.created_at,
            summary.total,
            summary.pending,
            summary.completed
        )
        .ok();
    }
    text
}
