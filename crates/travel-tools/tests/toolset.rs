use std::collections::HashMap;

use serde_json::{Value, json};
use tempfile::TempDir;
use travel_tools::core::tool::ErrorKind;
use travel_tools::core::{ToolCall, ToolOutput};
use travel_tools::forecast::{ForecastClient, ForecastConfigBuilder};
use travel_tools::store::TripStore;
use travel_tools::{Toolset, ToolsetBuilder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    _dir: TempDir,
    store: TripStore,
    toolset: Toolset,
}

fn fixture(forecast_endpoint: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = TripStore::open(dir.path().join("db/trips.db")).unwrap();
    let client = ForecastClient::new(
        ForecastConfigBuilder::new()
            .with_endpoint(forecast_endpoint)
            .with_user_agent("travel-tools-test/1.0")
            .build(),
    );
    let toolset = ToolsetBuilder::with_store(store.clone())
        .with_forecast_client(client)
        .build();
    Fixture {
        _dir: dir,
        store,
        toolset,
    }
}

async fn call(toolset: &Toolset, name: &str, arguments: Value) -> ToolOutput {
    toolset.invoke(name, arguments).await
}

async fn call_ok(toolset: &Toolset, name: &str, arguments: Value) -> String {
    let output = call(toolset, name, arguments).await;
    assert!(!output.is_error, "{name} failed: {}", output.text_content());
    output.text_content()
}

#[tokio::test]
async fn test_definitions() {
    let fx = fixture("http://127.0.0.1:1/compact");
    let names = fx
        .toolset
        .definitions()
        .into_iter()
        .map(|def| def.name)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "add_task",
            "complete_task",
            "create_trip",
            "delete_task",
            "get_weather_forecast",
            "list_tasks",
            "list_trips",
            "update_task",
        ]
    );

    let forecast = fx
        .toolset
        .definitions()
        .into_iter()
        .find(|def| def.name == "get_weather_forecast")
        .unwrap();
    assert!(!forecast.description.starts_with('\n'));
    let required = forecast.parameters["required"].as_array().unwrap();
    assert!(required.contains(&json!("latitude")));
    assert!(required.contains(&json!("longitude")));
}

#[tokio::test]
async fn test_trip_workflow() {
    let fx = fixture("http://127.0.0.1:1/compact");
    let ts = &fx.toolset;

    let text =
        call_ok(ts, "create_trip", json!({ "trip_name": "My Trip" })).await;
    assert!(text.contains("with ID: my_trip"));
    let text =
        call_ok(ts, "create_trip", json!({ "trip_name": "my-trip" })).await;
    assert!(text.contains("already exists"));

    let text = call_ok(
        ts,
        "add_task",
        json!({
            "trip_id": "my_trip",
            "description": "Book hotel",
            "category": "accommodation",
            "priority": "high",
            "due_date": "2026-06-15"
        }),
    )
    .await;
    assert!(text.starts_with("✓ Added task #1: Book hotel\n"));
    call_ok(
        ts,
        "add_task",
        json!({ "trip_id": "my_trip", "description": "Rent a car" }),
    )
    .await;

    // The round trip keeps every field.
    let text =
        call_ok(ts, "list_tasks", json!({ "trip_id": "my_trip" })).await;
    assert!(text.contains(
        "☐ **#1** Book hotel\n    \
         Category: accommodation | Priority: high | Due: 2026-06-15\n"
    ));
    assert!(text.contains("☐ **#2** Rent a car\n\n"));

    call_ok(ts, "complete_task", json!({ "task_id": 2 })).await;
    let completed_at = fx.store.get_task(2).unwrap().unwrap().completed_at;
    let text = call_ok(ts, "complete_task", json!({ "task_id": 2 })).await;
    assert!(text.contains("already completed"));
    assert_eq!(
        fx.store.get_task(2).unwrap().unwrap().completed_at,
        completed_at
    );

    let pending = call_ok(
        ts,
        "list_tasks",
        json!({ "trip_id": "my_trip", "status": "Pending" }),
    )
    .await;
    assert!(pending.contains("#1"));
    assert!(!pending.contains("#2"));

    let text = call_ok(
        ts,
        "update_task",
        json!({ "task_id": 1, "description": "Book beach hotel" }),
    )
    .await;
    assert_eq!(
        text,
        "✓ Updated task #1\nChanged: description: Book beach hotel"
    );

    let text = call_ok(ts, "list_trips", Value::Null).await;
    assert!(text.contains("**My Trip** (ID: my_trip)"));
    assert!(text.contains("Tasks: 2 total (1 pending, 1 completed)"));

    let text = call_ok(ts, "delete_task", json!({ "task_id": 1 })).await;
    assert_eq!(text, "✓ Deleted task #1: Book beach hotel");
    let text = call_ok(ts, "list_trips", json!({})).await;
    assert!(text.contains("Tasks: 1 total (0 pending, 1 completed)"));
}

#[tokio::test]
async fn test_error_outputs() {
    let fx = fixture("http://127.0.0.1:1/compact");
    let ts = &fx.toolset;

    let output = call(ts, "book_flight", json!({})).await;
    assert!(output.is_error);
    assert!(output.text_content().contains("book_flight"));

    let output = call(ts, "complete_task", json!({ "task_id": "x" })).await;
    assert!(output.is_error);
    assert!(output.text_content().starts_with("Error: invalid arguments"));

    let output = call(
        ts,
        "add_task",
        json!({ "trip_id": "nowhere", "description": "Pack" }),
    )
    .await;
    assert!(output.is_error);
    assert!(output.text_content().contains("Trip 'nowhere' not found"));
    assert!(fx.store.list_trips().unwrap().is_empty());

    call_ok(ts, "create_trip", json!({ "trip_name": "Oslo" })).await;
    call_ok(ts, "add_task", json!({ "trip_id": "oslo", "description": "Pack" }))
        .await;
    let output = call(ts, "update_task", json!({ "task_id": 1 })).await;
    assert!(output.is_error);
    assert!(output.text_content().contains("At least one field"));
    assert_eq!(fx.store.get_task(1).unwrap().unwrap().description, "Pack");

    let output = call(ts, "delete_task", json!({ "task_id": 7 })).await;
    assert!(output.is_error);
    assert_eq!(output.text_content(), "Error: Task #7 not found");
}

#[tokio::test]
async fn test_weather_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/compact"))
        .and(query_param("lat", "36.51"))
        .and(query_param("lon", "-4.88"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": { "timeseries": [{
                "time": "2026-06-01T12:00:00Z",
                "data": {
                    "instant": { "details": {
                        "air_temperature": 20.0,
                        "wind_speed": 2.0,
                        "wind_from_direction": 180.0,
                        "relative_humidity": 40.0
                    }},
                    "next_6_hours": { "summary": { "symbol_code": "fair_day" } }
                }
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let fx = fixture(&format!("{}/compact", server.uri()));

    let text = call_ok(
        &fx.toolset,
        "get_weather_forecast",
        json!({
            "latitude": 36.51,
            "longitude": -4.88,
            "location_name": "Marbella"
        }),
    )
    .await;
    assert!(text.starts_with("**Weather Forecast for Marbella**"));
    assert!(text.contains("- Temperature: 68.0°F (20.0°C)\n"));
    assert!(text.contains("- Conditions: Fair Day\n"));
}

#[tokio::test]
async fn test_weather_forecast_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("lat", "10"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("lat", "20"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let fx = fixture(&format!("{}/compact", server.uri()));
    let ts = &fx.toolset;

    let output = call(
        ts,
        "get_weather_forecast",
        json!({ "latitude": 95, "longitude": 0 }),
    )
    .await;
    assert!(output.is_error);
    assert!(output.text_content().contains("95"));
    assert_eq!(output.error_kind, Some(ErrorKind::InvalidInput));
    assert!(!output.retryable);

    let output =
        call(ts, "get_weather_forecast", json!({ "longitude": 0 })).await;
    assert!(output.is_error);

    let output = call(
        ts,
        "get_weather_forecast",
        json!({ "latitude": 10.0, "longitude": 0 }),
    )
    .await;
    assert!(output.is_error);
    let rate_limited = output.text_content();
    assert!(rate_limited.contains("rate limit"));
    assert_eq!(output.error_kind, Some(ErrorKind::Upstream));
    assert!(output.retryable);
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["error_kind"], "upstream");
    assert_eq!(value["retryable"], true);

    let output = call(
        ts,
        "get_weather_forecast",
        json!({ "latitude": 20.0, "longitude": 0 }),
    )
    .await;
    assert!(output.is_error);
    let http_error = output.text_content();
    assert!(http_error.contains("HTTP 500"));
    assert_eq!(output.error_kind, Some(ErrorKind::Upstream));
    assert!(!output.retryable);
    let value = serde_json::to_value(&output).unwrap();
    assert!(value.get("retryable").is_none());
    assert_ne!(rate_limited, http_error);

    // Only the two valid coordinates reached the provider.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_handle_requests() {
    let fx = fixture("http://127.0.0.1:1/compact");
    let requests = vec![
        ToolCall {
            id: "a".to_owned(),
            name: "create_trip".to_owned(),
            arguments: json!({ "trip_name": "Rome" }),
        },
        ToolCall {
            id: "b".to_owned(),
            name: "no_such_tool".to_owned(),
            arguments: Value::Null,
        },
    ];

    let mut futures = Vec::new();
    fx.toolset.handle_requests(requests, |id, fut| {
        futures.push((id, tokio::spawn(fut)));
    });

    let mut outputs = HashMap::new();
    for (id, handle) in futures {
        outputs.insert(id, handle.await.unwrap());
    }
    assert!(!outputs["a"].is_error);
    assert!(outputs["b"].is_error);
}
