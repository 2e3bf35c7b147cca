use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use travel_tools_core::tool::{Error as ToolError, Tool, ToolResult};
use travel_tools_forecast::{
    ForecastClient, ForecastError, ForecastRequest, Units,
};

use super::non_blank;

#[derive(Deserialize, JsonSchema)]
pub struct WeatherForecastParameters {
    #[schemars(description = "Latitude in decimal degrees, -90 to 90.")]
    latitude: f64,
    #[schemars(description = "Longitude in decimal degrees, -180 to 180.")]
    longitude: f64,
    #[schemars(
        description = "Optional elevation in meters, improves temperature \
                       accuracy."
    )]
    altitude: Option<i32>,
    #[schemars(description = "Optional location name shown in the report.")]
    location_name: Option<String>,
    #[schemars(
        description = "Temperature units: fahrenheit or celsius. \
                       Default: fahrenheit."
    )]
    units: Option<String>,
}

/// A tool for fetching the weather forecast of a coordinate.
pub struct WeatherForecastTool {
    client: ForecastClient,
    parameter_schema: Value,
}

impl WeatherForecastTool {
    /// Creates a new weather forecast tool using `client`.
    #[inline]
    pub fn new(client: ForecastClient) -> Self {
        WeatherForecastTool {
            client,
            parameter_schema: schema_for!(WeatherForecastParameters)
                .to_value(),
        }
    }
}

impl Tool for WeatherForecastTool {
    type Input = WeatherForecastParameters;

    fn name(&self) -> &str {
        "get_weather_forecast"
    }

    fn description(&self) -> &str {
        r#"
Get weather forecast for any location using latitude and longitude.
Returns current conditions and 3-day forecast."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: WeatherForecastParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let req = ForecastRequest {
            latitude: input.latitude,
            longitude: input.longitude,
            altitude: input.altitude,
            location_name: non_blank(input.location_name),
            units: Units::parse_lenient(input.units.as_deref()),
        };
        let fut = self.client.forecast(req);
        async move { fut.await.map_err(forecast_error) }
    }
}

fn forecast_error(err: ForecastError) -> ToolError {
    if err.is_invalid_input() {
        return ToolError::invalid_input()
            .with_reason(format!("Error: {err}"));
    }
    let tool_err = match &err {
        ForecastError::RateLimited | ForecastError::Network(_) => {
            ToolError::upstream().transient()
        }
        ForecastError::Http(_) => ToolError::upstream(),
        ForecastError::Parse(_) | ForecastError::NoData => {
            ToolError::malformed_response()
        }
        _ => ToolError::execution_error(),
    };
    tool_err.with_reason(err.to_string())
}

#[cfg(test)]
mod tests {
    use travel_tools_core::tool::ErrorKind;
    use travel_tools_forecast::ForecastConfigBuilder;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parameters(latitude: f64, longitude: f64) -> WeatherForecastParameters {
        WeatherForecastParameters {
            latitude,
            longitude,
            altitude: None,
            location_name: None,
            units: None,
        }
    }

    #[test]
    fn test_forecast_error_kinds() {
        let err = forecast_error(ForecastError::InvalidLatitude(95.0));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            err.reason(),
            "Error: Latitude must be between -90 and 90 degrees. Got: 95"
        );

        let err = forecast_error(ForecastError::RateLimited);
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.is_transient());

        let err = forecast_error(ForecastError::Http(500));
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(!err.is_transient());

        let err = forecast_error(ForecastError::NoData);
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_execute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({
                    "properties": { "timeseries": [{
                        "time": "2026-06-01T12:00:00Z",
                        "data": { "instant": { "details": {
                            "air_temperature": 20.0
                        }}}
                    }]}
                }),
            ))
            .expect(1)
            .mount(&server)
            .await;
        let tool = WeatherForecastTool::new(ForecastClient::new(
            ForecastConfigBuilder::new()
                .with_endpoint(format!("{}/compact", server.uri()))
                .build(),
        ));

        let text = tool
            .execute(WeatherForecastParameters {
                location_name: Some(String::new()),
                units: Some("Celsius".to_owned()),
                ..parameters(59.91, 10.75)
            })
            .await
            .unwrap();
        assert!(text.starts_with("**Weather Forecast for the location**"));
        assert!(text.contains("- Temperature: 20.0°C\n"));

        let err = tool.execute(parameters(-91.0, 0.0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
