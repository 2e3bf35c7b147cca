//! A client for a location forecast service that renders short weather
//! reports for a coordinate.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
pub mod proto;
pub mod report;
mod request;

use std::sync::Arc;

use reqwest::{Client, StatusCode, Url, header};

pub use config::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, ForecastConfig, ForecastConfigBuilder,
};
use proto::LocationForecast;
pub use request::{ForecastRequest, Units};

/// Error type for [`ForecastClient`].
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// The latitude is outside -90..=90.
    #[error("Latitude must be between -90 and 90 degrees. Got: {0}")]
    InvalidLatitude(f64),

    /// The longitude is outside -180..=180.
    #[error("Longitude must be between -180 and 180 degrees. Got: {0}")]
    InvalidLongitude(f64),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid forecast endpoint: {0}")]
    InvalidEndpoint(String),

    /// The provider answered 429.
    #[error(
        "Weather API rate limit exceeded. Please try again in a few moments."
    )]
    RateLimited,

    /// The provider answered with another non-200 status.
    #[error("Weather API error: HTTP {0}. Unable to fetch forecast.")]
    Http(u16),

    /// The request did not complete.
    #[error(
        "Network error while fetching weather data: {0}. \
         Please check your connection and try again."
    )]
    Network(String),

    /// The response body is not a forecast document.
    #[error(
        "Error parsing weather data: {0}. \
         The API response format may have changed."
    )]
    Parse(String),

    /// The forecast document has an empty time series.
    #[error("No forecast data available for this location.")]
    NoData,
}

impl ForecastError {
    /// Returns whether the request was rejected before any network I/O.
    #[inline]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidLatitude(_)
                | ForecastError::InvalidLongitude(_)
        )
    }

    /// Returns whether the same request may succeed later.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, ForecastError::RateLimited | ForecastError::Network(_))
    }
}

/// Forecast service client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ForecastClient {
    client: Client,
    config: Arc<ForecastConfig>,
}

impl ForecastClient {
    /// Creates a new `ForecastClient` with the given configuration.
    #[inline]
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Validates the request, fetches the forecast and renders the report.
    ///
    /// Invalid coordinates are reported without contacting the provider.
    pub fn forecast(
        &self,
        req: ForecastRequest,
    ) -> impl Future<Output = Result<String, ForecastError>> + Send + use<>
    {
        let fetch = req.validate().map(|()| self.fetch(&req));
        async move {
            let forecast = fetch?.await?;
            report::format_report(&forecast, &req)
        }
    }

    /// Fetches the raw forecast document for a coordinate.
    pub fn fetch(
        &self,
        req: &ForecastRequest,
    ) -> impl Future<Output = Result<LocationForecast, ForecastError>>
    + Send
    + use<> {
        let resp_fut = self.request_url(req).map(|url| {
            trace!("fetching forecast: {url}");
            self.client
                .get(url)
                .header(header::USER_AGENT, &self.config.user_agent)
                .header(header::ACCEPT, "application/json")
                .timeout(self.config.timeout)
                .send()
        });

        async move {
            let resp = resp_fut?
                .await
                .map_err(|err| ForecastError::Network(error_chain(&err)))?;

            match resp.status() {
                StatusCode::OK => {}
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!("forecast provider rate limit hit");
                    return Err(ForecastError::RateLimited);
                }
                status => {
                    debug!("forecast provider answered {status}");
                    return Err(ForecastError::Http(status.as_u16()));
                }
            }

            let body = resp
                .bytes()
                .await
                .map_err(|err| ForecastError::Network(error_chain(&err)))?;
            serde_json::from_slice(&body)
                .map_err(|err| ForecastError::Parse(err.to_string()))
        }
    }

    fn request_url(&self, req: &ForecastRequest) -> Result<Url, ForecastError> {
        let mut url = Url::parse(&self.config.endpoint)
            .map_err(|err| ForecastError::InvalidEndpoint(err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("lat", &req.latitude.to_string())
                .append_pair("lon", &req.longitude.to_string());
            if let Some(altitude) = req.altitude {
                query.append_pair("altitude", &altitude.to_string());
            }
        }
        Ok(url)
    }
}

impl Default for ForecastClient {
    #[inline]
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

/// Formats an error with its sources, since transport errors keep the
/// useful part (DNS failure, refused connection) in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}
