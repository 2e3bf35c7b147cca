use std::time::Duration;

/// The public yr.no compact location forecast endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.met.no/weatherapi/locationforecast/2.0/compact";

/// The provider rejects anonymous clients, so every request identifies
/// itself with this agent unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str =
    concat!("travel-tools/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`ForecastConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ForecastConfigBuilder {
    endpoint: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ForecastConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom forecast endpoint.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the `User-Agent` sent with every request.
    #[inline]
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the total request timeout.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ForecastConfig {
        ForecastConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

/// Configuration for [`ForecastClient`](crate::ForecastClient).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForecastConfig {
    pub(crate) endpoint: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
}

impl ForecastConfig {
    /// Returns the forecast endpoint.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the `User-Agent` header value.
    #[inline]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ForecastConfig {
    #[inline]
    fn default() -> Self {
        ForecastConfigBuilder::new().build()
    }
}
