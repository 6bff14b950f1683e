//! `reqwest`-backed implementation of [`PlanApi`].

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    ApiError, DailyWorkoutRequest, DailyWorkoutResponse, GeneratePlanRequest, PlanApi,
    PlanResponse, decode_envelope,
};

const PLAN_PATH: &str = "generate_plan";
const WORKOUT_PATH: &str = "generate_daily_workout";

/// HTTP basic-auth credentials for the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the backend lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the endpoints hang off, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Sent on every request when present.
    pub credentials: Option<Credentials>,
}

impl ClientConfig {
    pub const DEFAULT_URL: &str = "http://localhost:8080";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// JSON-over-HTTP client for the generation backend.
///
/// No request timeout is configured: generation can take minutes and a slow
/// backend simply leaves the caller waiting until the response settles.
pub struct HttpPlanClient {
    http: Client,
    config: ClientConfig,
}

impl HttpPlanClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("genexium/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");

        let mut request = self.http.post(&url).json(body);
        if let Some(creds) = &self.config.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!(%url, "backend rejected credentials");
        }
        debug!(%url, status = status.as_u16(), len = bytes.len(), "response received");

        decode_envelope(status.as_u16(), status.is_success(), &bytes)
    }
}

#[async_trait]
impl PlanApi for HttpPlanClient {
    async fn generate_plan(&self, request: &GeneratePlanRequest) -> Result<PlanResponse, ApiError> {
        self.post_json(PLAN_PATH, request).await
    }

    async fn generate_daily_workout(
        &self,
        request: &DailyWorkoutRequest,
    ) -> Result<DailyWorkoutResponse, ApiError> {
        self.post_json(WORKOUT_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = ClientConfig::new("http://localhost:8080/");
        assert_eq!(cfg.endpoint("generate_plan"), "http://localhost:8080/generate_plan");

        let cfg = ClientConfig::new("https://genexium.example.com/app");
        assert_eq!(
            cfg.endpoint("generate_daily_workout"),
            "https://genexium.example.com/app/generate_daily_workout"
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let cfg = ClientConfig::new(ClientConfig::DEFAULT_URL).with_credentials("admin", "hunter2");
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    }
}
