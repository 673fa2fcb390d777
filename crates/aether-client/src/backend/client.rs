//! Backend HTTP client struct and shared request plumbing.

use reqwest::RequestBuilder;

use crate::protocol::ErrorBody;
use crate::ApiError;

use super::config::ApiConfig;

/// HTTP client for the Aether backend REST API.
pub struct HttpBackend {
    pub(crate) config: ApiConfig,
    pub(crate) http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Replace the bearer token after login/logout.
    pub fn set_token(&mut self, token: Option<String>) {
        self.config.token = token;
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Attach the bearer token when one is configured.
    pub(crate) fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-2xx response into `ApiError::Api`, using the body's
    /// `detail` field when present and `fallback` otherwise.
    pub(crate) async fn error_from_response(
        response: reqwest::Response,
        fallback: &str,
    ) -> ApiError {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Api(detail)
    }
}
