//! Reqwest-based client for the Gemini API.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, Response};
use url::Url;

use super::api::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use super::{Error, GeminiConfig, TRACING_TARGET};
use crate::{
    AnswerRequest, AssistantProvider, AssistantResponse, AssistantService, ServiceHealth,
    SummarizeRequest,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Inner client that holds the HTTP client and configuration.
struct GeminiClientInner {
    http: Client,
    api_key: String,
    model_url: Url,
    config: GeminiConfig,
}

/// Gemini client implementing [`AssistantProvider`].
///
/// # Examples
///
/// ```rust,ignore
/// use docflow_assistant::gemini::{GeminiClient, GeminiConfig};
///
/// let client = GeminiClient::new(GeminiConfig::default().with_api_key(key))?;
/// let health = client.health_check().await?;
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// Fails with `Configuration` when the API key is missing or the base
    /// URL is invalid.
    pub fn new(config: GeminiConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| crate::Error::configuration().with_message("missing Gemini API key"))?;

        let model_url = Self::model_url(&config)?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            model = %config.model,
            url = %model_url,
            timeout_ms = timeout.as_millis(),
            "Creating Gemini client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(|e| {
                crate::Error::configuration()
                    .with_message("failed to create HTTP client")
                    .with_source(e)
            })?;

        let inner = GeminiClientInner {
            http,
            api_key,
            model_url,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.inner.config
    }

    /// Converts this client into an [`AssistantService`].
    pub fn into_service(self) -> AssistantService {
        AssistantService::new(self)
    }

    /// `{base_url}/v1beta/models/{model}`.
    fn model_url(config: &GeminiConfig) -> crate::Result<Url> {
        let raw = format!(
            "{}/v1beta/models/{}",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Url::parse(&raw).map_err(|e| {
            crate::Error::configuration()
                .with_message(format!("invalid Gemini base URL '{}'", config.base_url))
                .with_source(e)
        })
    }

    fn generate_url(&self) -> String {
        format!("{}:generateContent", self.inner.model_url)
    }

    async fn generate(&self, body: &GenerateContentRequest) -> crate::Result<AssistantResponse> {
        let started_at = Instant::now();

        let response = self
            .inner
            .http
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.inner.api_key)
            .json(body)
            .send()
            .await
            .map_err(Error::from)?;

        let response = Self::check_status(response).await?;
        let parsed: GenerateContentResponse = response.json().await.map_err(Error::from)?;
        let response = AssistantResponse::from(parsed);

        tracing::debug!(
            target: TRACING_TARGET,
            model = %self.inner.config.model,
            finish_reason = ?response.finish_reason,
            has_text = response.text.is_some(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Gemini generateContent completed"
        );

        Ok(response)
    }

    /// Turns non-success statuses into errors carrying the API message.
    async fn check_status(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(ErrorResponse { error }) => match error.status {
                Some(code) => format!("{code}: {}", error.message),
                None => error.message,
            },
            Err(_) => body,
        };

        tracing::warn!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            message = %message,
            "Gemini request rejected"
        );

        Err(Error::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl AssistantProvider for GeminiClient {
    async fn summarize(&self, request: &SummarizeRequest) -> crate::Result<AssistantResponse> {
        let body =
            GenerateContentRequest::summarize(request, &self.inner.config.response_language);
        self.generate(&body).await
    }

    async fn answer(&self, request: &AnswerRequest) -> crate::Result<AssistantResponse> {
        let body = GenerateContentRequest::answer(request, &self.inner.config.response_language);
        self.generate(&body).await
    }

    async fn health_check(&self) -> crate::Result<ServiceHealth> {
        let started_at = Instant::now();
        let result = self
            .inner
            .http
            .get(self.inner.model_url.clone())
            .header(API_KEY_HEADER, &self.inner.api_key)
            .send()
            .await;

        let health = match result {
            Ok(response) if response.status().is_success() => ServiceHealth::healthy(),
            Ok(response) => {
                ServiceHealth::unhealthy(format!("model lookup returned {}", response.status()))
            }
            Err(error) => ServiceHealth::unhealthy(error.to_string()),
        };

        Ok(health.with_response_time(started_at.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use docflow_core::ErrorKind;

    use super::*;

    #[test]
    fn test_requires_api_key() {
        let err = GeminiClient::new(GeminiConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = GeminiClient::new(GeminiConfig::default().with_api_key("  ")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_generate_url() {
        let client = GeminiClient::new(GeminiConfig::default().with_api_key("key")).unwrap();
        assert_eq!(
            client.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_base_url_with_path() {
        let config = GeminiConfig::default()
            .with_api_key("key")
            .with_base_url("http://localhost:8080/proxy/")
            .with_model("gemini-2.5-pro");
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.generate_url(),
            "http://localhost:8080/proxy/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = GeminiConfig::default()
            .with_api_key("key")
            .with_base_url("not a url");
        let err = GeminiClient::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
