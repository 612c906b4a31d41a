//! REST Agent Service - Implementation of AgentService over the agents REST API.
//!
//! Threads, messages and runs are plain JSON resources under the project
//! endpoint. Every call carries a bearer token from the configured
//! [`CredentialProvider`] and the `api-version` query parameter.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RestAgentConfig::new("https://my-project.services.ai.azure.com/api/projects/demo")
//!     .with_api_version("v1")
//!     .with_poll_interval(Duration::from_millis(500));
//!
//! let service = RestAgentService::new(config, credentials)?;
//! ```
//!
//! # Runs
//!
//! A run is created and then polled until its status leaves the active set.
//! Runs that ask for tool outputs are cancelled, since the gateway registers
//! no tools.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::{
    ConversationId, MessageList, MessageRole, RunResult, TextMessage, ThreadMessage,
};
use crate::ports::{AgentService, AgentServiceError, CredentialProvider};

/// Statuses of a run that is still being worked on.
const ACTIVE_RUN_STATUSES: [&str; 4] = ["queued", "in_progress", "requires_action", "cancelling"];

const REQUIRES_ACTION: &str = "requires_action";

/// Page size used when listing messages.
const MESSAGE_PAGE_LIMIT: &str = "100";

/// Configuration for the REST agent service.
#[derive(Debug, Clone)]
pub struct RestAgentConfig {
    /// Project endpoint all resource paths are appended to.
    pub endpoint: String,
    /// Value of the `api-version` query parameter.
    pub api_version: String,
    /// Delay between run status polls.
    pub poll_interval: Duration,
    /// Scope requested from the credential provider.
    pub token_scope: String,
    /// Optional per-request timeout. `None` waits as long as the service does.
    pub timeout: Option<Duration>,
}

impl RestAgentConfig {
    /// Creates a configuration for the given project endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_version: "v1".to_string(),
            poll_interval: Duration::from_secs(1),
            token_scope: "https://ai.azure.com/.default".to_string(),
            timeout: None,
        }
    }

    /// Sets the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the run polling interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sets the token scope.
    pub fn with_token_scope(mut self, scope: impl Into<String>) -> Self {
        self.token_scope = scope.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Agent service backed by the remote REST API.
pub struct RestAgentService {
    config: RestAgentConfig,
    base_url: Url,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl RestAgentService {
    /// Creates the service with a dedicated HTTP client.
    pub fn new(
        config: RestAgentConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, AgentServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AgentServiceError::network(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(config, client, credentials)
    }

    /// Creates the service around an existing HTTP client.
    pub fn with_client(
        config: RestAgentConfig,
        client: Client,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, AgentServiceError> {
        let base_url = Url::parse(&config.endpoint).map_err(|e| {
            AgentServiceError::parse(format!("Invalid agent endpoint '{}': {}", config.endpoint, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AgentServiceError::parse(format!(
                "Invalid agent endpoint '{}': not a base URL",
                config.endpoint
            )));
        }

        Ok(Self {
            config,
            base_url,
            client,
            credentials,
        })
    }

    /// Appends path segments to the endpoint. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay inside their own segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn run_url(&self, conversation: &ConversationId, run_id: &str) -> Url {
        self.url(&["threads", conversation.as_str(), "runs", run_id])
    }

    /// Authenticates and sends a request, then decodes a success body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AgentServiceError> {
        let token = self.credentials.get_token(&self.config.token_scope).await?;

        let response = request
            .query(&[("api-version", self.config.api_version.as_str())])
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentServiceError::network(format!("Request timed out: {}", e))
                } else if e.is_connect() {
                    AgentServiceError::network(format!("Connection failed: {}", e))
                } else {
                    AgentServiceError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentServiceError::status(
                status.as_u16(),
                Self::error_message(&body),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AgentServiceError::parse(format!("Failed to parse response: {}", e)))
    }

    /// Pulls `error.message` out of an error body, or returns the body as is.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|parsed| {
                parsed
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string())
    }

    fn is_active(status: Option<&str>) -> bool {
        status.is_some_and(|s| ACTIVE_RUN_STATUSES.contains(&s))
    }

    async fn cancel_run(
        &self,
        conversation: &ConversationId,
        run_id: &str,
    ) -> Result<RunObject, AgentServiceError> {
        let url = self.url(&["threads", conversation.as_str(), "runs", run_id, "cancel"]);
        self.send(self.client.post(url).json(&serde_json::json!({})))
            .await
    }
}

#[async_trait]
impl AgentService for RestAgentService {
    async fn create_conversation(&self) -> Result<ConversationId, AgentServiceError> {
        let thread: ThreadObject = self
            .send(self.client.post(self.url(&["threads"])).json(&serde_json::json!({})))
            .await?;
        Ok(ConversationId::new(thread.id))
    }

    async fn append_message(
        &self,
        conversation: &ConversationId,
        role: &MessageRole,
        content: &str,
    ) -> Result<(), AgentServiceError> {
        let body = CreateMessageBody {
            role: role.as_str(),
            content,
        };
        let url = self.url(&["threads", conversation.as_str(), "messages"]);
        let _: IgnoredAny = self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn create_and_process_run(
        &self,
        conversation: &ConversationId,
        agent_id: &str,
    ) -> Result<RunResult, AgentServiceError> {
        let url = self.url(&["threads", conversation.as_str(), "runs"]);
        let mut run: RunObject = self
            .send(self.client.post(url).json(&CreateRunBody {
                assistant_id: agent_id,
            }))
            .await?;
        tracing::debug!(run_id = %run.id, status = ?run.status, "Run created");

        let mut cancel_sent = false;
        while Self::is_active(run.status.as_deref()) {
            // The status can lag behind an accepted cancel; cancel only once.
            if run.status.as_deref() == Some(REQUIRES_ACTION) && !cancel_sent {
                tracing::warn!(run_id = %run.id, "Run requested tool outputs, cancelling");
                run = self.cancel_run(conversation, &run.id).await?;
                cancel_sent = true;
            }

            sleep(self.config.poll_interval).await;
            run = self
                .send(self.client.get(self.run_url(conversation, &run.id)))
                .await?;
        }

        if let Some(error) = &run.last_error {
            tracing::warn!(
                run_id = %run.id,
                code = error.code.as_deref().unwrap_or(""),
                "Run ended with error: {}",
                error.message.as_deref().unwrap_or("")
            );
        }

        Ok(RunResult {
            id: Some(run.id),
            status: run.status,
        })
    }

    async fn list_messages(
        &self,
        conversation: &ConversationId,
    ) -> Result<MessageList, AgentServiceError> {
        let url = self.url(&["threads", conversation.as_str(), "messages"]);
        let mut data = Vec::new();
        let mut text_messages: Option<Vec<TextMessage>> = None;
        let mut after: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(url.clone())
                .query(&[("order", "asc"), ("limit", MESSAGE_PAGE_LIMIT)]);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let page: MessagePage = self.send(request).await?;
            if let Some(view) = page.text_messages {
                text_messages.get_or_insert_with(Vec::new).extend(view);
            }
            data.extend(page.data);

            match (page.has_more, page.last_id) {
                (true, Some(last_id)) => after = Some(last_id),
                _ => break,
            }
        }

        Ok(MessageList {
            data,
            text_messages,
        })
    }
}

// ----- Agents API Types -----

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageBody<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunBody<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
struct RunError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagePage {
    #[serde(default)]
    data: Vec<ThreadMessage>,
    #[serde(default)]
    text_messages: Option<Vec<TextMessage>>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}
