//! Grok chat-completions client.
//!
//! One call, one POST: the client serializes the conversation and
//! parameters, attaches the bearer token, sends the request through its
//! `Transport` and classifies the outcome. It holds no mutable state, so a
//! single instance can be shared freely across tasks.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::GrokError;
use crate::transport::{OutgoingRequest, ReqwestTransport, Transport};
use crate::types::{ChatParams, ChatRequest, ChatResponse, Completion, Message, AVAILABLE_MODELS};

pub struct GrokClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl GrokClient<ReqwestTransport> {
    /// Create a client from an explicit key or `XAI_API_KEY`.
    ///
    /// Fails with `GrokError::MissingApiKey` when no key is available. No network
    /// traffic happens here.
    pub fn new(api_key: Option<String>) -> Result<Self, GrokError> {
        Self::from_config(ClientConfig::resolve(api_key)?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, GrokError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> GrokClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    /// Parameters built from the configured defaults.
    pub fn default_params(&self) -> ChatParams {
        self.config.defaults.params(None)
    }

    /// Send `messages` and return the first choice's text.
    pub async fn chat_completion(
        &self,
        messages: &[Message],
        params: &ChatParams,
    ) -> Result<String, GrokError> {
        self.chat_completion_with_usage(messages, params)
            .await
            .map(|c| c.content)
    }

    /// Like `chat_completion`, but also returns token usage.
    pub async fn chat_completion_with_usage(
        &self,
        messages: &[Message],
        params: &ChatParams,
    ) -> Result<Completion, GrokError> {
        let body = self.execute(messages, params).await?;
        let response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GrokError::Decode(format!("invalid JSON: {e}")))?;

        let content = response
            .first_content()
            .ok_or_else(|| GrokError::Decode("response contained no message content".into()))?
            .to_string();
        let usage = response.usage.unwrap_or_default();

        debug!(
            model = response.model.as_deref().unwrap_or(&params.model),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Chat completion succeeded"
        );

        Ok(Completion {
            content,
            usage,
            model: response.model,
        })
    }

    /// Send `messages` and return the response JSON untouched.
    pub async fn chat_completion_raw(
        &self,
        messages: &[Message],
        params: &ChatParams,
    ) -> Result<Value, GrokError> {
        let body = self.execute(messages, params).await?;
        serde_json::from_str(&body).map_err(|e| GrokError::Decode(format!("invalid JSON: {e}")))
    }

    /// Single-turn query, preceded by the configured system prompt if any.
    pub async fn simple_query(&self, prompt: &str, model: Option<&str>) -> Result<String, GrokError> {
        let messages = self.single_turn(prompt);
        self.chat_completion(&messages, &self.config.defaults.params(model))
            .await
    }

    pub async fn simple_query_with_usage(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<Completion, GrokError> {
        let messages = self.single_turn(prompt);
        self.chat_completion_with_usage(&messages, &self.config.defaults.params(model))
            .await
    }

    /// Continue `history` with a new user turn.
    ///
    /// `history` is left as it was; append the reply yourself to keep the
    /// conversation going.
    pub async fn conversational_chat(
        &self,
        history: &[Message],
        new_message: &str,
        model: Option<&str>,
    ) -> Result<String, GrokError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(Message::user(new_message));
        self.chat_completion(&messages, &self.config.defaults.params(model))
            .await
    }

    fn single_turn(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(prompt));
        messages
    }

    /// Build the outgoing request. Fails before any I/O on an empty conversation.
    pub fn build_request(
        &self,
        messages: &[Message],
        params: &ChatParams,
    ) -> Result<OutgoingRequest, GrokError> {
        Ok(OutgoingRequest {
            url: self.config.endpoint(),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key()),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: build_body(messages, params)?,
        })
    }

    /// Perform the POST and return the body of a successful response.
    async fn execute(&self, messages: &[Message], params: &ChatParams) -> Result<String, GrokError> {
        let request = self.build_request(messages, params)?;

        debug!(model = %params.model, messages = messages.len(), "Sending chat completion");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Grok request did not complete");
            e
        })?;

        if response.is_success() {
            return Ok(response.body);
        }

        warn!(status = response.status, model = %params.model, "Grok API returned an error");
        Err(GrokError::from_status(
            response.status,
            response.body,
            response.retry_after,
        ))
    }
}

/// Serialize the request body: typed fields first, then passthrough extras
/// that do not collide with them.
pub fn build_body(messages: &[Message], params: &ChatParams) -> Result<Value, GrokError> {
    if messages.is_empty() {
        return Err(GrokError::InvalidRequest(
            "messages must contain at least one entry".into(),
        ));
    }

    let request = ChatRequest {
        model: &params.model,
        messages,
        temperature: params.temperature,
        max_tokens: params.max_tokens,
    };
    let mut body = serde_json::to_value(&request)
        .map_err(|e| GrokError::InvalidRequest(format!("failed to serialize request: {e}")))?;

    if let Value::Object(map) = &mut body {
        for (key, value) in &params.extra {
            if map.contains_key(key) {
                warn!(key = %key, "Ignoring passthrough parameter that shadows a required field");
                continue;
            }
            map.insert(key.clone(), value.clone());
        }
    }

    Ok(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
