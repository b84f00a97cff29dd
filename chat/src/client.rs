//! # Chat Client
//!
//! The model-serving edge of the conversation loop. Everything above it
//! (chain, summarizer) talks to the [`ChatClient`] trait, so tests run
//! against a mock and the network client stays swappable.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use dialog_core::{DialogError, Result};

/// A chat-completion capable model endpoint.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Requests a completion for `prompt`, optionally under a system message.
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String>;
}

/// [`ChatClient`] backed by an OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            model,
        }
    }

    /// For OpenAI-compatible providers behind a different base url (Azure
    /// gateways, local servers).
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| DialogError::Client(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| DialogError::Client(e.to_string()))?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .build()
            .map_err(|e| DialogError::Client(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| DialogError::Client(e.to_string()))?;

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => Err(DialogError::Client(
                "no completion choices returned".to_string(),
            )),
        }
    }
}
