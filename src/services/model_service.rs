use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::prompt_builder::BuiltPrompt,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl From<BuiltPrompt> for CompletionRequest {
    fn from(prompt: BuiltPrompt) -> Self {
        Self {
            system: Some(prompt.system.to_string()),
            prompt: prompt.user,
            max_tokens: Some(prompt.max_tokens),
            temperature: Some(prompt.temperature),
        }
    }
}

/// Boundary to the hosted completion API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Returns the trimmed text of the first choice.
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}

pub struct OpenAiGateway {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiGateway {
    pub fn new(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());
        if let Some(api_base) = &config.openai_api_base {
            openai_config = openai_config.with_api_base(api_base);
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        log::debug!(
            "Calling completion API with model {} ({} prompt chars)",
            self.model_name,
            request.prompt.chars().count()
        );

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            let system_message = ChatCompletionRequestSystemMessageArgs::default()
                .content(system.as_str())
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_message));
        }
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_message));

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model_name).messages(messages);
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        let chat_request = builder.build()?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            log::error!("Completion API call failed: {}", e);
            AppError::from(e)
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AppError::GatewayError(
                "The AI service returned an empty response".to_string(),
            ));
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prompt_builder::{build, PromptTask};

    #[test]
    fn built_prompt_converts_to_request() {
        let prompt = build(&PromptTask::MultipleApproaches { concept: "gravity" });
        let request = CompletionRequest::from(prompt.clone());

        assert_eq!(request.system.as_deref(), Some(prompt.system));
        assert_eq!(request.prompt, prompt.user);
        assert_eq!(request.max_tokens, Some(3000));
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn gateway_uses_configured_model() {
        let config = Config::test_config();
        let gateway = OpenAiGateway::new(&config);
        assert_eq!(gateway.model_name(), config.model_name);
    }

    #[tokio::test]
    async fn mock_gateway_returns_configured_text() {
        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .withf(|request| request.prompt.contains("gravity"))
            .times(1)
            .returning(|_| Ok("Things fall down.".to_string()));

        let text = gateway
            .complete(CompletionRequest {
                system: None,
                prompt: "Explain gravity".to_string(),
                max_tokens: None,
                temperature: None,
            })
            .await
            .expect("mock should answer");

        assert_eq!(text, "Things fall down.");
    }
}
