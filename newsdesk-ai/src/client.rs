//! Chat-completion client shared by the classifier and generator calls

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use newsdesk_core::NewsdeskError;
use tracing::warn;

/// Model used for all pipeline calls
const MODEL: &str = "gpt-4o-mini";

/// Attempts per call when the provider reports rate limiting
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff between rate-limited attempts, doubled per retry
const BACKOFF_BASE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new() -> Result<Self, NewsdeskError> {
        // async-openai reads OPENAI_API_KEY from env automatically
        let config = OpenAIConfig::default();
        let client = Client::with_config(config);

        Ok(Self {
            client,
            model: MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Run a chat completion in forced-JSON mode and return the raw content.
    ///
    /// Retries with short exponential backoff when the provider reports rate
    /// limiting; every other error surfaces immediately. A missing response
    /// body is a parse error.
    pub async fn chat_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, NewsdeskError> {
        self.chat(
            system_prompt,
            user_prompt,
            temperature,
            max_tokens,
            Some(ResponseFormat::JsonObject),
        )
        .await
    }

    /// Run a chat completion that returns prose (no response format forced).
    pub async fn chat_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, NewsdeskError> {
        self.chat(system_prompt, user_prompt, temperature, max_tokens, None)
            .await
    }

    async fn chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: Option<u32>,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, NewsdeskError> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| NewsdeskError::internal(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(|e| NewsdeskError::internal(e.to_string()))?
                    .into(),
            ])
            .temperature(temperature);

        if let Some(response_format) = response_format {
            builder.response_format(response_format);
        }
        if let Some(max_tokens) = max_tokens {
            builder.max_tokens(max_tokens);
        }

        let request = builder
            .build()
            .map_err(|e| NewsdeskError::internal(e.to_string()))?;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match self.client.chat().create(request.clone()).await {
                Ok(response) => break response,
                Err(e) if is_rate_limited(&e) && attempt < MAX_ATTEMPTS => {
                    let backoff =
                        Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempt - 1));
                    warn!(
                        "OpenAI rate limited (attempt {}/{}), backing off {:?}",
                        attempt, MAX_ATTEMPTS, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) if is_rate_limited(&e) => {
                    return Err(NewsdeskError::rate_limited(e.to_string()));
                }
                Err(e) => {
                    return Err(NewsdeskError::api(format!("OpenAI API error: {}", e)));
                }
            }
        };

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| NewsdeskError::parse("No response from OpenAI"))?;

        Ok(content.clone())
    }
}

fn is_rate_limited(err: &OpenAIError) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("rate limit") || message.contains("429")
}

/// Extract JSON from a string that might contain markdown code blocks
pub(crate) fn extract_json(content: &str) -> Result<String, NewsdeskError> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try to find raw JSON
    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            return Ok(content[start..=end].to_string());
        }
    }

    Err(NewsdeskError::parse("No JSON found in response"))
}

/// Truncate to at most `max` characters on a char boundary.
///
/// Bounds request cost before content is interpolated into a prompt.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_code_block() {
        let content = "Here you go:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json(content).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_raw() {
        let content = "prefix {\"a\": {\"b\": 2}} suffix";
        assert_eq!(extract_json(content).unwrap(), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_extract_json_missing() {
        assert!(extract_json("no json here").is_err());
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multibyte content must not split a char
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
