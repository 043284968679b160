use crate::config::LlmConfig;
use crate::errors::PixelleError;
use crate::llm_client::LlmBackend;
use crate::models::request::{ChatCompletionCreate, Message};
use crate::models::response_direct::ChatCompletion;

pub(crate) const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that writes concise narration for short videos.";

pub fn validate_prompt(prompt: &str) -> Result<(), PixelleError> {
    if prompt.trim().is_empty() {
        return Err(PixelleError::ValidationError(
            "error: empty prompt".to_string(),
        ));
    }
    Ok(())
}

pub fn build_chat_request(
    config: &LlmConfig,
    system: Option<&str>,
    prompt: &str,
    max_tokens: Option<i32>,
) -> ChatCompletionCreate {
    let system = system
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    ChatCompletionCreate {
        model: config.model.clone(),
        messages: vec![
            Message::System {
                content: system.to_string(),
            },
            Message::User {
                content: prompt.to_string(),
            },
        ],
        max_tokens,
        temperature: None,
        stream: Some(false),
    }
}

pub fn extract_content(completion: &ChatCompletion) -> Result<String, PixelleError> {
    let choice = completion
        .choices
        .first()
        .ok_or_else(|| PixelleError::ParseError("error: no choices in response".to_string()))?;
    choice
        .message
        .content
        .as_deref()
        .map(|content| content.trim().to_string())
        .ok_or_else(|| PixelleError::ParseError("error: choice has no content".to_string()))
}

pub async fn complete(
    backend: &dyn LlmBackend,
    config: &LlmConfig,
    system: Option<&str>,
    prompt: &str,
    max_tokens: Option<i32>,
) -> Result<String, PixelleError> {
    validate_prompt(prompt)?;
    let request = build_chat_request(config, system, prompt, max_tokens);
    log::debug!("llm request: {:?}", request);

    let completion = backend.chat(&request).await?;
    if let Some(usage) = &completion.usage {
        log::debug!(
            "llm usage: prompt={} completion={}",
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }
    extract_content(&completion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::helpers::{create_test_completion, create_test_llm_config};

    #[test]
    fn test_validate_prompt() {
        assert!(validate_prompt("a topic").is_ok());
        assert!(matches!(
            validate_prompt("  \n"),
            Err(PixelleError::ValidationError(_))
        ));
    }

    #[test]
    fn test_build_chat_request_default_system() {
        let config = create_test_llm_config("http://localhost:9999");
        let request = build_chat_request(&config, None, "Why reading matters", Some(200));

        assert_eq!(request.model, "test-model");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(
            request.messages[1],
            Message::User {
                content: "Why reading matters".to_string()
            }
        );
        assert_eq!(request.max_tokens, Some(200));
        assert_eq!(request.stream, Some(false));
    }

    #[test]
    fn test_build_chat_request_custom_system() {
        let config = create_test_llm_config("http://localhost:9999");
        let request = build_chat_request(&config, Some("Be brief."), "x", None);
        assert_eq!(request.messages[0].content(), "Be brief.");
    }

    #[test]
    fn test_extract_content() {
        let completion = create_test_completion(Some("  Hello there \n"));
        assert_eq!(extract_content(&completion).unwrap(), "Hello there");

        let completion = create_test_completion(None);
        assert!(matches!(
            extract_content(&completion),
            Err(PixelleError::ParseError(_))
        ));

        let mut completion = create_test_completion(Some("x"));
        completion.choices.clear();
        assert!(extract_content(&completion).is_err());
    }

    #[tokio::test]
    async fn test_complete_uses_backend() {
        use crate::test_utils::helpers::StaticBackend;

        let backend = StaticBackend::new("Generated narration");
        let config = create_test_llm_config("http://unused");
        let content = complete(&backend, &config, None, "topic", None)
            .await
            .unwrap();
        assert_eq!(content, "Generated narration");
        assert_eq!(backend.calls(), 1);
    }
}
