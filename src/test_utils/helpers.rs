use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::errors::PixelleError;
use crate::llm_client::LlmBackend;
use crate::models::model_list::{Model, ModelList};
use crate::models::request;
use crate::models::response_direct::{ChatCompletion, Choice, ChoiceMessage};
use crate::models::{FinishReason, Usage};

pub fn create_test_llm_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        model: "test-model".to_string(),
        api_key_from_env: false,
    }
}

pub fn create_test_completion(content: Option<&str>) -> ChatCompletion {
    ChatCompletion {
        id: "chatcmpl-test-1".to_string(),
        object: "chat.completion".to_string(),
        created: 0,
        model: "test-model".to_string(),
        choices: vec![Choice {
            index: 0,
            message: ChoiceMessage {
                role: Some("assistant".to_string()),
                content: content.map(str::to_string),
            },
            finish_reason: Some(FinishReason::Stop),
        }],
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Backend answering every chat with the same content.
pub struct StaticBackend {
    content: String,
    calls: AtomicUsize,
}

impl StaticBackend {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmBackend for StaticBackend {
    async fn chat(
        &self,
        _request: &request::ChatCompletionCreate,
    ) -> Result<ChatCompletion, PixelleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(create_test_completion(Some(&self.content)))
    }

    async fn list_models(&self) -> Result<ModelList, PixelleError> {
        Ok(ModelList {
            data: vec![Model {
                id: "test-model".to_string(),
                object: Some("model".to_string()),
                created: None,
                owned_by: None,
            }],
        })
    }
}

/// Creates `<root>/<relative>` with `content`, making parent folders.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
