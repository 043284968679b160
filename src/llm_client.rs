use async_trait::async_trait;
use reqwest::Response;

use crate::errors::PixelleError;
use crate::models::model_list::ModelList;
use crate::models::request;
use crate::models::response_direct::ChatCompletion;

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn chat(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<ChatCompletion, PixelleError>;

    async fn list_models(&self) -> Result<ModelList, PixelleError>;
}

/// OpenAI-compatible client (OpenAI, Qwen/DashScope, DeepSeek, ...).
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn check_status(response: Response) -> Result<Response, PixelleError> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PixelleError::ApiError(format!(
                "status {status}, text {text}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn chat(
        &self,
        request: &request::ChatCompletionCreate,
    ) -> Result<ChatCompletion, PixelleError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, "/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let body = Self::check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn list_models(&self) -> Result<ModelList, PixelleError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, "/models"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let body = Self::check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
