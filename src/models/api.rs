use std::collections::{BTreeMap, HashMap};

use serde::{self, Deserialize, Serialize};
use serde_json::Value;

use crate::frame::FrameInput;
use crate::templates::TemplateParam;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FrameRenderRequest {
    pub template: String,
    #[serde(default)]
    pub title: Option<String>,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ext: HashMap<String, Value>,
    #[serde(default)]
    pub template_params: HashMap<String, Value>,
}

impl FrameRenderRequest {
    pub fn to_input(&self) -> FrameInput {
        FrameInput {
            title: self.title.clone(),
            text: self.text.clone(),
            image: self.image.clone(),
            ext: self.ext.clone(),
            template_params: self.template_params.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TemplateQuery {
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TemplatePreviewQuery {
    pub template: String,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TemplateParamsResponse {
    pub template: String,
    pub media_width: u32,
    pub media_height: u32,
    pub params: BTreeMap<String, TemplateParam>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TemplateListResponse {
    pub templates: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelIdsResponse {
    pub models: Vec<String>,
}
