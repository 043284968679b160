use serde::{self, Deserialize, Serialize};

/// `GET {base_url}/models` response of an OpenAI-compatible provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelList {
    pub data: Vec<Model>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub owned_by: Option<String>,
}
