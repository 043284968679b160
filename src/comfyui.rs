use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ComfyUiConfig;
use crate::consts;
use crate::errors::PixelleError;
use crate::layout::PortableLayout;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComfyUiMode {
    Local,
    RunningHub,
}

impl ComfyUiMode {
    pub fn from_config(config: &ComfyUiConfig) -> ComfyUiMode {
        match config.runninghub_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => ComfyUiMode::RunningHub,
            _ => ComfyUiMode::Local,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ComfyUiStatus {
    pub mode: ComfyUiMode,
    pub url: String,
    /// A backend is set up: local URL, or a RunningHub key.
    pub configured: bool,
    /// Only set after a successful `/system_stats` call.
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
    pub detail: String,
}

pub struct ComfyUiClient {
    client: reqwest::Client,
    config: ComfyUiConfig,
}

impl ComfyUiClient {
    pub fn new(client: reqwest::Client, config: ComfyUiConfig) -> Self {
        Self { client, config }
    }

    pub fn mode(&self) -> ComfyUiMode {
        ComfyUiMode::from_config(&self.config)
    }

    async fn system_stats(&self) -> Result<Value, PixelleError> {
        let url = format!(
            "{}/system_stats",
            self.config.comfyui_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(consts::STATUS_TIMEOUT_SECS))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PixelleError::ApiError(format!(
                "ComfyUI answered {}",
                response.status()
            )));
        }
        Ok(response.json::<Value>().await?)
    }

    pub async fn status(&self) -> ComfyUiStatus {
        let mode = self.mode();
        let url = self.config.comfyui_url.clone();

        if mode == ComfyUiMode::RunningHub {
            return ComfyUiStatus {
                mode,
                url,
                configured: true,
                reachable: false,
                version: None,
                detail: "RunningHub API key configured, connectivity not checked".to_string(),
            };
        }

        match self.system_stats().await {
            Ok(stats) => {
                let version = stats
                    .pointer("/system/comfyui_version")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                ComfyUiStatus {
                    mode,
                    url,
                    configured: true,
                    reachable: true,
                    version,
                    detail: "ComfyUI is running".to_string(),
                }
            }
            Err(e) => {
                log::warn!("ComfyUI at {} is not reachable: {}", url, e);
                ComfyUiStatus {
                    mode,
                    url,
                    configured: true,
                    reachable: false,
                    version: None,
                    detail: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowSource {
    Selfhost,
    Runninghub,
}

impl WorkflowSource {
    fn from_dir(name: &str) -> Option<WorkflowSource> {
        match name {
            "selfhost" => Some(WorkflowSource::Selfhost),
            "runninghub" => Some(WorkflowSource::Runninghub),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkflowInfo {
    pub key: String,
    pub source: WorkflowSource,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DigitalHumanReadiness {
    pub first_workflow: String,
    pub first_step: bool,
    pub second_workflow: String,
    pub second_step: bool,
    pub ready: bool,
}

pub struct WorkflowCatalog {
    roots: Vec<PathBuf>,
}

impl WorkflowCatalog {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn from_layout(layout: &PortableLayout) -> Self {
        Self::new(vec![
            layout.user_workflows_dir(),
            layout.builtin_workflows_dir(),
        ])
    }

    /// Workflows keyed `source/name.json`; earlier roots shadow later ones.
    pub fn list_workflows(&self) -> Result<Vec<WorkflowInfo>, PixelleError> {
        let mut found: BTreeMap<String, WorkflowInfo> = BTreeMap::new();
        for root in self.roots.iter().filter(|r| r.is_dir()) {
            for source_entry in std::fs::read_dir(root)? {
                let source_path = source_entry?.path();
                let Some(source) = source_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(WorkflowSource::from_dir)
                else {
                    continue;
                };
                if !source_path.is_dir() {
                    continue;
                }
                for file_entry in std::fs::read_dir(&source_path)? {
                    let path = file_entry?.path();
                    let is_json = path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    if !is_json || !path.is_file() {
                        continue;
                    }
                    let dir = source_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or_default();
                    let key = format!("{dir}/{file_name}");
                    let name = file_name.trim_end_matches(".json").to_string();
                    found.entry(key.clone()).or_insert(WorkflowInfo {
                        key,
                        source,
                        name,
                        path: path.clone(),
                    });
                }
            }
        }
        Ok(found.into_values().collect())
    }

    pub fn find(&self, key: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(key))
            .find(|path| path.is_file())
    }

    pub fn digital_human_readiness(&self) -> DigitalHumanReadiness {
        let first_step = self.find(consts::DIGITAL_IMAGE_WORKFLOW).is_some();
        let second_step = self.find(consts::DIGITAL_COMBINATION_WORKFLOW).is_some();
        if !(first_step && second_step) {
            log::warn!("digital human workflows are incomplete");
        }
        DigitalHumanReadiness {
            first_workflow: consts::DIGITAL_IMAGE_WORKFLOW.to_string(),
            first_step,
            second_workflow: consts::DIGITAL_COMBINATION_WORKFLOW.to_string(),
            second_step,
            ready: first_step && second_step,
        }
    }
}
