use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::comfyui::{ComfyUiClient, WorkflowCatalog};
use crate::config::{AppConfig, ConfigLoader, ConfigUpdate};
use crate::consts;
use crate::errors::PixelleError;
use crate::frame::{FrameGenerator, FrameOutput, HtmlRenderer};
use crate::i18n::Language;
use crate::layout::PortableLayout;
use crate::llm_client::LlmClient;
use crate::models::api::{FrameRenderRequest, TemplateParamsResponse};
use crate::pipelines::PipelineRegistry;
use crate::templates::TemplateStore;

/// Shared state behind both servers.
pub struct AppService {
    layout: PortableLayout,
    config: RwLock<AppConfig>,
    loader: Arc<dyn ConfigLoader>,
    http_client: reqwest::Client,
    renderer: Option<Arc<dyn HtmlRenderer>>,
    pipelines: PipelineRegistry,
}

pub fn build_http_client() -> Result<reqwest::Client, PixelleError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(consts::CONNECT_TIMEOUT_SECS))
        .read_timeout(Duration::from_secs(consts::READ_TIMEOUT_SECS))
        .build()?)
}

impl AppService {
    pub fn new(
        layout: PortableLayout,
        loader: Arc<dyn ConfigLoader>,
        http_client: reqwest::Client,
        renderer: Option<Arc<dyn HtmlRenderer>>,
    ) -> Result<Self, PixelleError> {
        let config = loader.load_config()?;
        Ok(Self {
            layout,
            config: RwLock::new(config),
            loader,
            http_client,
            renderer,
            pipelines: PipelineRegistry::with_builtins(),
        })
    }

    pub fn pipelines(&self) -> &PipelineRegistry {
        &self.pipelines
    }

    pub fn config(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Validates, persists and only then publishes the new config. Blocking.
    pub fn update_config(&self, update: &ConfigUpdate) -> Result<AppConfig, PixelleError> {
        let mut guard = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let updated = guard.apply_update(update)?;
        self.loader.save_config(&updated)?;
        *guard = updated.clone();
        Ok(updated)
    }

    pub fn templates(&self) -> TemplateStore {
        TemplateStore::from_layout(&self.layout)
    }

    pub fn workflows(&self) -> WorkflowCatalog {
        WorkflowCatalog::from_layout(&self.layout)
    }

    pub fn comfyui(&self) -> ComfyUiClient {
        ComfyUiClient::new(self.http_client.clone(), self.config().comfyui)
    }

    pub fn llm_client(&self) -> Result<LlmClient, PixelleError> {
        let config = self.config();
        if !config.is_llm_configured() {
            return Err(PixelleError::ValidationError(
                "LLM is not configured: set api_key, base_url and model".to_string(),
            ));
        }
        Ok(LlmClient::new(
            self.http_client.clone(),
            &config.llm.base_url,
            &config.llm.api_key,
        ))
    }

    fn generator(&self, template: &str) -> Result<FrameGenerator, PixelleError> {
        let template_path = self.templates().resolve_template_path(template)?;
        FrameGenerator::new(&template_path, self.layout.output_dir())
    }

    pub fn template_params(&self, template: &str) -> Result<TemplateParamsResponse, PixelleError> {
        let generator = self.generator(template)?;
        let (media_width, media_height) = generator.media_size();

        Ok(TemplateParamsResponse {
            template: template.to_string(),
            media_width,
            media_height,
            params: generator.parse_template_parameters(),
        })
    }

    /// Preview image shipped with the app for a template key.
    pub fn template_preview(
        &self,
        template: &str,
        language: Language,
    ) -> Result<PathBuf, PixelleError> {
        self.templates().resolve_template_path(template)?;
        let key = template.trim();
        let key = key
            .strip_prefix("data/templates/")
            .or_else(|| key.strip_prefix("templates/"))
            .unwrap_or(key);
        crate::templates::preview_image_path(&self.layout.docs_images_dir(), key, language)
            .ok_or_else(|| PixelleError::NotFound(format!("No preview for template: {template}")))
    }

    pub async fn render_frame(
        &self,
        request: &FrameRenderRequest,
    ) -> Result<FrameOutput, PixelleError> {
        log::info!("frame render request: template={}", request.template);
        let generator = self.generator(&request.template)?;
        let renderer = self.renderer.as_deref().ok_or_else(|| {
            PixelleError::RenderError(
                "no browser available for rendering; set PIXELLE_CHROME".to_string(),
            )
        })?;
        generator.generate_frame(&request.to_input(), renderer).await
    }
}
