use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use pixelle_video::config::{AppConfig, ConfigLoader};
use pixelle_video::errors::PixelleError;
use pixelle_video::frame::HtmlRenderer;

pub struct InMemoryConfigLoader {
    config: Mutex<AppConfig>,
    saves: AtomicUsize,
}

impl InMemoryConfigLoader {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Mutex::new(config),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saved(&self) -> AppConfig {
        self.config.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigLoader for InMemoryConfigLoader {
    fn load_config(&self) -> Result<AppConfig, PixelleError> {
        Ok(self.config.lock().unwrap().clone())
    }

    fn save_config(&self, config: &AppConfig) -> Result<(), PixelleError> {
        config.validate()?;
        *self.config.lock().unwrap() = config.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Writes a placeholder PNG and remembers the HTML it was given.
pub struct FakeRenderer {
    rendered: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self {
            rendered: Mutex::new(vec![]),
        }
    }

    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl HtmlRenderer for FakeRenderer {
    async fn render(
        &self,
        html: &str,
        _width: u32,
        _height: u32,
        output: &Path,
    ) -> Result<(), PixelleError> {
        self.rendered.lock().unwrap().push(html.to_string());
        std::fs::write(output, b"\x89PNG")?;
        Ok(())
    }
}

pub struct FailingRenderer;

#[async_trait]
impl HtmlRenderer for FailingRenderer {
    async fn render(
        &self,
        _html: &str,
        _width: u32,
        _height: u32,
        _output: &Path,
    ) -> Result<(), PixelleError> {
        Err(PixelleError::RenderError("browser crashed".to_string()))
    }
}
