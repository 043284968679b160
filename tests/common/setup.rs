use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use tempfile::TempDir;

use pixelle_video::config::AppConfig;
use pixelle_video::frame::HtmlRenderer;
use pixelle_video::layout::PortableLayout;
use pixelle_video::service::AppService;

use crate::fixtures::{IMAGE_TEMPLATE, PLAIN_TEMPLATE};
use crate::mocks::InMemoryConfigLoader;

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Portable root with templates and workflows in both user and built-in folders.
pub fn create_portable_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for sub in ["python", "tools", "output", "data/bgm"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
    }
    write_file(
        root,
        "Pixelle-Video/templates/1080x1920/image_default.html",
        IMAGE_TEMPLATE,
    );
    write_file(
        root,
        "Pixelle-Video/templates/1920x1080/plain.html",
        PLAIN_TEMPLATE,
    );
    write_file(root, "data/templates/1080x1920/custom.html", PLAIN_TEMPLATE);
    write_file(
        root,
        "Pixelle-Video/workflows/selfhost/image_flux.json",
        "{}",
    );
    write_file(
        root,
        "Pixelle-Video/workflows/runninghub/digital_image.json",
        "{}",
    );
    dir
}

pub fn create_test_config(llm_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.llm.api_key = "test-key".to_string();
    config.llm.base_url = llm_url.to_string();
    config.llm.model = "test-model".to_string();
    config
}

pub fn create_service(
    root: &Path,
    config: AppConfig,
    renderer: Option<Arc<dyn HtmlRenderer>>,
) -> (Arc<AppService>, Arc<InMemoryConfigLoader>) {
    let loader = Arc::new(InMemoryConfigLoader::new(config));
    let service = AppService::new(
        PortableLayout::new(root),
        loader.clone(),
        Client::new(),
        renderer,
    )
    .unwrap();
    (Arc::new(service), loader)
}
