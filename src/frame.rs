use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;

use crate::consts;
use crate::errors::PixelleError;
use crate::templates;

#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    async fn render(
        &self,
        html: &str,
        width: u32,
        height: u32,
        output: &Path,
    ) -> Result<(), PixelleError>;
}

fn file_url(path: &Path) -> Result<String, PixelleError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    url::Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|_| {
            PixelleError::RenderError(format!("cannot build a file URL for {}", absolute.display()))
        })
}

/// Screenshots HTML with a Chromium-based browser in headless mode.
pub struct ChromeRenderer {
    browser: PathBuf,
}

impl ChromeRenderer {
    pub fn new(browser: impl Into<PathBuf>) -> Self {
        Self {
            browser: browser.into(),
        }
    }
}

#[async_trait]
impl HtmlRenderer for ChromeRenderer {
    async fn render(
        &self,
        html: &str,
        width: u32,
        height: u32,
        output: &Path,
    ) -> Result<(), PixelleError> {
        let html_path = output.with_extension("html");
        let page_url = file_url(&html_path)?;
        tokio::fs::write(&html_path, html).await?;

        let result = Command::new(&self.browser)
            .args(consts::CHROME_FLAGS)
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--screenshot={}", output.display()))
            .arg(page_url)
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&html_path).await {
            log::debug!("could not remove {}: {}", html_path.display(), e);
        }

        let result = result.map_err(|e| {
            PixelleError::RenderError(format!(
                "failed to launch {}: {}",
                self.browser.display(),
                e
            ))
        })?;
        if !result.status.success() {
            return Err(PixelleError::RenderError(format!(
                "browser exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        if !output.is_file() {
            return Err(PixelleError::RenderError(format!(
                "browser did not produce {}",
                output.display()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FrameInput {
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

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame_path: String,
    pub width: u32,
    pub height: u32,
}

pub struct FrameGenerator {
    template_path: PathBuf,
    template: String,
    size: (u32, u32),
    output_dir: PathBuf,
}

impl FrameGenerator {
    pub fn new(template_path: &Path, output_dir: impl Into<PathBuf>) -> Result<Self, PixelleError> {
        if !template_path.is_file() {
            return Err(PixelleError::NotFound(format!(
                "Template not found: {}",
                template_path.display()
            )));
        }
        let size = templates::parse_template_size(template_path)?;
        let template = std::fs::read_to_string(template_path)?;
        log::debug!(
            "loaded template {} ({} chars)",
            template_path.display(),
            template.len()
        );

        Ok(Self {
            template_path: template_path.to_path_buf(),
            template,
            size,
            output_dir: output_dir.into(),
        })
    }

    pub fn media_size(&self) -> (u32, u32) {
        templates::media_size(&self.template, self.size)
    }

    pub fn parse_template_parameters(&self) -> BTreeMap<String, templates::TemplateParam> {
        templates::parse_template_parameters(&self.template)
    }

    pub fn build_html(&self, input: &FrameInput) -> String {
        let mut context: HashMap<String, Value> = input.template_params.clone();
        context.extend(input.ext.clone());

        let title = input.title.clone().map(Value::String).unwrap_or(Value::Null);
        context.insert("title".to_string(), title.clone());
        context.insert("topic".to_string(), title);
        context.insert("text".to_string(), Value::String(input.text.clone()));
        context.insert(
            "image".to_string(),
            input.image.clone().map(Value::String).unwrap_or(Value::Null),
        );

        templates::render_html(&self.template, &context)
    }

    pub async fn generate_frame(
        &self,
        input: &FrameInput,
        renderer: &dyn HtmlRenderer,
    ) -> Result<FrameOutput, PixelleError> {
        let html = self.build_html(input);

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let output = self.output_dir.join(format!("frame_{}.png", &id[..16]));

        let (width, height) = self.size;
        log::debug!("rendering {} to {}", self.template_path.display(), output.display());
        renderer.render(&html, width, height, &output).await?;
        log::info!("frame generated: {}", output.display());

        Ok(FrameOutput {
            frame_path: output.to_string_lossy().into_owned(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingRenderer {
        calls: Mutex<Vec<(String, u32, u32)>>,
    }

    #[async_trait]
    impl HtmlRenderer for RecordingRenderer {
        async fn render(
            &self,
            html: &str,
            width: u32,
            height: u32,
            output: &Path,
        ) -> Result<(), PixelleError> {
            self.calls
                .lock()
                .unwrap()
                .push((html.to_string(), width, height));
            std::fs::write(output, b"png")?;
            Ok(())
        }
    }

    fn write_template(dir: &Path, size: &str, body: &str) -> PathBuf {
        let size_dir = dir.join(size);
        std::fs::create_dir_all(&size_dir).unwrap();
        let path = size_dir.join("default.html");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[cfg(unix)]
    fn fake_browser(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-chrome");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_escapes_path() {
        let path = Path::new("/portable/My #1 Videos/100%/frame_a.html");
        let url = file_url(path).unwrap();
        assert_eq!(
            url,
            "file:///portable/My%20%231%20Videos/100%25/frame_a.html"
        );
        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(parsed.to_file_path().unwrap(), path);
    }

    #[test]
    fn test_file_url_relative_path_is_absolutized() {
        let url = file_url(Path::new("output/frame_a.html")).unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with("/output/frame_a.html"));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let result = FrameGenerator::new(Path::new("/no/such/1080x1920/x.html"), "/tmp");
        assert!(matches!(result, Err(PixelleError::NotFound(_))));
    }

    #[test]
    fn test_template_outside_size_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(dir.path(), "custom", "<p>{{text}}</p>");
        let result = FrameGenerator::new(&template, dir.path().join("output"));
        assert!(matches!(result, Err(PixelleError::ValidationError(_))));
    }

    #[test]
    fn test_generator_reads_params_and_media_size() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(
            dir.path(),
            "1920x1080",
            "<meta name=\"template:media-height\" content=\"720\">{{accent:color=#123456}}",
        );
        let generator = FrameGenerator::new(&template, dir.path()).unwrap();
        assert_eq!(generator.media_size(), (1920, 720));
        assert_eq!(
            generator.parse_template_parameters().keys().collect::<Vec<_>>(),
            vec!["accent"]
        );
    }

    #[tokio::test]
    async fn test_generate_frame_renders_context() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(
            dir.path(),
            "1080x1920",
            "<h1>{{title}}|{{topic}}</h1><p>{{text}}</p><img src=\"{{image}}\">{{author}}{{accent:color=#123456}}",
        );
        let renderer = RecordingRenderer {
            calls: Mutex::new(vec![]),
        };
        let output_dir = dir.path().join("output");
        let generator = FrameGenerator::new(&template, &output_dir).unwrap();

        let mut input = FrameInput {
            title: Some("Welcome".to_string()),
            text: "Body".to_string(),
            image: Some("resources/example.png".to_string()),
            ..Default::default()
        };
        input
            .ext
            .insert("author".to_string(), Value::String("Ann".to_string()));
        input
            .ext
            .insert("text".to_string(), Value::String("ignored".to_string()));

        let frame = generator.generate_frame(&input, &renderer).await.unwrap();
        assert_eq!((frame.width, frame.height), (1080, 1920));
        let path = PathBuf::from(&frame.frame_path);
        assert!(path.is_file());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("frame_") && name.ends_with(".png"));
        assert_eq!(name.len(), "frame_".len() + 16 + ".png".len());

        let calls = renderer.calls.lock().unwrap();
        assert_eq!(
            calls[0].0,
            "<h1>Welcome|Welcome</h1><p>Body</p><img src=\"resources/example.png\">Ann#123456"
        );
        assert_eq!((calls[0].1, calls[0].2), (1080, 1920));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_chrome_renderer_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let browser = fake_browser(dir.path(), "echo 'gpu process crashed' >&2\nexit 1");
        let output = dir.path().join("frame.png");

        let result = ChromeRenderer::new(browser)
            .render("<p>hi</p>", 100, 200, &output)
            .await;
        match result {
            Err(PixelleError::RenderError(message)) => {
                assert!(message.contains("gpu process crashed"))
            }
            other => panic!("expected RenderError, got {other:?}"),
        }
        assert!(!output.with_extension("html").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_chrome_renderer_missing_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let browser = fake_browser(dir.path(), "exit 0");
        let output = dir.path().join("frame.png");

        let result = ChromeRenderer::new(browser)
            .render("<p>hi</p>", 100, 200, &output)
            .await;
        match result {
            Err(PixelleError::RenderError(message)) => {
                assert!(message.contains("did not produce"))
            }
            other => panic!("expected RenderError, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_chrome_renderer_writes_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let args_log = dir.path().join("args.txt");
        let script = format!(
            r#"printf '%s\n' "$@" > '{}'
for arg in "$@"; do
  case "$arg" in
    --screenshot=*) printf 'png' > "${{arg#--screenshot=}}" ;;
  esac
done"#,
            args_log.display()
        );
        let browser = fake_browser(dir.path(), &script);
        let output = dir.path().join("frame.png");

        ChromeRenderer::new(browser)
            .render("<p>hi</p>", 1080, 1920, &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"png");
        assert!(!output.with_extension("html").exists());
        let args = std::fs::read_to_string(&args_log).unwrap();
        assert!(args.lines().any(|line| line == "--window-size=1080,1920"));
        assert!(args.lines().any(|line| line == "--headless=new"));
        assert!(
            args.lines()
                .any(|line| line.starts_with("file:///") && line.ends_with("/frame.html"))
        );
    }
}
