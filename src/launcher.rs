use std::net::TcpListener;

use serde::Serialize;

use crate::config::{AppConfig, ServerConfig};
use crate::errors::PixelleError;
use crate::layout::{PortableLayout, Severity};
use crate::tools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LaunchMode {
    Web,
    Api,
    All,
}

impl LaunchMode {
    pub fn from_script(script: &str) -> Option<LaunchMode> {
        let name = script.rsplit(['/', '\\']).next().unwrap_or(script);
        match name.to_ascii_lowercase().as_str() {
            "start.bat" | "start_web.bat" => Some(LaunchMode::Web),
            "start_api.bat" => Some(LaunchMode::Api),
            _ => None,
        }
    }

    /// `(name, port)` pairs this mode binds.
    pub fn ports(&self, server: &ServerConfig) -> Vec<(&'static str, u16)> {
        match self {
            LaunchMode::Web => vec![("web", server.web_port)],
            LaunchMode::Api => vec![("api", server.api_port)],
            LaunchMode::All => vec![("api", server.api_port), ("web", server.web_port)],
        }
    }
}

pub fn web_url(config: &AppConfig) -> String {
    format!("http://localhost:{}", config.server.web_port)
}

pub fn api_url(config: &AppConfig) -> String {
    format!("http://localhost:{}", config.server.api_port)
}

pub fn check_port(host: &str, port: u16) -> Result<(), PixelleError> {
    match TcpListener::bind((host, port)) {
        Ok(listener) => {
            drop(listener);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => Err(PixelleError::PortInUse(
            format!(
                "port {port} on {host} is already in use; close the program using it or change the port in config.yaml"
            ),
        )),
        Err(e) => Err(PixelleError::NetworkError(format!(
            "cannot bind {host}:{port}: {e}"
        ))),
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct CheckItem {
    pub name: String,
    /// `None` when the check passed.
    pub severity: Option<Severity>,
    pub detail: String,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct PreflightReport {
    pub items: Vec<CheckItem>,
}

impl PreflightReport {
    fn pass(&mut self, name: &str, detail: impl Into<String>) {
        self.items.push(CheckItem {
            name: name.to_string(),
            severity: None,
            detail: detail.into(),
        });
    }

    fn fail(&mut self, name: &str, severity: Severity, detail: impl Into<String>) {
        self.items.push(CheckItem {
            name: name.to_string(),
            severity: Some(severity),
            detail: detail.into(),
        });
    }

    pub fn is_ready(&self) -> bool {
        !self
            .items
            .iter()
            .any(|item| item.severity == Some(Severity::Error))
    }

    pub fn port_conflicts(&self) -> Vec<&CheckItem> {
        self.items
            .iter()
            .filter(|item| item.name.starts_with("port.") && item.severity.is_some())
            .collect()
    }

    pub fn log(&self) {
        for item in &self.items {
            match item.severity {
                None => log::info!("[ok] {}: {}", item.name, item.detail),
                Some(Severity::Warning) => log::warn!("[warn] {}: {}", item.name, item.detail),
                Some(Severity::Error) => log::error!("[error] {}: {}", item.name, item.detail),
            }
        }
    }
}

/// Layout, config and port checks; no external processes are started.
pub fn static_checks(
    layout: &PortableLayout,
    config: &AppConfig,
    mode: Option<LaunchMode>,
) -> PreflightReport {
    let mut report = PreflightReport::default();

    for issue in layout.check() {
        report.fail(
            &format!("layout.{}", issue.component),
            issue.severity,
            format!("{} ({})", issue.hint, issue.path.display()),
        );
    }

    match config.validate() {
        Ok(()) => report.pass("config", layout.config_path().display().to_string()),
        Err(e) => report.fail("config", Severity::Error, e.to_string()),
    }

    if config.is_llm_configured() {
        report.pass("llm", format!("{} ({})", config.llm.model, config.llm.base_url));
    } else {
        report.fail(
            "llm",
            Severity::Warning,
            "LLM API key, base URL or model is empty; set them on the settings page",
        );
    }

    if let Some(mode) = mode {
        let ports = mode.ports(&config.server);
        if let [(first, a), (second, b)] = ports.as_slice() {
            if a == b {
                report.fail(
                    "port.shared",
                    Severity::Error,
                    format!("{first} and {second} servers are both set to port {a}; change one in config.yaml"),
                );
            }
        }
        for (name, port) in ports {
            let check_name = format!("port.{name}");
            match check_port(&config.server.host, port) {
                Ok(()) => report.pass(&check_name, format!("{} is free", port)),
                Err(e) => report.fail(&check_name, Severity::Error, e.detail().to_string()),
            }
        }
    }

    report
}

pub async fn preflight(
    layout: &PortableLayout,
    config: &AppConfig,
    mode: Option<LaunchMode>,
) -> PreflightReport {
    let mut report = static_checks(layout, config, mode);

    match tools::locate_ffmpeg(layout) {
        Some(ffmpeg) => match tools::ffmpeg_version(&ffmpeg).await {
            Ok(version) => report.pass("ffmpeg", version),
            Err(e) => report.fail("ffmpeg", Severity::Warning, e.to_string()),
        },
        None => report.fail(
            "ffmpeg",
            Severity::Warning,
            "FFmpeg not found in tools/ or on PATH; video composition will fail",
        ),
    }

    match tools::locate_browser() {
        Some(browser) => report.pass("browser", browser.display().to_string()),
        None => report.fail(
            "browser",
            Severity::Warning,
            "no Chrome/Chromium/Edge found; set PIXELLE_CHROME to render frames",
        ),
    }

    let fonts = tools::check_fonts().await;
    match fonts.hint() {
        None => report.pass("fonts", format!("{fonts:?}")),
        Some(hint) => report.fail("fonts", Severity::Warning, hint),
    }

    report
}
