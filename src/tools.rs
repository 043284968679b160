use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::consts;
use crate::errors::PixelleError;
use crate::layout::PortableLayout;

fn exe_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// First match of `name` in the directories listed by `path_var`.
pub fn find_on_path(name: &str, path_var: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    let file_name = exe_name(name);
    std::env::split_paths(path_var)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

pub fn locate_ffmpeg(layout: &PortableLayout) -> Option<PathBuf> {
    let file_name = exe_name("ffmpeg");
    let bundled = [
        layout.tools_dir().join("ffmpeg").join("bin").join(&file_name),
        layout.tools_dir().join("ffmpeg").join(&file_name),
        layout.tools_dir().join(&file_name),
    ];
    bundled
        .into_iter()
        .find(|candidate| candidate.is_file())
        .or_else(|| find_on_path("ffmpeg", std::env::var_os("PATH").as_deref()))
}

pub async fn ffmpeg_version(ffmpeg: &Path) -> Result<String, PixelleError> {
    let output = Command::new(ffmpeg).arg("-version").output().await?;
    if !output.status.success() {
        return Err(PixelleError::ConfigError(format!(
            "{} -version exited with {}",
            ffmpeg.display(),
            output.status
        )));
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| PixelleError::ParseError("empty ffmpeg -version output".to_string()))
}

const BROWSER_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "msedge",
];

const WINDOWS_BROWSER_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

pub fn locate_browser() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(consts::ENV_CHROME) {
        let explicit = PathBuf::from(explicit);
        if explicit.is_file() {
            return Some(explicit);
        }
        log::warn!(
            "{} points to {}, which does not exist",
            consts::ENV_CHROME,
            explicit.display()
        );
    }

    let path_var = std::env::var_os("PATH");
    BROWSER_NAMES
        .iter()
        .find_map(|name| find_on_path(name, path_var.as_deref()))
        .or_else(|| {
            cfg!(windows)
                .then(|| {
                    WINDOWS_BROWSER_PATHS
                        .iter()
                        .map(PathBuf::from)
                        .find(|p| p.is_file())
                })
                .flatten()
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontStatus {
    /// Not applicable on this platform.
    Skipped,
    Available(usize),
    NoFonts,
    Missing,
}

impl FontStatus {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FontStatus::Skipped | FontStatus::Available(_) => None,
            FontStatus::NoFonts => Some(
                "no fonts detected by fontconfig; install fonts-liberation fonts-noto-cjk",
            ),
            FontStatus::Missing => {
                Some("fontconfig (fc-list) not found; install fontconfig fonts-noto-cjk")
            }
        }
    }
}

pub async fn check_fonts() -> FontStatus {
    if !cfg!(unix) {
        return FontStatus::Skipped;
    }
    match Command::new("fc-list").output().await {
        Ok(output) if output.status.success() => {
            let count = String::from_utf8_lossy(&output.stdout).lines().count();
            if count == 0 {
                FontStatus::NoFonts
            } else {
                log::debug!("fontconfig detected {count} fonts");
                FontStatus::Available(count)
            }
        }
        Ok(_) => FontStatus::Missing,
        Err(e) => {
            log::debug!("could not run fc-list: {e}");
            FontStatus::Missing
        }
    }
}
