use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts;
use crate::errors::PixelleError;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct LayoutIssue {
    pub component: String,
    pub path: PathBuf,
    pub severity: Severity,
    pub hint: String,
}

#[derive(Debug, Clone)]
pub struct PortableLayout {
    root: PathBuf,
}

impl PortableLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `PIXELLE_HOME` when set, otherwise the current directory.
    pub fn discover() -> Result<Self, PixelleError> {
        match std::env::var(consts::ENV_HOME) {
            Ok(home) if !home.trim().is_empty() => Ok(Self::new(home)),
            _ => Ok(Self::new(std::env::current_dir()?)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join(consts::RUNTIME_DIR)
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(consts::TOOLS_DIR)
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root.join(consts::APP_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(consts::DATA_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(consts::OUTPUT_DIR)
    }

    pub fn user_templates_dir(&self) -> PathBuf {
        self.data_dir().join("templates")
    }

    pub fn builtin_templates_dir(&self) -> PathBuf {
        self.app_dir().join("templates")
    }

    pub fn user_workflows_dir(&self) -> PathBuf {
        self.data_dir().join("workflows")
    }

    pub fn builtin_workflows_dir(&self) -> PathBuf {
        self.app_dir().join("workflows")
    }

    pub fn docs_images_dir(&self) -> PathBuf {
        self.app_dir().join("docs").join("images")
    }

    /// `PIXELLE_CONFIG` when set, otherwise `Pixelle-Video/config.yaml`.
    pub fn config_path(&self) -> PathBuf {
        match std::env::var(consts::ENV_CONFIG) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => self.app_dir().join(consts::CONFIG_FILE),
        }
    }

    pub fn check(&self) -> Vec<LayoutIssue> {
        let expected = [
            (
                "runtime",
                self.runtime_dir(),
                Severity::Warning,
                "embedded runtime folder is missing; only needed by the legacy launch scripts",
            ),
            (
                "tools",
                self.tools_dir(),
                Severity::Warning,
                "tools folder is missing; FFmpeg will be looked up on PATH",
            ),
            (
                "app",
                self.app_dir(),
                Severity::Error,
                "application folder is missing; re-extract the portable archive",
            ),
            (
                "data",
                self.data_dir(),
                Severity::Error,
                "data folder (bgm, templates, workflows) is missing; re-extract the portable archive",
            ),
        ];

        expected
            .into_iter()
            .filter(|(_, path, _, _)| !path.is_dir())
            .map(|(component, path, severity, hint)| LayoutIssue {
                component: component.to_string(),
                path,
                severity,
                hint: hint.to_string(),
            })
            .collect()
    }

    pub fn ensure_output_dir(&self) -> Result<PathBuf, PixelleError> {
        let dir = self.output_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = PortableLayout::new("/portable");
        assert_eq!(layout.tools_dir(), PathBuf::from("/portable/tools"));
        assert_eq!(layout.app_dir(), PathBuf::from("/portable/Pixelle-Video"));
        assert_eq!(
            layout.user_templates_dir(),
            PathBuf::from("/portable/data/templates")
        );
        assert_eq!(
            layout.builtin_workflows_dir(),
            PathBuf::from("/portable/Pixelle-Video/workflows")
        );
    }

    #[test]
    fn test_check_reports_missing_folders() {
        let dir = tempfile::tempdir().unwrap();
        let layout = PortableLayout::new(dir.path());

        let issues = layout.check();
        let components: Vec<&str> = issues.iter().map(|i| i.component.as_str()).collect();
        assert_eq!(components, vec!["runtime", "tools", "app", "data"]);
        assert_eq!(issues[2].severity, Severity::Error);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_check_complete_layout() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["python", "tools", "Pixelle-Video", "data"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        let layout = PortableLayout::new(dir.path());
        assert!(layout.check().is_empty());
    }

    #[test]
    fn test_ensure_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = PortableLayout::new(dir.path());

        let path = layout.ensure_output_dir().unwrap();
        assert!(path.is_dir());
        assert_eq!(path, dir.path().join("output"));
    }
}
