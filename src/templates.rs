use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::PixelleError;
use crate::i18n::Language;
use crate::layout::PortableLayout;

static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([A-Za-z]+)\s*(?:=([^}]*))?\}\}")
        .expect("valid parameter regex")
});

static VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid variable regex")
});

static MEDIA_WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+name=["']template:media-width["']\s+content=["'](\d+)["']"#)
        .expect("valid meta regex")
});

static MEDIA_HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+name=["']template:media-height["']\s+content=["'](\d+)["']"#)
        .expect("valid meta regex")
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Text,
    Number,
    Color,
    Bool,
}

impl ParamType {
    fn parse(raw: &str) -> Option<ParamType> {
        match raw.to_ascii_lowercase().as_str() {
            "text" => Some(ParamType::Text),
            "number" => Some(ParamType::Number),
            "color" => Some(ParamType::Color),
            "bool" => Some(ParamType::Bool),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TemplateParam {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub default: Value,
    pub label: String,
}

fn typed_default(param_type: ParamType, raw: Option<&str>) -> Value {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return match param_type {
                ParamType::Bool => Value::Bool(false),
                _ => Value::Null,
            };
        }
    };
    match param_type {
        ParamType::Text | ParamType::Color => Value::String(raw.to_string()),
        ParamType::Number => match raw.parse::<f64>() {
            Ok(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Err(_) => {
                log::warn!("template number default {raw:?} is not numeric, ignoring");
                Value::Null
            }
        },
        ParamType::Bool => Value::Bool(raw.eq_ignore_ascii_case("true")),
    }
}

/// Custom parameters declared in `html`; the first declaration of a name wins.
pub fn parse_template_parameters(html: &str) -> BTreeMap<String, TemplateParam> {
    let mut params = BTreeMap::new();
    for caps in PARAM_RE.captures_iter(html) {
        let name = &caps[1];
        let Some(param_type) = ParamType::parse(&caps[2]) else {
            log::warn!("unknown template parameter type {:?} for {name}", &caps[2]);
            continue;
        };
        if params.contains_key(name) {
            continue;
        }
        params.insert(
            name.to_string(),
            TemplateParam {
                param_type,
                default: typed_default(param_type, caps.get(3).map(|m| m.as_str())),
                label: name.to_string(),
            },
        );
    }
    params
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitutes built-in variables and custom parameters. Parameters without a
/// context value fall back to their declared default; unknown variables render empty.
pub fn render_html(html: &str, context: &HashMap<String, Value>) -> String {
    let with_params = PARAM_RE.replace_all(html, |caps: &regex::Captures| {
        match context.get(&caps[1]) {
            Some(value) => value_to_text(value),
            None => caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        }
    });
    VAR_RE
        .replace_all(&with_params, |caps: &regex::Captures| {
            context.get(&caps[1]).map(value_to_text).unwrap_or_default()
        })
        .into_owned()
}

/// `(width, height)` from the `WxH` directory holding the template.
pub fn parse_template_size(path: &Path) -> Result<(u32, u32), PixelleError> {
    let size_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            PixelleError::ValidationError(format!(
                "template {} is not inside a size directory",
                path.display()
            ))
        })?;

    let parsed = size_dir
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse::<u32>().ok()?, h.parse::<u32>().ok()?)));
    match parsed {
        Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(PixelleError::ValidationError(format!(
            "invalid template size directory {size_dir:?}, expected WIDTHxHEIGHT"
        ))),
    }
}

/// Size of the media slot, from `template:media-width/height` meta tags.
pub fn media_size(html: &str, fallback: (u32, u32)) -> (u32, u32) {
    let read = |re: &Regex| {
        re.captures(html)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    };
    (
        read(&MEDIA_WIDTH_RE).unwrap_or(fallback.0),
        read(&MEDIA_HEIGHT_RE).unwrap_or(fallback.1),
    )
}

pub struct TemplateStore {
    roots: Vec<PathBuf>,
}

impl TemplateStore {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// User templates in `data/templates` shadow the built-in ones.
    pub fn from_layout(layout: &PortableLayout) -> Self {
        Self::new(vec![
            layout.user_templates_dir(),
            layout.builtin_templates_dir(),
        ])
    }

    pub fn resolve_template_path(&self, key: &str) -> Result<PathBuf, PixelleError> {
        let key = key.trim();
        let raw = Path::new(key);
        if raw
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(PixelleError::ValidationError(format!(
                "template path must not contain '..': {key}"
            )));
        }
        if raw.is_absolute() {
            return if raw.is_file() {
                Ok(raw.to_path_buf())
            } else {
                Err(PixelleError::NotFound(format!("Template not found: {key}")))
            };
        }

        let relative = key
            .strip_prefix("data/templates/")
            .or_else(|| key.strip_prefix("templates/"))
            .unwrap_or(key);

        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| PixelleError::NotFound(format!("Template not found: {key}")))
    }

    pub fn list_templates(&self) -> Result<Vec<String>, PixelleError> {
        let mut keys = BTreeSet::new();
        for root in self.roots.iter().filter(|r| r.is_dir()) {
            for size_entry in std::fs::read_dir(root)? {
                let size_path = size_entry?.path();
                if !size_path.is_dir() {
                    continue;
                }
                let Some(size) = size_path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                for file_entry in std::fs::read_dir(&size_path)? {
                    let file_path = file_entry?.path();
                    let is_html = file_path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
                    if let (true, Some(name)) =
                        (is_html, file_path.file_name().and_then(|n| n.to_str()))
                    {
                        keys.insert(format!("{size}/{name}"));
                    }
                }
            }
        }
        Ok(keys.into_iter().collect())
    }
}

/// Preview image under `docs/images/<size>/`. Chinese uses the unsuffixed
/// image, other languages prefer the `_en` variant.
pub fn preview_image_path(docs_root: &Path, key: &str, language: Language) -> Option<PathBuf> {
    let (size, file) = key.split_once('/')?;
    let name = file.strip_suffix(".html").unwrap_or(file);
    let suffix = match language {
        Language::ZhCn => "",
        Language::En => "_en",
    };

    let candidates = [suffix, ""]
        .into_iter()
        .flat_map(|sfx| ["jpg", "png"].map(move |ext| format!("{name}{sfx}.{ext}")));
    candidates
        .map(|file_name| docs_root.join(size).join(file_name))
        .find(|path| path.is_file())
}
