use actix_web::http::header;
use actix_web::web::{Data, Form, Query};
use actix_web::HttpResponse;
use serde::Deserialize;

use crate::comfyui::{ComfyUiMode, DigitalHumanReadiness};
use crate::config::{AppConfig, ConfigUpdate};
use crate::handlers;
use crate::i18n::{Language, tr};
use crate::service::AppService;
use crate::tts;

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    #[serde(default)]
    pub saved: Option<u8>,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsForm {
    #[serde(default)]
    pub llm_api_key: String,
    #[serde(default)]
    pub llm_base_url: String,
    #[serde(default)]
    pub llm_model: String,
    #[serde(default)]
    pub comfyui_url: String,
    #[serde(default)]
    pub runninghub_api_key: String,
    #[serde(default)]
    pub clear_runninghub_key: Option<String>,
    #[serde(default)]
    pub tts_voice: String,
    #[serde(default)]
    pub tts_speed: String,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl SettingsForm {
    /// Blank secret fields keep the stored keys; the checkbox clears RunningHub.
    pub fn to_update(&self) -> Result<ConfigUpdate, crate::errors::PixelleError> {
        let tts_speed = match non_blank(&self.tts_speed) {
            Some(raw) => Some(raw.parse::<f32>().map_err(|_| {
                crate::errors::PixelleError::ValidationError(format!(
                    "invalid TTS speed: {raw}"
                ))
            })?),
            None => None,
        };
        let runninghub_api_key = if self.clear_runninghub_key.is_some() {
            Some(String::new())
        } else {
            non_blank(&self.runninghub_api_key)
        };

        Ok(ConfigUpdate {
            llm_api_key: non_blank(&self.llm_api_key),
            llm_base_url: non_blank(&self.llm_base_url),
            llm_model: non_blank(&self.llm_model),
            comfyui_url: non_blank(&self.comfyui_url),
            runninghub_api_key,
            tts_voice: non_blank(&self.tts_voice),
            tts_speed,
        })
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub struct PageContext<'a> {
    pub config: &'a AppConfig,
    pub language: Language,
    pub saved: bool,
    pub error: Option<String>,
    pub template_count: usize,
    pub workflow_count: usize,
    pub digital_human: DigitalHumanReadiness,
}

fn workflow_line(lang: Language, step_key: &str, workflow: &str, found: bool) -> String {
    let state = if found {
        String::new()
    } else {
        format!(
            " <span class=\"warn\">({})</span>",
            escape_html(&tr(lang, "digital_human.workflow.not_found"))
        )
    };
    format!(
        "<li>{}: <code>{}</code>{}</li>",
        escape_html(&tr(lang, step_key)),
        escape_html(workflow),
        state
    )
}

pub fn render_settings_page(ctx: &PageContext<'_>) -> String {
    let lang = ctx.language;
    let redacted = ctx.config.redacted();
    let local = &ctx.config.comfyui.tts.local;

    let voice_options: String = tts::list_voices(lang)
        .into_iter()
        .map(|voice| {
            let selected = if voice.id == local.voice { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                escape_html(&voice.id),
                selected,
                escape_html(&voice.display_name)
            )
        })
        .collect();

    let mode = match ComfyUiMode::from_config(&ctx.config.comfyui) {
        ComfyUiMode::Local => tr(lang, "status.comfyui_local"),
        ComfyUiMode::RunningHub => tr(lang, "status.comfyui_runninghub"),
    };

    let readiness = &ctx.digital_human;
    let digital_human = format!(
        "{}{}",
        workflow_line(
            lang,
            "digital_human.workflow.first_step",
            &readiness.first_workflow,
            readiness.first_step
        ),
        workflow_line(
            lang,
            "digital_human.workflow.second_step",
            &readiness.second_workflow,
            readiness.second_step
        ),
    );

    let mut banners = String::new();
    if ctx.saved {
        banners.push_str(&format!(
            "<p class=\"ok\">{}</p>",
            escape_html(&tr(lang, "settings.saved"))
        ));
    }
    if let Some(error) = &ctx.error {
        banners.push_str(&format!("<p class=\"error\">{}</p>", escape_html(error)));
    }
    if !ctx.config.is_llm_configured() {
        banners.push_str(&format!(
            "<p class=\"warn\">{}</p>",
            escape_html(&tr(lang, "status.llm_missing"))
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang_code}"><head><meta charset="utf-8"><title>{title}</title>
<style>body{{font-family:sans-serif;max-width:720px;margin:2em auto}}fieldset{{margin-bottom:1em}}label{{display:block;margin:.4em 0}}input,select{{width:100%}}.ok{{color:green}}.warn{{color:#b80}}.error{{color:red}}</style>
</head><body>
<h1>{title}</h1>
{banners}
<p>{mode} &middot; templates: {templates} &middot; workflows: {workflows}</p>
<form method="post" action="/settings">
<fieldset><legend>{llm}</legend>
<label>API Key <input type="password" name="llm_api_key" placeholder="{llm_key_hint}"></label>
<label>Base URL <input name="llm_base_url" value="{base_url}"></label>
<label>Model <input name="llm_model" value="{model}"></label>
</fieldset>
<fieldset><legend>{comfyui}</legend>
<label>ComfyUI URL <input name="comfyui_url" value="{comfyui_url}"></label>
<label>RunningHub API Key <input type="password" name="runninghub_api_key" placeholder="{rh_key_hint}"></label>
<label><input type="checkbox" name="clear_runninghub_key" value="1" style="width:auto"> clear RunningHub key</label>
<p>{digital_human_title}</p>
<ul>{digital_human}</ul>
</fieldset>
<fieldset><legend>{tts}</legend>
<label>Voice <select name="tts_voice">{voice_options}</select></label>
<label>Speed <input type="number" name="tts_speed" min="0.5" max="2.0" step="0.1" value="{speed:.1}"></label>
</fieldset>
<button type="submit">{save}</button>
</form>
</body></html>"#,
        lang_code = lang.code(),
        title = escape_html(&tr(lang, "settings.title")),
        banners = banners,
        mode = escape_html(&mode),
        templates = ctx.template_count,
        workflows = ctx.workflow_count,
        llm = escape_html(&tr(lang, "settings.llm")),
        llm_key_hint = escape_html(&non_blank(&redacted.llm.api_key)
            .unwrap_or_else(|| tr(lang, "settings.api_key_keep"))),
        base_url = escape_html(&ctx.config.llm.base_url),
        model = escape_html(&ctx.config.llm.model),
        comfyui = escape_html(&tr(lang, "settings.comfyui")),
        comfyui_url = escape_html(&ctx.config.comfyui.comfyui_url),
        digital_human_title = escape_html(&tr(lang, "pipeline.digital_human.name")),
        digital_human = digital_human,
        rh_key_hint = escape_html(redacted.comfyui.runninghub_api_key.as_deref().unwrap_or_default()),
        tts = escape_html(&tr(lang, "settings.tts")),
        voice_options = voice_options,
        speed = local.speed,
        save = escape_html(&tr(lang, "settings.save")),
    )
}

fn page(service: &AppService, language: Language, saved: bool, error: Option<String>) -> String {
    let config = service.config();
    let template_count = service
        .templates()
        .list_templates()
        .map(|t| t.len())
        .unwrap_or(0);
    let workflows = service.workflows();
    let workflow_count = workflows.list_workflows().map(|w| w.len()).unwrap_or(0);
    render_settings_page(&PageContext {
        config: &config,
        language,
        saved,
        error,
        template_count,
        workflow_count,
        digital_human: workflows.digital_human_readiness(),
    })
}

pub async fn index(service: Data<AppService>, query: Query<PageQuery>) -> HttpResponse {
    let language = query
        .lang
        .as_deref()
        .map(Language::parse)
        .unwrap_or_default();
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page(&service, language, query.saved == Some(1), None))
}

pub async fn save_settings(service: Data<AppService>, form: Form<SettingsForm>) -> HttpResponse {
    let result = match form.to_update() {
        Ok(update) => handlers::save_config(&service, update).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/?saved=1"))
            .finish(),
        Err(e) => {
            log::info!("settings rejected: {}", e);
            HttpResponse::build(handlers::status_for(&e))
                .content_type("text/html; charset=utf-8")
                .body(page(&service, Language::default(), false, Some(e.to_string())))
        }
    }
}
