use actix_web::http::StatusCode;
use actix_web::web::{self, Data, Json, Query};
use actix_web::HttpResponse;

use crate::config::{AppConfig, ConfigUpdate};
use crate::errors::PixelleError;
use crate::i18n::Language;
use crate::llm_client::LlmBackend;
use crate::llm_request;
use crate::models::api::{
    ChatRequest, ChatResponse, ErrorBody, FrameRenderRequest, HealthResponse, LangQuery,
    ModelIdsResponse, TemplateListResponse, TemplatePreviewQuery, TemplateQuery,
};
use crate::service::AppService;
use crate::tts;

pub fn status_for(error: &PixelleError) -> StatusCode {
    match error {
        PixelleError::ValidationError(_) => StatusCode::BAD_REQUEST,
        PixelleError::NotFound(_) => StatusCode::NOT_FOUND,
        PixelleError::PortInUse(_) => StatusCode::CONFLICT,
        PixelleError::ApiError(_) => StatusCode::BAD_GATEWAY,
        PixelleError::ParseError(_) => StatusCode::BAD_GATEWAY,
        PixelleError::NetworkError(_) => StatusCode::BAD_GATEWAY,
        PixelleError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PixelleError::RenderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: &PixelleError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        log::error!("request failed: {}", error);
    } else {
        log::info!("request rejected: {}", error);
    }
    HttpResponse::build(status).json(ErrorBody {
        detail: error.detail().to_string(),
    })
}

fn language(lang: Option<&str>) -> Language {
    lang.map(Language::parse).unwrap_or_default()
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_config(service: Data<AppService>) -> HttpResponse {
    HttpResponse::Ok().json(service.config().redacted())
}

/// Runs the config file write on the blocking pool.
pub async fn save_config(
    service: &Data<AppService>,
    update: ConfigUpdate,
) -> Result<AppConfig, PixelleError> {
    let service = service.clone();
    web::block(move || service.update_config(&update))
        .await
        .map_err(|e| PixelleError::ConfigError(format!("config save did not complete: {e}")))?
}

pub async fn put_config(service: Data<AppService>, update: Json<ConfigUpdate>) -> HttpResponse {
    match save_config(&service, update.into_inner()).await {
        Ok(config) => HttpResponse::Ok().json(config.redacted()),
        Err(e) => error_response(&e),
    }
}

pub async fn list_templates(service: Data<AppService>) -> HttpResponse {
    match service.templates().list_templates() {
        Ok(templates) => HttpResponse::Ok().json(TemplateListResponse { templates }),
        Err(e) => error_response(&e),
    }
}

pub async fn template_params(
    service: Data<AppService>,
    query: Query<TemplateQuery>,
) -> HttpResponse {
    log::info!("get template params: {}", query.template);
    match service.template_params(&query.template) {
        Ok(params) => HttpResponse::Ok().json(params),
        Err(e) => error_response(&e),
    }
}

pub async fn template_preview(
    service: Data<AppService>,
    query: Query<TemplatePreviewQuery>,
) -> HttpResponse {
    let path = match service.template_preview(&query.template, language(query.lang.as_deref())) {
        Ok(path) => path,
        Err(e) => return error_response(&e),
    };
    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        _ => "image/jpeg",
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => HttpResponse::Ok().content_type(content_type).body(bytes),
        Err(e) => error_response(&PixelleError::from(e)),
    }
}

pub async fn render_frame(
    service: Data<AppService>,
    request: Json<FrameRenderRequest>,
) -> HttpResponse {
    match service.render_frame(&request).await {
        Ok(frame) => HttpResponse::Ok().json(frame),
        Err(e) => error_response(&e),
    }
}

pub async fn list_workflows(service: Data<AppService>) -> HttpResponse {
    match service.workflows().list_workflows() {
        Ok(workflows) => HttpResponse::Ok().json(workflows),
        Err(e) => error_response(&e),
    }
}

pub async fn digital_human_workflows(service: Data<AppService>) -> HttpResponse {
    HttpResponse::Ok().json(service.workflows().digital_human_readiness())
}

pub async fn tts_voices(query: Query<LangQuery>) -> HttpResponse {
    HttpResponse::Ok().json(tts::list_voices(language(query.lang.as_deref())))
}

pub async fn pipelines(service: Data<AppService>, query: Query<LangQuery>) -> HttpResponse {
    HttpResponse::Ok().json(service.pipelines().list(language(query.lang.as_deref())))
}

pub async fn comfyui_status(service: Data<AppService>) -> HttpResponse {
    HttpResponse::Ok().json(service.comfyui().status().await)
}

pub async fn llm_models(service: Data<AppService>) -> HttpResponse {
    let client = match service.llm_client() {
        Ok(client) => client,
        Err(e) => return error_response(&e),
    };
    match client.list_models().await {
        Ok(list) => HttpResponse::Ok().json(ModelIdsResponse {
            models: list.data.into_iter().map(|m| m.id).collect(),
        }),
        Err(e) => error_response(&e),
    }
}

pub async fn llm_chat(service: Data<AppService>, request: Json<ChatRequest>) -> HttpResponse {
    let client = match service.llm_client() {
        Ok(client) => client,
        Err(e) => return error_response(&e),
    };
    let config = service.config();
    let result = llm_request::complete(
        &client,
        &config.llm,
        request.system.as_deref(),
        &request.prompt,
        request.max_tokens,
    )
    .await;

    match result {
        Ok(content) => HttpResponse::Ok().json(ChatResponse {
            content,
            model: config.llm.model,
        }),
        Err(e) => error_response(&e),
    }
}
