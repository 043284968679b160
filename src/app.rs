use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, Error, web};

use crate::{handlers, service, web as settings};

pub fn create_api_app(
    app_service: Arc<service::AppService>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .app_data(Data::from(app_service))
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/api")
                .route("/config", web::get().to(handlers::get_config))
                .route("/config", web::put().to(handlers::put_config))
                .route("/templates", web::get().to(handlers::list_templates))
                .route(
                    "/frame/template/params",
                    web::get().to(handlers::template_params),
                )
                .route(
                    "/frame/template/preview",
                    web::get().to(handlers::template_preview),
                )
                .route("/frame/render", web::post().to(handlers::render_frame))
                .route("/workflows", web::get().to(handlers::list_workflows))
                .route(
                    "/workflows/digital-human",
                    web::get().to(handlers::digital_human_workflows),
                )
                .route("/tts/voices", web::get().to(handlers::tts_voices))
                .route("/pipelines", web::get().to(handlers::pipelines))
                .route("/comfyui/status", web::get().to(handlers::comfyui_status))
                .route("/llm/models", web::get().to(handlers::llm_models))
                .route("/llm/chat", web::post().to(handlers::llm_chat)),
        )
}

pub fn create_web_app(
    app_service: Arc<service::AppService>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .app_data(Data::from(app_service))
        .route("/", web::get().to(settings::index))
        .route("/settings", web::post().to(settings::save_settings))
        .route("/health", web::get().to(handlers::health))
}
