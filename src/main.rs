use std::path::PathBuf;
use std::sync::Arc;

use actix_web::HttpServer;
use clap::{Args, Parser, Subcommand};

use pixelle_video::app;
use pixelle_video::config::{AppConfig, ConfigLoader, ConfigUpdate, FileConfigLoader};
use pixelle_video::errors::PixelleError;
use pixelle_video::frame::{ChromeRenderer, HtmlRenderer};
use pixelle_video::launcher::{self, LaunchMode};
use pixelle_video::layout::{PortableLayout, Severity};
use pixelle_video::service::{self, AppService};
use pixelle_video::tools;

#[derive(Parser)]
#[command(name = "pixelle", version, about = "Pixelle-Video portable launcher and servers")]
struct Cli {
    /// Portable root holding tools/, data/, output/ and Pixelle-Video/.
    #[arg(long, env = "PIXELLE_HOME", global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web UI (or the mode implied by the calling launch script).
    Start {
        #[arg(long, value_enum)]
        mode: Option<LaunchMode>,
        /// Name of the launch script, e.g. start_api.bat.
        #[arg(long)]
        script: Option<String>,
    },
    /// Settings web UI.
    Web {
        #[arg(long)]
        port: Option<u16>,
    },
    /// JSON API server.
    Api {
        #[arg(long)]
        port: Option<u16>,
    },
    /// API server and web UI in one process.
    All,
    /// Check folders, ports and external tools.
    Check,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print config.yaml with secrets masked.
    Show,
    /// Update fields and save config.yaml.
    Set(ConfigSetArgs),
}

#[derive(Args)]
struct ConfigSetArgs {
    #[arg(long)]
    llm_api_key: Option<String>,
    #[arg(long)]
    llm_base_url: Option<String>,
    #[arg(long)]
    llm_model: Option<String>,
    #[arg(long)]
    comfyui_url: Option<String>,
    /// Pass an empty string to clear.
    #[arg(long)]
    runninghub_api_key: Option<String>,
    #[arg(long)]
    tts_voice: Option<String>,
    #[arg(long)]
    tts_speed: Option<f32>,
}

impl From<ConfigSetArgs> for ConfigUpdate {
    fn from(args: ConfigSetArgs) -> Self {
        ConfigUpdate {
            llm_api_key: args.llm_api_key,
            llm_base_url: args.llm_base_url,
            llm_model: args.llm_model,
            comfyui_url: args.comfyui_url,
            runninghub_api_key: args.runninghub_api_key,
            tts_voice: args.tts_voice,
            tts_speed: args.tts_speed,
        }
    }
}

fn io_error(e: PixelleError) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

fn build_service(layout: &PortableLayout) -> Result<Arc<AppService>, PixelleError> {
    let loader = Arc::new(FileConfigLoader::new(layout.config_path()));
    let renderer = tools::locate_browser()
        .map(|browser| Arc::new(ChromeRenderer::new(browser)) as Arc<dyn HtmlRenderer>);
    if renderer.is_none() {
        log::warn!("no browser found, frame rendering is disabled");
    }
    let http_client = service::build_http_client()?;
    Ok(Arc::new(AppService::new(
        layout.clone(),
        loader,
        http_client,
        renderer,
    )?))
}

async fn serve(
    layout: &PortableLayout,
    mode: LaunchMode,
    config: AppConfig,
) -> std::io::Result<()> {
    let report = launcher::preflight(layout, &config, Some(mode)).await;
    report.log();
    if !report.is_ready() {
        return Err(io_error(PixelleError::ConfigError(
            "startup checks failed, see errors above".to_string(),
        )));
    }

    // `--port` overrides live only in `config`; the service keeps the saved ports.
    let app_service = build_service(layout).map_err(io_error)?;
    layout.ensure_output_dir().map_err(io_error)?;

    let host = config.server.host.clone();
    let api_service = app_service.clone();
    let web_service = app_service;

    match mode {
        LaunchMode::Api => {
            log::info!("API server on {}", launcher::api_url(&config));
            HttpServer::new(move || app::create_api_app(api_service.clone()))
                .bind((host.as_str(), config.server.api_port))?
                .run()
                .await
        }
        LaunchMode::Web => {
            log::info!("web UI on {}", launcher::web_url(&config));
            HttpServer::new(move || app::create_web_app(web_service.clone()))
                .bind((host.as_str(), config.server.web_port))?
                .run()
                .await
        }
        LaunchMode::All => {
            log::info!(
                "API server on {}, web UI on {}",
                launcher::api_url(&config),
                launcher::web_url(&config)
            );
            let api = HttpServer::new(move || app::create_api_app(api_service.clone()))
                .bind((host.as_str(), config.server.api_port))?
                .run();
            let web = HttpServer::new(move || app::create_web_app(web_service.clone()))
                .bind((host.as_str(), config.server.web_port))?
                .run();
            tokio::try_join!(api, web)?;
            Ok(())
        }
    }
}

async fn check(layout: &PortableLayout, config: &AppConfig) -> std::io::Result<()> {
    let report = launcher::preflight(layout, config, Some(LaunchMode::All)).await;
    for item in &report.items {
        let tag = match item.severity {
            None => "ok",
            Some(Severity::Warning) => "warn",
            Some(Severity::Error) => "error",
        };
        println!("[{tag:>5}] {:<16} {}", item.name, item.detail);
    }
    if report.is_ready() {
        println!("ready: open {}", launcher::web_url(config));
        Ok(())
    } else {
        Err(io_error(PixelleError::ConfigError(
            "environment is not ready".to_string(),
        )))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let layout = match cli.home {
        Some(home) => PortableLayout::new(home),
        None => PortableLayout::discover().map_err(io_error)?,
    };
    let loader = FileConfigLoader::new(layout.config_path());
    let mut config = loader.load_config().map_err(io_error)?;

    match cli.command.unwrap_or(Command::Start {
        mode: None,
        script: None,
    }) {
        Command::Start { mode, script } => {
            let mode = mode
                .or_else(|| script.as_deref().and_then(LaunchMode::from_script))
                .unwrap_or(LaunchMode::Web);
            serve(&layout, mode, config).await
        }
        Command::Web { port } => {
            if let Some(port) = port {
                config.server.web_port = port;
            }
            serve(&layout, LaunchMode::Web, config).await
        }
        Command::Api { port } => {
            if let Some(port) = port {
                config.server.api_port = port;
            }
            serve(&layout, LaunchMode::Api, config).await
        }
        Command::All => serve(&layout, LaunchMode::All, config).await,
        Command::Check => check(&layout, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let yaml = serde_yaml::to_string(&config.redacted())
                    .map_err(|e| io_error(e.into()))?;
                println!("# {}", loader.path().display());
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Set(args) => {
                let updated = config
                    .apply_update(&ConfigUpdate::from(args))
                    .map_err(io_error)?;
                loader.save_config(&updated).map_err(io_error)?;
                println!("saved {}", loader.path().display());
                Ok(())
            }
        },
    }
}
