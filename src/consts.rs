pub const API_PORT: u16 = 8000;
pub const WEB_PORT: u16 = 8501;
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_COMFYUI_URL: &str = "http://127.0.0.1:8188";

pub const DEFAULT_TTS_VOICE: &str = "zh-CN-YunjianNeural";
pub const DEFAULT_TTS_SPEED: f32 = 1.2;
pub const MIN_TTS_SPEED: f32 = 0.5;
pub const MAX_TTS_SPEED: f32 = 2.0;

pub const RUNTIME_DIR: &str = "python";
pub const TOOLS_DIR: &str = "tools";
pub const APP_DIR: &str = "Pixelle-Video";
pub const DATA_DIR: &str = "data";
pub const OUTPUT_DIR: &str = "output";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ENV_HOME: &str = "PIXELLE_HOME";
pub const ENV_CONFIG: &str = "PIXELLE_CONFIG";
pub const ENV_LLM_API_KEY: &str = "PIXELLE_LLM_API_KEY";
pub const ENV_CHROME: &str = "PIXELLE_CHROME";

pub(crate) const CONNECT_TIMEOUT_SECS: u64 = 30;
pub(crate) const READ_TIMEOUT_SECS: u64 = 120;
pub(crate) const STATUS_TIMEOUT_SECS: u64 = 5;

pub const DIGITAL_IMAGE_WORKFLOW: &str = "runninghub/digital_image.json";
pub const DIGITAL_COMBINATION_WORKFLOW: &str = "runninghub/digital_combination.json";

pub(crate) const CHROME_FLAGS: &[&str] = &[
    "--headless=new",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-software-rasterizer",
    "--disable-extensions",
    "--disable-setuid-sandbox",
    "--disable-dbus",
    "--hide-scrollbars",
    "--mute-audio",
    "--disable-background-networking",
    "--disable-features=TranslateUI",
    "--disable-ipc-flooding-protection",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
];
