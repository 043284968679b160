use std::fmt;

#[derive(Debug, Clone)]
pub enum PixelleError {
    ValidationError(String),
    ApiError(String),
    ParseError(String),
    ConfigError(String),
    NetworkError(String),
    NotFound(String),
    RenderError(String),
    PortInUse(String),
}

impl fmt::Display for PixelleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelleError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            PixelleError::ApiError(msg) => write!(f, "API error: {}", msg),
            PixelleError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            PixelleError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            PixelleError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            PixelleError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PixelleError::RenderError(msg) => write!(f, "Render error: {}", msg),
            PixelleError::PortInUse(msg) => write!(f, "Port in use: {}", msg),
        }
    }
}

impl std::error::Error for PixelleError {}

impl PixelleError {
    /// Message without the category prefix, used for `{"detail": ...}` bodies.
    pub fn detail(&self) -> &str {
        match self {
            PixelleError::ValidationError(msg)
            | PixelleError::ApiError(msg)
            | PixelleError::ParseError(msg)
            | PixelleError::ConfigError(msg)
            | PixelleError::NetworkError(msg)
            | PixelleError::NotFound(msg)
            | PixelleError::RenderError(msg)
            | PixelleError::PortInUse(msg) => msg,
        }
    }
}

impl From<String> for PixelleError {
    fn from(msg: String) -> Self {
        PixelleError::ValidationError(msg)
    }
}

impl From<&str> for PixelleError {
    fn from(msg: &str) -> Self {
        PixelleError::ValidationError(msg.to_string())
    }
}

impl From<reqwest::Error> for PixelleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            PixelleError::NetworkError(err.to_string())
        } else {
            PixelleError::ApiError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PixelleError {
    fn from(err: serde_json::Error) -> Self {
        PixelleError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for PixelleError {
    fn from(err: serde_yaml::Error) -> Self {
        PixelleError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for PixelleError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => PixelleError::NotFound(err.to_string()),
            std::io::ErrorKind::AddrInUse => PixelleError::PortInUse(err.to_string()),
            _ => PixelleError::ConfigError(err.to_string()),
        }
    }
}
