use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("API request to {url} failed with status: {status}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Unexpected response shape: {message}")]
    UnexpectedShape { message: String },
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Timeout { .. } => true,
            ApiError::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// 給 CLI 使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "Check that the endpoint is reachable and the URL is correct",
            ApiError::Timeout { .. } => "Increase the timeout or check the server latency",
            ApiError::Status { .. } => "Inspect the server logs; the endpoint rejected the request",
            ApiError::Io(_) => "Check that the file exists and is readable",
            ApiError::Serialization(_) => "Make sure the input is valid JSON",
            ApiError::ConfigError { .. } | ApiError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            ApiError::SelectorError { .. } => "Use a valid CSS selector, e.g. '#app' or 'main'",
            ApiError::UnexpectedShape { .. } => {
                "The endpoint returned data that does not match the expected type"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
