use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiFailure { status: u16, body: String },

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Base64 decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("External tool '{tool}' not found: {source}")]
    ToolNotFound {
        tool: String,
        source: std::io::Error,
    },

    #[error("External tool '{tool}' failed (exit code {exit_code:?}): {stderr}")]
    ToolFailed {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to parse tool output: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: \"{value}\" ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl MediaError {
    /// Short hint printed by the binaries next to the error itself.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MediaError::IoError(_) => "Check that the path exists and is readable/writable",
            MediaError::ApiError(_) => "Check your network connection and the endpoint URL",
            MediaError::ApiFailure { .. } => {
                "Check the API key and region; the response body has details"
            }
            MediaError::ToolNotFound { .. } => "Install the tool or make sure it is on your PATH",
            MediaError::ToolFailed { .. } => "Inspect the tool's stderr output above",
            MediaError::ParseError { .. } => {
                "The tool produced unexpected output; rerun with --verbose"
            }
            MediaError::ConfigError { .. } | MediaError::InvalidConfigValueError { .. } => {
                "Run with --help for usage information"
            }
            _ => "Rerun with --verbose for more detail",
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;
