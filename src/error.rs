use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Errors surfaced by the API client. All of them are terminal for the
/// current operation; the client never retries.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP exchange itself failed (connect, send, timeout, body read).
    #[error("request failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response body did not decode as any shape we know.
    #[error("failed to parse response: {message}")]
    Format { endpoint: String, message: String },
    /// osTicket answered with `status: "Error"`.
    #[error("API error: {message}")]
    Upstream { message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CLI not configured. {hint}")]
    NotConfigured { hint: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration parse error at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Configuration directory not found")]
    DirUnavailable,
}

impl ConfigError {
    pub fn not_configured() -> Self {
        ConfigError::NotConfigured {
            hint: "Run: osticket config set --url <url> --key <apiKey>".to_string(),
        }
    }
}
