use thiserror::Error;

/// Errors that can occur while normalizing a recipe
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The source URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A remote server answered with a non-success status
    #[error("Server error (HTTP {0})")]
    ServerError(u16),

    /// A response body could not be decoded into the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// No extraction strategy produced a usable recipe
    #[error("Failed to parse recipe data: {0}")]
    ParsingError(String),

    /// Transport-level failure (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The caller supplied input that cannot start a pipeline
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, RecipeError>;
