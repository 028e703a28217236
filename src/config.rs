use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default generative endpoint (a worker that fronts the language model)
pub const DEFAULT_ENDPOINT_URL: &str = "https://recipeappphotoparser.green-snow-173b.workers.dev/";

/// Main pipeline configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PipelineConfig {
    /// Remote generative endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Outbound page fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// OCR collaborator settings
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Configuration for the remote generative endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    /// URL the prompt is POSTed to
    #[serde(default = "default_endpoint_url")]
    pub base_url: String,
    /// Token budget sent with every prompt
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_endpoint_timeout")]
    pub timeout: u64,
    /// Top-level field of the response body holding the recipe JSON
    #[serde(default = "default_response_field")]
    pub response_field: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_endpoint_url(),
            max_tokens: default_max_tokens(),
            timeout: default_endpoint_timeout(),
            response_field: default_response_field(),
        }
    }
}

/// Configuration for fetching recipe pages
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
    /// Browser identity sent as User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept header value
    #[serde(default = "default_accept")]
    pub accept: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
            accept: default_accept(),
        }
    }
}

/// Configuration for the OCR collaborator
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// Recognition languages, most preferred first
    #[serde(default = "default_ocr_languages")]
    pub languages: Vec<String>,
    /// Vision API base URL (for proxies and tests)
    #[serde(default = "default_ocr_base_url")]
    pub base_url: String,
    /// API key (can also be set via GOOGLE_API_KEY)
    pub api_key: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_ocr_languages(),
            base_url: default_ocr_base_url(),
            api_key: None,
        }
    }
}

// Default value functions
fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_endpoint_timeout() -> u64 {
    30
}

fn default_response_field() -> String {
    "coverLetter".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9".to_string()
}

fn default_ocr_languages() -> Vec<String> {
    vec!["en-US".to_string(), "tr-TR".to_string()]
}

fn default_ocr_base_url() -> String {
    "https://vision.googleapis.com".to_string()
}

impl PipelineConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_NORMALIZE__ prefix
    /// 2. recipe-normalize.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_NORMALIZE__ENDPOINT__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`PipelineConfig::load`] for the priority order.
pub fn load_config() -> Result<PipelineConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-normalize").required(false))
        // Use double underscore for nested: RECIPE_NORMALIZE__FETCH__TIMEOUT
        .add_source(
            Environment::with_prefix("RECIPE_NORMALIZE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_max_tokens(), 1500);
        assert_eq!(default_endpoint_timeout(), 30);
        assert_eq!(default_fetch_timeout(), 10);
        assert_eq!(default_response_field(), "coverLetter");
        assert_eq!(default_ocr_languages(), vec!["en-US", "tr-TR"]);
    }

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.endpoint.base_url, DEFAULT_ENDPOINT_URL);
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.fetch.accept.contains("text/html"));
        assert!(config.ocr.api_key.is_none());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: PipelineConfig = Config::builder()
            .add_source(config::File::from_str(
                "[endpoint]\nbase_url = \"http://localhost:8787/\"\n\n[fetch]\ntimeout = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.endpoint.base_url, "http://localhost:8787/");
        assert_eq!(config.endpoint.max_tokens, 1500);
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.ocr.languages.len(), 2);
    }

    #[test]
    fn test_load_config_without_file() {
        // Every field has a default, so loading never requires a file
        let result = load_config();
        assert!(result.is_ok());
    }
}
