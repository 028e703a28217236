use std::path::Path;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::error::{RecipeError, Result};
use crate::fetchers::RequestFetcher;
use crate::model::NormalizedRecipe;
use crate::ocr::{read_image, GoogleVisionOcr};
use crate::pipelines;
use crate::providers::{RecipePreferences, WorkerEndpoint};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Fetch recipe from a URL
    Url(String),
    /// Structure pasted or typed recipe text
    Text(String),
    /// Image file (will be OCR'd, then structured like text)
    Image(String),
    /// Generate a new recipe from preferences
    Preferences(RecipePreferences),
}

/// Builder for configuring and executing recipe imports
#[derive(Debug, Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    config: Option<PipelineConfig>,
    timeout: Option<Duration>,
    endpoint_url: Option<String>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_normalize::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to plain text
    ///
    /// The text is sent to the generative endpoint, which structures it
    /// without translating it.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    /// Set the input source to an image file
    ///
    /// Requires a Vision API key in the config or `GOOGLE_API_KEY`.
    pub fn image(mut self, image_path: impl Into<String>) -> Self {
        self.source = Some(InputSource::Image(image_path.into()));
        self
    }

    /// Generate a recipe from preferences instead of importing one
    ///
    /// # Example
    /// ```
    /// use recipe_normalize::{RecipeImporter, RecipePreferences};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .preferences(RecipePreferences::new("a quick lentil soup"));
    /// ```
    pub fn preferences(mut self, preferences: RecipePreferences) -> Self {
        self.source = Some(InputSource::Preferences(preferences));
        self
    }

    /// Use this configuration instead of loading one from file and environment
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for every HTTP request
    ///
    /// # Example
    /// ```
    /// use recipe_normalize::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the generative endpoint URL
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    fn endpoint(&self, config: &PipelineConfig) -> Result<WorkerEndpoint> {
        let mut endpoint_config = config.endpoint.clone();
        if let Some(url) = &self.endpoint_url {
            endpoint_config.base_url = url.clone();
        }
        match self.timeout {
            Some(timeout) => WorkerEndpoint::with_timeout(&endpoint_config, timeout),
            None => WorkerEndpoint::new(&endpoint_config),
        }
    }

    /// Build and execute the recipe import operation
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - No input source was specified
    /// - The text is empty or the preferences name neither idea nor ingredients
    /// - The page fetch, OCR, or endpoint call fails
    /// - No recipe could be extracted
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_normalize::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipe = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .build()
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<NormalizedRecipe> {
        // Validate that source is set
        let source = self.source.take().ok_or_else(|| {
            RecipeError::InvalidInput(
                "No input source specified. Use .url(), .text(), .image() or .preferences()"
                    .to_string(),
            )
        })?;

        let config = match self.config.take() {
            Some(config) => config,
            None => PipelineConfig::load()?,
        };

        match source {
            InputSource::Url(url) => {
                let fetcher = match self.timeout {
                    Some(timeout) => RequestFetcher::with_timeout(&config.fetch, timeout)?,
                    None => RequestFetcher::new(&config.fetch)?,
                };
                pipelines::url::process(&fetcher, &url).await
            }
            InputSource::Text(text) => {
                let endpoint = self.endpoint(&config)?;
                pipelines::text::process(&endpoint, &text).await
            }
            InputSource::Image(image_path) => {
                let image = read_image(Path::new(&image_path)).await?;
                let ocr = GoogleVisionOcr::new(&config.ocr);
                let endpoint = self.endpoint(&config)?;
                pipelines::image::process(&ocr, &endpoint, &image).await
            }
            InputSource::Preferences(preferences) => {
                let endpoint = self.endpoint(&config)?;
                pipelines::generate::process(&endpoint, &preferences).await
            }
        }
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_normalize::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
