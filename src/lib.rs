//! Normalize recipes from web pages, scanned or pasted text, and cooking
//! preferences into one structured [`NormalizedRecipe`].
//!
//! Web pages are read from their schema.org JSON-LD, with a markup
//! heuristic as fallback. Text, photos and preferences go through a
//! generative endpoint whose JSON reply is parsed leniently.

pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetchers;
mod lenient;
pub mod model;
pub mod ocr;
pub mod pipelines;
pub mod providers;

pub use builder::{InputSource, RecipeImporter, RecipeImporterBuilder};
pub use crate::config::PipelineConfig;
pub use error::{RecipeError, Result};
pub use model::{Difficulty, Ingredient, Instruction, NormalizedRecipe, NutritionInfo};
pub use providers::RecipePreferences;

/// Import a recipe from a web page.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = recipe_normalize::import_from_url("https://example.com/recipe").await?;
/// println!("{} ({})", recipe.title, recipe.formatted_total_time());
/// # Ok(())
/// # }
/// ```
pub async fn import_from_url(url: &str) -> Result<NormalizedRecipe> {
    RecipeImporter::builder().url(url).build().await
}

/// Structure recipe text through the generative endpoint.
pub async fn recipe_from_text(text: &str) -> Result<NormalizedRecipe> {
    RecipeImporter::builder().text(text).build().await
}

/// OCR a recipe photo and structure the recognized text.
pub async fn recipe_from_image(path: &str) -> Result<NormalizedRecipe> {
    RecipeImporter::builder().image(path).build().await
}

/// Generate a new recipe from preferences.
pub async fn recipe_from_preferences(preferences: RecipePreferences) -> Result<NormalizedRecipe> {
    RecipeImporter::builder()
        .preferences(preferences)
        .build()
        .await
}
