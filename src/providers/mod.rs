mod prompt;
mod response;
mod worker;

pub use prompt::{
    build_preferences_prompt, build_text_prompt, RecipePreferences, RECIPE_FROM_PREFERENCES_PROMPT,
    RECIPE_FROM_TEXT_PROMPT, RESPONSE_FORMAT,
};
pub use response::{parse_endpoint_body, parse_recipe_json};
pub use worker::WorkerEndpoint;

use crate::error::Result;
use crate::model::NormalizedRecipe;
use async_trait::async_trait;

/// A remote service that turns a prompt into a recipe-bearing response.
#[async_trait]
pub trait GenerativeEndpoint: Send + Sync {
    /// Short name for log lines (e.g. "worker")
    fn endpoint_name(&self) -> &str;

    /// Top-level response field that carries the recipe JSON
    fn response_field(&self) -> &str;

    /// Send `prompt` and return the raw response body.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Send a prompt and parse the structured recipe out of the reply.
pub async fn request_recipe(
    endpoint: &dyn GenerativeEndpoint,
    prompt: &str,
) -> Result<NormalizedRecipe> {
    let body = endpoint.complete(prompt).await?;
    parse_endpoint_body(&body, endpoint.response_field())
}
