use crate::error::{RecipeError, Result};
use crate::model::NormalizedRecipe;
use crate::providers::{build_text_prompt, request_recipe, GenerativeEndpoint};
use log::debug;

/// Structure free text (pasted or OCR-extracted) into a recipe through the
/// generative endpoint. The text's language is preserved.
pub async fn process(endpoint: &dyn GenerativeEndpoint, text: &str) -> Result<NormalizedRecipe> {
    if text.trim().is_empty() {
        return Err(RecipeError::InvalidInput("recipe text is empty".to_string()));
    }

    debug!(
        "Structuring {} characters of text via {}",
        text.len(),
        endpoint.endpoint_name()
    );
    request_recipe(endpoint, &build_text_prompt(text)).await
}
