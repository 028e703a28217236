use crate::error::{RecipeError, Result};
use crate::model::NormalizedRecipe;
use crate::providers::{
    build_preferences_prompt, request_recipe, GenerativeEndpoint, RecipePreferences,
};
use log::debug;

/// Generate a new recipe from structured preferences.
pub async fn process(
    endpoint: &dyn GenerativeEndpoint,
    preferences: &RecipePreferences,
) -> Result<NormalizedRecipe> {
    if !preferences.is_actionable() {
        return Err(RecipeError::InvalidInput(
            "a recipe idea or available ingredients are required".to_string(),
        ));
    }

    debug!("Generating recipe via {}", endpoint.endpoint_name());
    request_recipe(endpoint, &build_preferences_prompt(preferences)).await
}
