use crate::model::Difficulty;

/// JSON shape every generative prompt asks the model to return.
pub const RESPONSE_FORMAT: &str = include_str!("response_format.txt");

/// Template for turning OCR or pasted text into a recipe.
///
/// Contains `{{TEXT}}` and `{{FORMAT}}` placeholders, filled by
/// [`build_text_prompt`].
pub const RECIPE_FROM_TEXT_PROMPT: &str = include_str!("recipe_from_text.txt");

/// Template for generating a recipe from structured preferences.
///
/// Contains `{{REQUIREMENTS}}` and `{{FORMAT}}` placeholders, filled by
/// [`build_preferences_prompt`].
pub const RECIPE_FROM_PREFERENCES_PROMPT: &str = include_str!("recipe_from_preferences.txt");

/// Value the input form uses for "no preference".
pub const UNSPECIFIED: &str = "Any";

/// Structured inputs for generating a new recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePreferences {
    /// Free-text idea, e.g. "a spicy pasta dish"
    pub idea: String,
    /// Comma separated ingredients the cook already has
    pub available_ingredients: String,
    pub cuisine: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub meal_type: Option<String>,
    pub servings: u32,
    pub max_cooking_minutes: u32,
}

impl Default for RecipePreferences {
    fn default() -> Self {
        Self {
            idea: String::new(),
            available_ingredients: String::new(),
            cuisine: None,
            difficulty: None,
            meal_type: None,
            servings: 4,
            max_cooking_minutes: 30,
        }
    }
}

impl RecipePreferences {
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            ..Default::default()
        }
    }

    /// A request needs at least an idea or some available ingredients.
    pub fn is_actionable(&self) -> bool {
        !self.idea.trim().is_empty() || !self.available_ingredients.trim().is_empty()
    }

    fn requirement_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(idea) = specified(Some(self.idea.as_str())) {
            lines.push(format!("Recipe idea: {idea}"));
        }
        if let Some(ingredients) = specified(Some(self.available_ingredients.as_str())) {
            lines.push(format!("Available ingredients: {ingredients}"));
        }
        if let Some(cuisine) = specified(self.cuisine.as_deref()) {
            lines.push(format!("Cuisine: {cuisine}"));
        }
        if let Some(difficulty) = self.difficulty {
            lines.push(format!("Difficulty: {difficulty}"));
        }
        if let Some(meal_type) = specified(self.meal_type.as_deref()) {
            lines.push(format!("Meal type: {meal_type}"));
        }
        lines.push(format!("Servings: {}", self.servings));
        lines.push(format!(
            "Maximum cooking time: {} minutes",
            self.max_cooking_minutes
        ));

        lines
    }
}

/// Treat empty strings and the form's "Any" choice as unspecified.
fn specified(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(UNSPECIFIED))
}

/// Build the prompt that structures OCR-extracted or pasted recipe text.
pub fn build_text_prompt(extracted_text: &str) -> String {
    RECIPE_FROM_TEXT_PROMPT
        .replace("{{FORMAT}}", RESPONSE_FORMAT.trim_end())
        .replace("{{TEXT}}", extracted_text.trim())
}

/// Build the prompt that generates a recipe from user preferences.
pub fn build_preferences_prompt(preferences: &RecipePreferences) -> String {
    RECIPE_FROM_PREFERENCES_PROMPT
        .replace("{{FORMAT}}", RESPONSE_FORMAT.trim_end())
        .replace("{{REQUIREMENTS}}", &preferences.requirement_lines().join("\n"))
}
