use crate::error::{RecipeError, Result};
use crate::lenient::{lenient, whole_number, OneOrMany, TextValue};
use crate::model::{Difficulty, Ingredient, Instruction, NormalizedRecipe, NutritionInfo};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_SERVINGS: u32 = 4;
pub const DEFAULT_PREP_MINUTES: u32 = 15;
pub const DEFAULT_COOK_MINUTES: u32 = 30;
pub const DEFAULT_QUANTITY: f64 = 1.0;
pub const DEFAULT_UNIT: &str = "piece";

/// The recipe JSON the model is asked to produce. Every field is optional
/// and a value of the wrong type counts as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelRecipe {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    servings: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    prep_time_minutes: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    cook_time_minutes: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    categories: Option<OneOrMany<TextValue>>,
    #[serde(default, deserialize_with = "lenient")]
    cuisine_types: Option<OneOrMany<TextValue>>,
    #[serde(default, deserialize_with = "lenient")]
    dietary_info: Option<OneOrMany<TextValue>>,
    #[serde(default, deserialize_with = "lenient")]
    ingredients: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    instructions: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    nutrition_per_serving: Option<ModelNutrition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelIngredient {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInstruction {
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    timer_minutes: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelNutrition {
    #[serde(default, deserialize_with = "lenient")]
    calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient", alias = "carbohydrates")]
    carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    fiber: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    sodium: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    saturated_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    cholesterol: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    sugar: Option<f64>,
}

fn texts(value: Option<OneOrMany<TextValue>>) -> Vec<String> {
    value
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(TextValue::into_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

fn ingredient(entry: Value) -> Option<Ingredient> {
    let parsed = match entry {
        // A bare line is kept whole as the ingredient name
        Value::String(name) => ModelIngredient {
            name: Some(name),
            ..Default::default()
        },
        Value::Object(_) => serde_json::from_value(entry).ok()?,
        _ => return None,
    };

    Some(Ingredient {
        name: parsed.name.map(|n| n.trim().to_string()).unwrap_or_default(),
        quantity: parsed
            .quantity
            .filter(|q| *q >= 0.0)
            .unwrap_or(DEFAULT_QUANTITY),
        unit: parsed
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
    })
}

fn instruction_parts(entry: Value) -> Option<ModelInstruction> {
    match entry {
        Value::String(text) => Some(ModelInstruction {
            text: Some(text),
            timer_minutes: None,
        }),
        Value::Object(_) => serde_json::from_value(entry).ok(),
        _ => None,
    }
}

fn nutrition(model: ModelNutrition) -> (Option<NutritionInfo>, Option<u32>) {
    let calories = model
        .calories
        .filter(|c| *c >= 0.0 && *c <= f64::from(u32::MAX))
        .map(|c| c.round() as u32);

    let info = NutritionInfo {
        protein: model.protein,
        carbohydrates: model.carbs,
        fat: model.fat,
        fiber: model.fiber,
        sodium: model.sodium,
        saturated_fat: model.saturated_fat,
        cholesterol: model.cholesterol,
        sugar: model.sugar,
    };

    ((!info.is_empty()).then_some(info), calories)
}

/// Map the model's recipe JSON onto the normalized schema.
///
/// Never fails: every missing or malformed field falls back to its
/// documented default. Instructions are numbered by their position in the
/// response array, whatever numbering their text carries.
pub fn parse_recipe_json(json: &Value) -> NormalizedRecipe {
    let model: ModelRecipe = match json {
        Value::Object(_) => serde_json::from_value(json.clone()).unwrap_or_default(),
        _ => ModelRecipe::default(),
    };

    let ingredients: Vec<Ingredient> = model
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .filter_map(ingredient)
        .collect();

    let instructions: Vec<Instruction> = model
        .instructions
        .unwrap_or_default()
        .into_iter()
        .filter_map(instruction_parts)
        .enumerate()
        .map(|(index, step)| Instruction {
            step_number: index as u32 + 1,
            text: step.text.map(|t| t.trim().to_string()).unwrap_or_default(),
            timer_minutes: step.timer_minutes.as_ref().and_then(whole_number),
        })
        .collect();

    let (nutrition, calories) = model
        .nutrition_per_serving
        .map(nutrition)
        .unwrap_or((None, None));

    let recipe = NormalizedRecipe {
        title: model
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: model.description.map(|d| d.trim().to_string()).unwrap_or_default(),
        ingredients,
        instructions,
        prep_time_minutes: model
            .prep_time_minutes
            .as_ref()
            .and_then(whole_number)
            .unwrap_or(DEFAULT_PREP_MINUTES),
        cook_time_minutes: model
            .cook_time_minutes
            .as_ref()
            .and_then(whole_number)
            .unwrap_or(DEFAULT_COOK_MINUTES),
        servings: model
            .servings
            .as_ref()
            .and_then(whole_number)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_SERVINGS),
        difficulty: model
            .difficulty
            .as_deref()
            .and_then(Difficulty::from_label)
            .unwrap_or_default(),
        categories: texts(model.categories),
        cuisine_types: texts(model.cuisine_types),
        dietary_info: texts(model.dietary_info),
        nutrition,
        calories,
    };

    debug!(
        "Parsed model recipe '{}' with {} ingredients and {} steps",
        recipe.title,
        recipe.ingredients.len(),
        recipe.instructions.len()
    );
    recipe
}

/// Decode a JSON object the model returned as a string, optionally inside a
/// Markdown code fence.
fn decode_embedded_json(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    match serde_json::from_str::<Value>(unfenced.trim()) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(RecipeError::InvalidResponse(
            "embedded recipe is not a JSON object".to_string(),
        )),
        Err(e) => Err(RecipeError::InvalidResponse(format!(
            "embedded recipe is not valid JSON: {e}"
        ))),
    }
}

/// Parse a raw endpoint response body.
///
/// Fails with [`RecipeError::InvalidResponse`] only when the body is not
/// JSON or lacks the `wrapper_field` that carries the recipe.
pub fn parse_endpoint_body(body: &str, wrapper_field: &str) -> Result<NormalizedRecipe> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        warn!("Endpoint response is not JSON: {}", e);
        RecipeError::InvalidResponse(format!("response is not JSON: {e}"))
    })?;

    let payload = json.get(wrapper_field).ok_or_else(|| {
        warn!("Endpoint response has no '{}' field", wrapper_field);
        RecipeError::InvalidResponse(format!("missing '{wrapper_field}' field"))
    })?;

    match payload {
        Value::Object(_) => Ok(parse_recipe_json(payload)),
        Value::String(text) => Ok(parse_recipe_json(&decode_embedded_json(text)?)),
        _ => Err(RecipeError::InvalidResponse(format!(
            "'{wrapper_field}' does not hold a recipe object"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_optional_fields_omitted() {
        let recipe = parse_recipe_json(&json!({
            "ingredients": [{"name": "flour"}],
            "instructions": [{"text": "Mix"}]
        }));

        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.prep_time_minutes, 15);
        assert_eq!(recipe.cook_time_minutes, 30);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.ingredients[0].quantity, 1.0);
        assert_eq!(recipe.ingredients[0].unit, "piece");
        assert!(recipe.instructions[0].timer_minutes.is_none());
        assert!(recipe.categories.is_empty());
        assert!(recipe.cuisine_types.is_empty());
        assert!(recipe.dietary_info.is_empty());
        assert!(recipe.nutrition.is_none());
        assert!(recipe.calories.is_none());
    }

    #[test]
    fn test_empty_payload_still_yields_record() {
        let recipe = parse_recipe_json(&json!({}));
        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());

        let recipe = parse_recipe_json(&json!(["Soup", "an", "object"]));
        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.servings, 4);
    }

    #[test]
    fn test_full_payload() {
        let recipe = parse_recipe_json(&json!({
            "title": "Mercimek Çorbası",
            "description": "Klasik kırmızı mercimek çorbası",
            "servings": 6,
            "prepTimeMinutes": 10,
            "cookTimeMinutes": 35,
            "difficulty": "Easy",
            "categories": ["Lunch"],
            "cuisineTypes": ["Turkish"],
            "dietaryInfo": ["Vegan"],
            "ingredients": [
                {"name": "kırmızı mercimek", "quantity": 1.5, "unit": "su bardağı"},
                {"name": "soğan", "quantity": 1, "unit": "adet"}
            ],
            "instructions": [
                {"text": "Soğanı kavurun", "timerMinutes": 5},
                {"text": "Mercimeği ekleyin", "timerMinutes": null}
            ],
            "nutritionPerServing": {
                "calories": 180,
                "protein": 9,
                "carbs": 28.5,
                "fat": 3,
                "saturatedFat": 0.5
            }
        }));

        assert_eq!(recipe.title, "Mercimek Çorbası");
        assert_eq!(recipe.servings, 6);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.ingredients[0].unit, "su bardağı");
        assert_eq!(recipe.ingredients[0].quantity, 1.5);
        assert_eq!(recipe.ingredients[1].quantity, 1.0);
        assert_eq!(recipe.instructions[0].timer_minutes, Some(5));
        assert_eq!(recipe.instructions[1].timer_minutes, None);
        assert_eq!(recipe.calories, Some(180));

        let nutrition = recipe.nutrition.unwrap();
        assert_eq!(nutrition.protein, Some(9.0));
        assert_eq!(nutrition.carbohydrates, Some(28.5));
        assert_eq!(nutrition.saturated_fat, Some(0.5));
        assert!(nutrition.fiber.is_none());
        assert!(nutrition.sugar.is_none());
    }

    #[test]
    fn test_instructions_numbered_by_position() {
        let recipe = parse_recipe_json(&json!({
            "instructions": [
                {"text": "3. Serve", "stepNumber": 3},
                {"text": "1. Boil", "stepNumber": 1},
                "Rest"
            ]
        }));
        let numbers: Vec<_> = recipe.instructions.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(recipe.instructions[0].text, "3. Serve");
        assert_eq!(recipe.instructions[2].text, "Rest");
    }

    #[test]
    fn test_malformed_fields_use_defaults() {
        let recipe = parse_recipe_json(&json!({
            "title": 42,
            "servings": "four",
            "prepTimeMinutes": -5,
            "cookTimeMinutes": "long",
            "difficulty": "Impossible",
            "categories": "Dinner",
            "ingredients": [
                {"name": "salt", "quantity": "a pinch", "unit": 3},
                {"name": "water", "quantity": -1},
                17
            ],
            "nutritionPerServing": "unknown"
        }));

        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.prep_time_minutes, 15);
        assert_eq!(recipe.cook_time_minutes, 30);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.categories, vec!["Dinner"]);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].quantity, 1.0);
        assert_eq!(recipe.ingredients[0].unit, "piece");
        assert_eq!(recipe.ingredients[1].quantity, 1.0);
        assert!(recipe.nutrition.is_none());
    }

    #[test]
    fn test_hard_difficulty_maps_to_advanced() {
        let recipe = parse_recipe_json(&json!({"difficulty": "Hard"}));
        assert_eq!(recipe.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_zero_servings_defaults() {
        let recipe = parse_recipe_json(&json!({"servings": 0, "prepTimeMinutes": 0}));
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.prep_time_minutes, 0);
    }

    #[test]
    fn test_body_must_be_json() {
        let result = parse_endpoint_body("<html>502 Bad Gateway</html>", "coverLetter");
        assert!(matches!(result, Err(RecipeError::InvalidResponse(_))));
    }

    #[test]
    fn test_body_must_have_wrapper() {
        let result = parse_endpoint_body(r#"{"title": "Soup"}"#, "coverLetter");
        assert!(matches!(result, Err(RecipeError::InvalidResponse(_))));

        let result = parse_endpoint_body(r#"{"coverLetter": 12}"#, "coverLetter");
        assert!(matches!(result, Err(RecipeError::InvalidResponse(_))));
    }

    #[test]
    fn test_wrapped_object() {
        let recipe =
            parse_endpoint_body(r#"{"coverLetter": {"title": "Soup"}}"#, "coverLetter").unwrap();
        assert_eq!(recipe.title, "Soup");
    }

    #[test]
    fn test_wrapped_string_with_code_fence() {
        let body = json!({
            "coverLetter": "```json\n{\"title\": \"Fenced Soup\", \"servings\": 2}\n```"
        })
        .to_string();
        let recipe = parse_endpoint_body(&body, "coverLetter").unwrap();
        assert_eq!(recipe.title, "Fenced Soup");
        assert_eq!(recipe.servings, 2);

        let body = json!({"coverLetter": "Sorry, I cannot help with that."}).to_string();
        let result = parse_endpoint_body(&body, "coverLetter");
        assert!(matches!(result, Err(RecipeError::InvalidResponse(_))));
    }
}
