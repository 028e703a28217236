use super::markup::clean_text_value;
use super::{Extractor, ParsingContext, PLACEHOLDER_TITLE};
use crate::duration::{classify_difficulty, parse_duration};
use crate::lenient::{lenient, whole_number, OneOrMany, TextValue};
use crate::model::{number_steps, Ingredient, NormalizedRecipe};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());
static FIRST_INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

const DEFAULT_SERVINGS: u32 = 4;

/// Reads schema.org `Recipe` objects embedded as JSON-LD.
pub struct JsonLdExtractor;

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<OneOrMany<TextValue>>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<OneOrMany<TextValue>>,
    #[serde(rename = "recipeIngredient", default, deserialize_with = "lenient")]
    recipe_ingredient: Option<OneOrMany<TextValue>>,
    #[serde(rename = "recipeInstructions", default, deserialize_with = "lenient")]
    recipe_instructions: Option<OneOrMany<InstructionEntry>>,
    #[serde(rename = "prepTime", default, deserialize_with = "lenient")]
    prep_time: Option<String>,
    #[serde(rename = "cookTime", default, deserialize_with = "lenient")]
    cook_time: Option<String>,
    #[serde(rename = "recipeYield", default, deserialize_with = "lenient")]
    recipe_yield: Option<OneOrMany<TextValue>>,
    #[serde(rename = "recipeCategory", default, deserialize_with = "lenient")]
    recipe_category: Option<OneOrMany<TextValue>>,
    #[serde(rename = "recipeCuisine", default, deserialize_with = "lenient")]
    recipe_cuisine: Option<OneOrMany<TextValue>>,
    #[serde(rename = "suitableForDiet", default, deserialize_with = "lenient")]
    suitable_for_diet: Option<OneOrMany<TextValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionEntry {
    Text(String),
    Section {
        #[serde(rename = "itemListElement")]
        item_list_element: Vec<InstructionEntry>,
    },
    Step {
        text: Option<String>,
        name: Option<String>,
    },
    Other(IgnoredAny),
}

impl InstructionEntry {
    fn collect_texts(self, out: &mut Vec<String>) {
        match self {
            InstructionEntry::Text(text) => out.push(text),
            InstructionEntry::Section { item_list_element } => {
                for entry in item_list_element {
                    entry.collect_texts(out);
                }
            }
            // Prefer text over name
            InstructionEntry::Step { text, name } => {
                if let Some(text) = text.or(name) {
                    out.push(text);
                }
            }
            InstructionEntry::Other(_) => {}
        }
    }
}

fn texts(value: Option<OneOrMany<TextValue>>) -> Vec<String> {
    value
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(TextValue::into_text)
        .map(|text| clean_text_value(&text))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Every line, blank ones included, so one ingredient maps to one source line.
fn lines(value: Option<OneOrMany<TextValue>>) -> Vec<String> {
    value
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(TextValue::into_text)
        .map(|text| clean_text_value(&text))
        .collect()
}

fn first_text(value: Option<OneOrMany<TextValue>>) -> Option<String> {
    value
        .and_then(OneOrMany::into_first)
        .and_then(TextValue::into_text)
        .map(|text| clean_text_value(&text))
        .filter(|text| !text.is_empty())
}

fn servings_from_yield(value: Option<OneOrMany<TextValue>>) -> u32 {
    let parsed = match value.and_then(OneOrMany::into_first) {
        Some(TextValue::Number(number)) => whole_number(&Value::Number(number)),
        Some(TextValue::Text(text)) => FIRST_INTEGER_RE
            .find(&text)
            .and_then(|m| m.as_str().parse::<u32>().ok()),
        _ => None,
    };
    parsed.filter(|n| *n > 0).unwrap_or(DEFAULT_SERVINGS)
}

fn clean_diet_value(diet: String) -> String {
    diet.trim_start_matches("https://schema.org/")
        .trim_start_matches("http://schema.org/")
        .to_string()
}

impl From<JsonLdRecipe> for NormalizedRecipe {
    fn from(recipe: JsonLdRecipe) -> Self {
        let ingredients = lines(recipe.recipe_ingredient)
            .into_iter()
            .map(|line| Ingredient {
                name: line,
                quantity: 1.0,
                unit: "item".to_string(),
            })
            .collect();

        let mut steps = Vec::new();
        if let Some(instructions) = recipe.recipe_instructions {
            for entry in instructions.into_vec() {
                entry.collect_texts(&mut steps);
            }
        }
        let steps = steps
            .iter()
            .map(|step| clean_text_value(step))
            .filter(|step| !step.is_empty());

        let prep_time_minutes = recipe.prep_time.as_deref().map(parse_duration).unwrap_or(0);
        let cook_time_minutes = recipe.cook_time.as_deref().map(parse_duration).unwrap_or(0);

        NormalizedRecipe {
            title: first_text(recipe.name).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            description: first_text(recipe.description).unwrap_or_default(),
            ingredients,
            instructions: number_steps(steps),
            prep_time_minutes,
            cook_time_minutes,
            servings: servings_from_yield(recipe.recipe_yield),
            difficulty: classify_difficulty(prep_time_minutes.saturating_add(cook_time_minutes)),
            categories: texts(recipe.recipe_category),
            cuisine_types: texts(recipe.recipe_cuisine),
            dietary_info: texts(recipe.suitable_for_diet)
                .into_iter()
                .map(clean_diet_value)
                .collect(),
            nutrition: None,
            calories: None,
        }
    }
}

fn sanitize_json(json_str: &str) -> String {
    let cleaned = json_str
        .trim()
        .trim_start_matches("<!--")
        .trim_end_matches("-->")
        .trim();

    let chars: Vec<char> = cleaned.chars().collect();
    let mut sanitized = String::with_capacity(cleaned.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            sanitized.push(c);
            continue;
        }

        match c {
            '"' => in_string = true,
            ',' => {
                // Drop trailing commas before a closing bracket
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some(']' | '}')) {
                    continue;
                }
            }
            _ => {}
        }
        sanitized.push(c);
    }

    sanitized
}

/// Decode a block as written, falling back to the sanitized text.
fn decode_block(raw: &str) -> serde_json::Result<Value> {
    serde_json::from_str(raw).or_else(|e| {
        debug!("JSON-LD block needs sanitizing: {}", e);
        serde_json::from_str(&sanitize_json(raw))
    })
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Flatten a decoded block into the objects that may describe a recipe:
/// the block itself or its array items, followed by any `@graph` members.
fn candidates(json_ld: &Value) -> Vec<&Value> {
    let top_level: Vec<&Value> = match json_ld {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![json_ld],
        _ => Vec::new(),
    };

    let mut all = Vec::new();
    for item in top_level {
        all.push(item);
        if let Some(Value::Array(graph)) = item.get("@graph") {
            all.extend(graph.iter());
        }
    }
    all
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn extract(&self, context: &ParsingContext) -> Option<NormalizedRecipe> {
        for script in context.document.select(&JSON_LD_SELECTOR) {
            let json_ld = match decode_block(&script.inner_html()) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping undecodable JSON-LD block: {}", e);
                    continue;
                }
            };

            let Some(candidate) = candidates(&json_ld).into_iter().find(|c| is_recipe_type(c))
            else {
                continue;
            };

            match serde_json::from_value::<JsonLdRecipe>(candidate.clone()) {
                Ok(recipe) => {
                    let recipe = NormalizedRecipe::from(recipe);
                    debug!(
                        "JSON-LD recipe '{}' with {} ingredients and {} steps from {}",
                        recipe.title,
                        recipe.ingredients.len(),
                        recipe.instructions.len(),
                        context.url
                    );
                    return Some(recipe);
                }
                Err(e) => debug!("Recipe-typed JSON-LD block did not map: {}", e),
            }
        }

        debug!("No Recipe-typed JSON-LD block in {}", context.url);
        None
    }
}
