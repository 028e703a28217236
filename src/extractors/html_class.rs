use super::markup::clean_html_text;
use super::{Extractor, ParsingContext, PLACEHOLDER_TITLE};
use crate::model::{number_steps, Difficulty, Ingredient, NormalizedRecipe};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Category tag marking records that came from the markup fallback
pub const HEURISTIC_CATEGORY: &str = "Extracted";

const DEFAULT_PREP_MINUTES: u32 = 15;
const DEFAULT_COOK_MINUTES: u32 = 30;
const DEFAULT_SERVINGS: u32 = 4;

/// Fallback extractor that scans raw markup for conventional recipe class
/// names when a page carries no structured data.
pub struct HtmlClassExtractor;

struct ClassPatterns {
    title: Vec<Regex>,
    description: Vec<Regex>,
    ingredients: Vec<Regex>,
    instructions: Vec<Regex>,
}

fn element_with_class(tag: &str, class_fragment: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)<{tag}\b[^>]*class=["'][^"']*{class_fragment}[^"']*["'][^>]*>(.*?)</{tag}>"#
    ))
    .unwrap()
}

static PATTERNS: Lazy<ClassPatterns> = Lazy::new(|| ClassPatterns {
    title: vec![
        Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").unwrap(),
        Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").unwrap(),
    ],
    description: vec![
        Regex::new(r#"(?is)<meta\b[^>]*name=["']description["'][^>]*content="([^"]*)"[^>]*>"#)
            .unwrap(),
        Regex::new(r#"(?is)<meta\b[^>]*content="([^"]*)"[^>]*name=["']description["'][^>]*>"#)
            .unwrap(),
    ],
    // Tried in order; the first pattern with any match wins
    ingredients: vec![
        element_with_class("li", "ingredient"),
        element_with_class("div", "ingredient"),
    ],
    instructions: vec![
        element_with_class("li", "instruction"),
        element_with_class("li", "step"),
        element_with_class("div", "instruction"),
    ],
});

impl ClassPatterns {
    /// Cleaned text of every match of the first pattern that matches at all.
    fn first_matching(patterns: &[Regex], html: &str) -> Vec<String> {
        for pattern in patterns {
            let items: Vec<String> = pattern
                .captures_iter(html)
                .filter_map(|c| c.get(1))
                .map(|m| clean_html_text(m.as_str()))
                .filter(|text| !text.is_empty())
                .collect();
            if !items.is_empty() {
                return items;
            }
        }
        Vec::new()
    }

    /// First non-empty capture across the patterns, in pattern order.
    fn first_text(patterns: &[Regex], html: &str) -> Option<String> {
        patterns.iter().find_map(|pattern| {
            pattern
                .captures(html)
                .and_then(|c| c.get(1))
                .map(|m| clean_html_text(m.as_str()))
                .filter(|text| !text.is_empty())
        })
    }

    fn title(&self, html: &str) -> String {
        let raw = Self::first_text(&self.title, html).unwrap_or_default();
        // Drop site branding: "Lemon Tart | My Food Blog"
        let title = raw.split('|').next().unwrap_or_default().trim();
        if title.is_empty() {
            PLACEHOLDER_TITLE.to_string()
        } else {
            title.to_string()
        }
    }
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn extract(&self, context: &ParsingContext) -> Option<NormalizedRecipe> {
        debug!("Attempting to extract recipe using HTML class patterns");

        let html = context.html.as_str();
        let ingredients = ClassPatterns::first_matching(&PATTERNS.ingredients, html);
        let instructions = ClassPatterns::first_matching(&PATTERNS.instructions, html);

        debug!("Ingredients count: {}", ingredients.len());
        debug!("Instructions count: {}", instructions.len());

        if ingredients.is_empty() || instructions.is_empty() {
            debug!(
                "HTML class patterns found no complete recipe in {}",
                context.url
            );
            return None;
        }

        let title = PATTERNS.title(html);
        debug!("Recipe name: {}", title);

        Some(NormalizedRecipe {
            title,
            description: ClassPatterns::first_text(&PATTERNS.description, html)
                .unwrap_or_default(),
            ingredients: ingredients
                .into_iter()
                .map(|name| Ingredient {
                    name,
                    quantity: 1.0,
                    unit: "item".to_string(),
                })
                .collect(),
            instructions: number_steps(instructions),
            prep_time_minutes: DEFAULT_PREP_MINUTES,
            cook_time_minutes: DEFAULT_COOK_MINUTES,
            servings: DEFAULT_SERVINGS,
            difficulty: Difficulty::Medium,
            categories: vec![HEURISTIC_CATEGORY.to_string()],
            cuisine_types: Vec::new(),
            dietary_info: Vec::new(),
            nutrition: None,
            calories: None,
        })
    }
}
