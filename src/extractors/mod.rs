use crate::model::NormalizedRecipe;
use scraper::Html;

mod html_class;
mod json_ld;
mod markup;

pub use html_class::HtmlClassExtractor;
pub use json_ld::JsonLdExtractor;

/// Title used when a page offers no usable name for the recipe
pub const PLACEHOLDER_TITLE: &str = "Extracted Recipe";

/// Page content handed to every extraction strategy.
pub struct ParsingContext {
    /// Source URL, for diagnostics only
    pub url: String,
    /// Raw markup as fetched
    pub html: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let document = Html::parse_document(&html);
        Self {
            url: url.into(),
            html,
            document,
        }
    }
}

/// One strategy for turning page markup into a recipe.
///
/// `None` means "not found" and lets the caller move on to the next
/// strategy. It is never used to report a failure.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn extract(&self, context: &ParsingContext) -> Option<NormalizedRecipe>;
}

/// Strategies in the order the URL pipeline tries them.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![Box::new(JsonLdExtractor), Box::new(HtmlClassExtractor)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extractor_order() {
        let names: Vec<_> = default_extractors().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["json_ld", "html_class"]);
    }
}
