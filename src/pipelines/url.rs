use crate::error::{RecipeError, Result};
use crate::extractors::{default_extractors, ParsingContext};
use crate::fetchers::RequestFetcher;
use crate::model::NormalizedRecipe;
use log::{debug, info};

/// Process a URL to extract a recipe
///
/// This pipeline:
/// 1. Fetches HTML using RequestFetcher
/// 2. Tries the HTML extractors (json_ld, html_class) in order
/// 3. Returns the first recipe found
///
/// A failed fetch is returned as-is; no extractor runs.
pub async fn process(fetcher: &RequestFetcher, url: &str) -> Result<NormalizedRecipe> {
    let html = fetcher.fetch(url).await?;
    extract_from_html(url, &html)
}

/// Run the extraction strategies over already fetched markup.
pub fn extract_from_html(url: &str, html: &str) -> Result<NormalizedRecipe> {
    let context = ParsingContext::new(url, html);

    let recipe = default_extractors().iter().find_map(|extractor| {
        debug!("Trying {} extractor on {}", extractor.name(), url);
        let found = extractor.extract(&context);
        if found.is_some() {
            info!("Recipe extracted from {} by {}", url, extractor.name());
        }
        found
    });

    recipe.ok_or_else(|| {
        RecipeError::ParsingError(format!("no recipe data found at {url}"))
    })
}
