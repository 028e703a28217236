use super::text;
use crate::error::Result;
use crate::model::NormalizedRecipe;
use crate::ocr::OcrEngine;
use crate::providers::GenerativeEndpoint;
use log::debug;

/// Recognize the text in a recipe photo, then structure it like pasted text.
pub async fn process(
    ocr: &dyn OcrEngine,
    endpoint: &dyn GenerativeEndpoint,
    image: &[u8],
) -> Result<NormalizedRecipe> {
    let recognized = ocr.recognize(image).await?;
    debug!("OCR recognized {} lines", recognized.lines().count());
    text::process(endpoint, &recognized).await
}
