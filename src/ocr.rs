use crate::config::OcrConfig;
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;

/// Text recognition over a photographed or scanned recipe.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in `image`, returning detected lines joined by
    /// newlines in detection order.
    ///
    /// # Errors
    /// [`RecipeError::ParsingError`] when no text is found or recognition
    /// cannot be performed.
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}

/// OCR through the Google Cloud Vision `images:annotate` API.
pub struct GoogleVisionOcr {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    languages: Vec<String>,
}

impl GoogleVisionOcr {
    /// Create an OCR client from configuration
    pub fn new(config: &OcrConfig) -> Self {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());

        GoogleVisionOcr {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            languages: config.languages.clone(),
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

#[async_trait]
impl OcrEngine for GoogleVisionOcr {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RecipeError::ParsingError("GOOGLE_API_KEY not found in config or environment".into())
        })?;

        let request_body = json!({
            "requests": [{
                "image": {
                    "content": STANDARD.encode(image)
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }],
                "imageContext": {
                    "languageHints": self.languages
                }
            }]
        });

        debug!("Sending OCR request to Google Vision API");

        let response = self
            .client
            .post(format!("{}/v1/images:annotate", self.base_url))
            .query(&[("key", api_key)])
            .header("Accept-Encoding", "identity")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                warn!("Google Vision API request failed: {}", e);
                RecipeError::ParsingError(format!("text recognition request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Google Vision API returned HTTP {}", status);
            return Err(RecipeError::ParsingError(format!(
                "text recognition failed with HTTP {status}"
            )));
        }

        let response_body: Value = response.json().await.map_err(|e| {
            RecipeError::ParsingError(format!("text recognition response is not JSON: {e}"))
        })?;

        if let Some(message) = response_body["responses"][0]["error"]["message"].as_str() {
            return Err(RecipeError::ParsingError(format!(
                "text recognition failed: {message}"
            )));
        }

        let raw = response_body["responses"][0]["fullTextAnnotation"]["text"]
            .as_str()
            .unwrap_or_default();
        let text = join_lines(raw);

        if text.is_empty() {
            return Err(RecipeError::ParsingError("No text detected in image".into()));
        }

        debug!("Extracted text from image: {} characters", text.len());
        Ok(text)
    }
}

/// Trim every detected line and drop blank ones.
fn join_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read an image file for recognition.
pub async fn read_image(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        RecipeError::InvalidInput(format!("cannot read image {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn engine(base_url: String, api_key: Option<&str>) -> GoogleVisionOcr {
        GoogleVisionOcr::new(&OcrConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_default_languages() {
        let ocr = engine("https://vision.googleapis.com/".to_string(), Some("key"));
        assert_eq!(ocr.languages(), ["en-US", "tr-TR"]);
        assert_eq!(ocr.base_url, "https://vision.googleapis.com");
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(
            join_lines("  Menemen \n\n2 yumurta\r\n 1 domates  \n"),
            "Menemen\n2 yumurta\n1 domates"
        );
        assert_eq!(join_lines(" \n \n"), "");
    }

    #[tokio::test]
    async fn test_recognize_sends_image_and_language_hints() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/images:annotate")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(regex::escape(&format!(
                    r#""content":"{}""#,
                    STANDARD.encode(b"jpeg bytes")
                ))),
                Matcher::Regex(r#""type":"TEXT_DETECTION""#.to_string()),
                Matcher::Regex(r#""languageHints":\["en-US","tr-TR"\]"#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"responses": [{"fullTextAnnotation": {"text": "Menemen\n\n2 eggs \n"}}]}"#,
            )
            .create_async()
            .await;

        let text = engine(server.url(), Some("test-key"))
            .recognize(b"jpeg bytes")
            .await
            .unwrap();
        assert_eq!(text, "Menemen\n2 eggs");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recognize_without_text_is_parsing_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/images:annotate")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"responses": [{}]}"#)
            .create_async()
            .await;

        let result = engine(server.url(), Some("test-key"))
            .recognize(b"blank")
            .await;
        assert!(matches!(result, Err(RecipeError::ParsingError(_))));
    }

    #[tokio::test]
    async fn test_recognize_api_error_is_parsing_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/images:annotate")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let result = engine(server.url(), Some("bad-key"))
            .recognize(b"image")
            .await;
        assert!(matches!(result, Err(RecipeError::ParsingError(_))));
    }

    #[tokio::test]
    async fn test_recognize_undecodable_response_is_parsing_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/images:annotate")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>proxy error</html>")
            .create_async()
            .await;

        let result = engine(server.url(), Some("test-key"))
            .recognize(b"image")
            .await;
        assert!(matches!(result, Err(RecipeError::ParsingError(_))));
    }

    #[tokio::test]
    async fn test_recognize_unreachable_service_is_parsing_error() {
        let result = engine("http://127.0.0.1:1".to_string(), Some("test-key"))
            .recognize(b"image")
            .await;
        assert!(matches!(result, Err(RecipeError::ParsingError(_))));
    }

    #[tokio::test]
    async fn test_read_missing_image_is_invalid_input() {
        let result = read_image(Path::new("/nonexistent/recipe.jpg")).await;
        assert!(matches!(result, Err(RecipeError::InvalidInput(_))));
    }
}
