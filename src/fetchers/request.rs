use crate::config::FetchConfig;
use crate::error::{RecipeError, Result};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Downloads recipe pages with a browser identity. One attempt per call.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(config.timeout))
    }

    pub fn with_timeout(config: &FetchConfig, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| RecipeError::InvalidInput(format!("invalid Accept header: {e}")))?,
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and return the body as UTF-8 text.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = parse_url(url)?;

        debug!("Fetching {}", parsed);
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetching {} returned HTTP {}", url, status);
            return Err(RecipeError::ServerError(status.as_u16()));
        }

        let body = response.bytes().await?;
        let html = String::from_utf8(body.to_vec())
            .map_err(|e| RecipeError::InvalidResponse(format!("page is not UTF-8 text: {e}")))?;

        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| RecipeError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(RecipeError::InvalidUrl(format!(
            "{url}: unsupported scheme '{scheme}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn fetcher() -> RequestFetcher {
        RequestFetcher::new(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_url_rejects_malformed_input() {
        assert!(matches!(parse_url("not a url"), Err(RecipeError::InvalidUrl(_))));
        assert!(matches!(
            parse_url("ftp://example.com/recipe"),
            Err(RecipeError::InvalidUrl(_))
        ));
        assert!(parse_url(" https://example.com/recipe ").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", Matcher::Regex("^Mozilla/5.0".to_string()))
            .match_header("accept", Matcher::Regex("text/html".to_string()))
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/recipe", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_server_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/gone")
            .with_status(500)
            .create_async()
            .await;

        let result = fetcher().fetch(&format!("{}/gone", server.url())).await;
        assert!(matches!(result, Err(RecipeError::ServerError(500))));
    }

    #[tokio::test]
    async fn test_fetch_non_utf8_body_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/binary")
            .with_status(200)
            .with_body(vec![0xff, 0xfe, 0xfd])
            .create_async()
            .await;

        let result = fetcher().fetch(&format!("{}/binary", server.url())).await;
        assert!(matches!(result, Err(RecipeError::InvalidResponse(_))));
    }
}
