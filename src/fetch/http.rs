// src/fetch/http.rs

//! HTTP client utilities.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::fetch::PageFetch;
use crate::models::CrawlerConfig;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Bytes scanned for a `<meta>` charset declaration.
const META_SNIFF_LIMIT: usize = 1024;

static META_CHARSET: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#).ok()
});

/// Create a configured asynchronous HTTP client with a browser-like identity.
pub fn create_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .map_err(|e| AppError::config(format!("crawler.accept_language: {e}")))?,
    );

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;
    Ok(client)
}

/// Static page fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;
        Ok(decode_body(&body, content_type.as_deref()))
    }
}

/// Decode a page body using the `Content-Type` charset, then a `<meta>`
/// declaration near the top of the document, then UTF-8.
///
/// A byte order mark overrides all of these.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| sniff_meta_charset(body))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        log::debug!("Malformed {} sequences replaced", used.name());
    }
    text.into_owned()
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head);
    let label = META_CHARSET.as_ref()?.captures(&head)?.get(1)?.as_str().to_string();
    Encoding::for_label(label.as_bytes())
}

#[async_trait]
impl PageFetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.get_text(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Failed to fetch {url}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big5(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = encoding_rs::BIG5.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_decode_body_uses_header_charset() {
        let body = big5("<h3>王小明</h3>");
        assert_eq!(
            decode_body(&body, Some("text/html; charset=big5")),
            "<h3>王小明</h3>"
        );
        assert_eq!(
            decode_body(&body, Some("text/html; charset=\"Big5\"")),
            "<h3>王小明</h3>"
        );
    }

    #[test]
    fn test_decode_body_sniffs_meta_charset() {
        let body = big5(r#"<html><head><meta charset="big5"></head><body><h3>王小明</h3></body></html>"#);
        assert!(decode_body(&body, Some("text/html")).contains("王小明"));

        let body = big5(
            r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=big5"></head><body>王小明</body></html>"#,
        );
        assert!(decode_body(&body, None).contains("王小明"));
    }

    #[test]
    fn test_decode_body_defaults_to_utf8() {
        assert_eq!(decode_body("<h3>王小明</h3>".as_bytes(), None), "<h3>王小明</h3>");
        assert_eq!(
            decode_body("<h3>王小明</h3>".as_bytes(), Some("text/html; charset=bogus")),
            "<h3>王小明</h3>"
        );
    }

    #[tokio::test]
    async fn test_fetch_decodes_big5_page() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/faculty"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(big5("<h3>王小明</h3>"))
                    .insert_header("content-type", "text/html; charset=big5"),
            )
            .mount(&server)
            .await;

        let config = CrawlerConfig {
            request_delay_ms: 0,
            ..CrawlerConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let html = fetcher.fetch(&format!("{}/faculty", server.uri())).await;
        assert_eq!(html.as_deref(), Some("<h3>王小明</h3>"));
    }

    #[test]
    fn test_create_client_with_defaults() {
        assert!(create_client(&CrawlerConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_malformed_accept_language() {
        let config = CrawlerConfig {
            accept_language: "zh-TW\nbroken".to_string(),
            ..CrawlerConfig::default()
        };
        assert!(matches!(create_client(&config), Err(AppError::Config(_))));
    }
}
