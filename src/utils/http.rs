// src/utils/http.rs

//! HTTP client utilities.

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};

use crate::error::{AppError, Result};
use crate::models::UpstreamConfig;

/// Create an HTTP client that presents itself like a desktop browser.
///
/// The provider rejects requests without a browser user agent and a referer
/// pointing at its own site, so both are set as defaults on the client.
pub fn create_async_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(REFERER, header_value("referer", &config.referer())?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept_language", &config.accept_language)?,
    );

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("upstream.{name} is not a valid header: {e}")))
}

/// Whether a `Content-Type` value describes an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
