//! Upstream provider client.
//!
//! Submits the search form once per query and hands back the raw body.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ClassifiedQuery, UpstreamDocument, UpstreamConfig};
use crate::services::RateLimiter;
use crate::utils::http::{create_async_client, is_html_content_type};

/// Source of upstream documents for classified queries.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw document for one query. Never retries.
    async fn fetch(&self, query: &ClassifiedQuery) -> Result<UpstreamDocument>;
}

/// Posts the provider's search form over HTTP.
pub struct UpstreamClient {
    client: Client,
    endpoint: Url,
    query_field: String,
    limiter: Arc<RateLimiter>,
}

impl UpstreamClient {
    /// Create a client for the configured provider, gated by `limiter`.
    pub fn new(config: &UpstreamConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            endpoint: config.endpoint()?,
            query_field: config.query_field.clone(),
            limiter,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentSource for UpstreamClient {
    async fn fetch(&self, query: &ClassifiedQuery) -> Result<UpstreamDocument> {
        self.limiter.throttle().await;

        log::debug!(
            "POST {} ({} {})",
            self.endpoint,
            query.kind(),
            query.normalized()
        );

        let form = [(self.query_field.as_str(), query.normalized())];
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&form[..])
            .send()
            .await
            .map_err(AppError::unavailable)?
            .error_for_status()
            .map_err(AppError::unavailable)?;

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_html_content_type(content_type) {
                return Err(AppError::rejected(format!(
                    "expected an HTML document, got '{content_type}'"
                )));
            }
        }

        let body = response.text().await.map_err(AppError::unavailable)?;
        Ok(UpstreamDocument::new(body))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_string, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::services::classify;

    fn client_for(server: &MockServer, limiter: Arc<RateLimiter>) -> UpstreamClient {
        let config = UpstreamConfig {
            base_url: server.uri(),
            timeout_secs: 1,
            ..UpstreamConfig::default()
        };
        UpstreamClient::new(&config, limiter).unwrap()
    }

    fn no_wait() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn posts_form_with_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/sim.php"))
            .and(body_string("search_query=923323312487"))
            .and(header("referer", format!("{}/", server.uri()).as_str()))
            .and(header_exists("user-agent"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, no_wait());
        let query = classify("923323312487").unwrap();
        let document = client.fetch(&query).await.unwrap();
        assert_eq!(document.as_str(), "<html>ok</html>");
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, no_wait());
        let query = classify("1234567890123").unwrap();
        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)), "{err:?}");
    }

    #[tokio::test]
    async fn timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html></html>", "text/html")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, no_wait());
        let query = classify("1234567890123").unwrap();
        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)), "{err:?}");
    }

    #[tokio::test]
    async fn non_html_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{\"denied\":true}", "application/json"))
            .mount(&server)
            .await;

        let client = client_for(&server, no_wait());
        let query = classify("923001234567").unwrap();
        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamRejected(_)), "{err:?}");
        assert_eq!(err.category(), "Fetch failed");
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..UpstreamConfig::default()
        };
        let client = UpstreamClient::new(&config, no_wait()).unwrap();
        let query = classify("923001234567").unwrap();
        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)), "{err:?}");
    }
}
