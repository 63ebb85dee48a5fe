//! End-to-end lookups against a stubbed provider.

use std::time::{Duration, Instant};

use cnic_lookup::models::{Config, LookupOutcome, QueryKind};
use cnic_lookup::pipeline::LookupPipeline;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <form method="post"><input name="search_query"></form>
  <table class="api-response">
    <thead><tr><th>Mobile</th><th>Name</th><th>CNIC</th><th>Address</th></tr></thead>
    <tbody>
      <tr><td>923323312487</td><td>First Holder</td><td>4210111111111</td><td>House 1, Karachi</td></tr>
      <tr><td>923323312488</td><td>Second Holder</td></tr>
    </tbody>
  </table>
</body></html>"#;

fn config_for(server: &MockServer, min_interval_ms: u64) -> Config {
    let mut config = Config::default();
    config.upstream.base_url = server.uri();
    config.upstream.timeout_secs = 5;
    config.rate_limit.min_interval_ms = min_interval_ms;
    config.attribution.handle = "@e2e".to_string();
    config
}

async fn mount_results(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/databases/sim.php"))
        .and(body_string_contains("search_query="))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RESULT_PAGE, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn two_row_table_keeps_document_order() {
    let server = MockServer::start().await;
    mount_results(&server).await;

    let pipeline = LookupPipeline::from_config(&config_for(&server, 0)).unwrap();
    let LookupOutcome::Found(result) = pipeline.lookup("923323312487").await else {
        panic!("lookup failed");
    };

    assert_eq!(result.query, "923323312487");
    assert_eq!(result.query_type, QueryKind::MobileNumber);
    assert_eq!(result.results_count, 2);
    assert_eq!(result.results[0].name.as_deref(), Some("First Holder"));
    assert_eq!(result.results[0].address.as_deref(), Some("House 1, Karachi"));
    assert_eq!(result.results[1].name.as_deref(), Some("Second Holder"));
    assert_eq!(result.results[1].cnic, None);
    assert_eq!(result.copyright, "👉🏻 @e2e");

    let json: serde_json::Value =
        serde_json::from_str(&LookupOutcome::Found(result).to_json(false).unwrap()).unwrap();
    assert_eq!(json["query_type"], "mobile");
    assert_eq!(json["results_count"], 2);
    assert!(json["results"][1]["address"].is_null());
}

#[tokio::test]
async fn invalid_query_sends_nothing_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::from_config(&config_for(&server, 0)).unwrap();
    let outcome = pipeline.lookup("abc").await;
    assert!(outcome.is_client_error());
}

#[tokio::test]
async fn provider_error_becomes_fetch_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::from_config(&config_for(&server, 0)).unwrap();
    let LookupOutcome::Failed(error) = pipeline.lookup("1234567890123").await else {
        panic!("lookup should fail");
    };
    assert_eq!(error.error, "Fetch failed");
    assert!(!error.detail.is_empty());
    assert_eq!(error.copyright, "👉🏻 @e2e");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_share_one_rate_limit() {
    let server = MockServer::start().await;
    mount_results(&server).await;

    let pipeline = LookupPipeline::from_config(&config_for(&server, 300)).unwrap();
    let other = pipeline.clone();

    let started = Instant::now();
    let (first, second) = tokio::join!(
        tokio::spawn(async move { pipeline.lookup("923323312487").await }),
        tokio::spawn(async move { other.lookup("1234567890123").await }),
    );
    let elapsed = started.elapsed();

    assert!(first.unwrap().is_success());
    assert!(second.unwrap().is_success());
    assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}
