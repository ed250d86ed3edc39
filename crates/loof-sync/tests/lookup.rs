//! Registry lookup integration tests.
//!
//! A wiremock server plays the registry: GET serves the search form, POST
//! serves the result page.

use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use loof_sync::titles::parse_obtained_date;
use loof_sync::*;

// ─────────────────────── helpers ───────────────────────

const CHIP: &str = "250268712612228";

const SEARCH_PAGE: &str = r#"
<html><body>
<form action="/search" method="post">
  <input type="text" name="number" value="">
  <input type="submit" name="op" value="Rechercher">
  <input type="hidden" name="form_build_id" value="form-Xy9_token">
  <input type="hidden" name="form_id" value="loof_search_form">
</form>
</body></html>
"#;

const RESULT_PAGE: &str = r#"
<html><body>
<span class="placeholder description">Maine Coon Brown mackerel tabby et blanc</span>
<span class="placeholder sex">Mâle</span>
<span class="placeholder qualif">SQR3</span>
<ul data-drupal-selector="edit-list">
  <li><span class="placeholder i-title">Champion</span> Obtenu le : 14-11-2018</li>
  <li><span class="placeholder i-title">Premior</span></li>
  <li><span class="placeholder i-title">Grand Champion International</span> Obtenu le : 08-09-2021</li>
  <li><span class="placeholder i-title">Grand Champion</span> Obtenu le : 17-03-2019</li>
</ul>
</body></html>
"#;

/// Client pointed at the mock registry's `/search` page.
fn client_for(server: &MockServer) -> RegistryClient {
    let config = RegistryConfig {
        search_url: format!("{}/search", server.uri()),
        request_timeout_ms: 2_000,
        ..RegistryConfig::default()
    };
    RegistryClient::new(&config).unwrap()
}

async fn mount_search_page(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_result_page(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn post_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count()
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn test_full_lookup() {
    let server = MockServer::start().await;
    mount_search_page(&server, 200, SEARCH_PAGE).await;
    mount_result_page(&server, 200, RESULT_PAGE).await;

    let record = client_for(&server).lookup_by_chip(CHIP).await.unwrap();

    assert_eq!(record.chip_id, CHIP);
    assert_eq!(record.breed.as_deref(), Some("Maine Coon"));
    assert_eq!(record.color.as_deref(), Some("Brown mackerel tabby et blanc"));
    assert_eq!(record.sex, Some(Sex::Male));
    assert_eq!(record.qualification_grade.as_deref(), Some("SQR3"));

    let titles = record.titles.unwrap();
    let names: Vec<&str> = titles.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Grand Champion International (2021)",
            "Grand Champion (2019)",
            "Champion (2018)",
            "Premior",
        ]
    );

    // Dated titles strictly descending, undated last.
    let dates: Vec<_> = titles
        .iter()
        .filter_map(|t| parse_obtained_date(&t.obtained_date))
        .collect();
    assert_eq!(dates.len(), 3);
    assert!(dates.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(titles[3].obtained_date, "");
}

#[tokio::test]
async fn test_post_carries_chip_and_tokens() {
    let server = MockServer::start().await;
    mount_search_page(&server, 200, SEARCH_PAGE).await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("number=250268712612228"))
        .and(body_string_contains("op=Rechercher"))
        .and(body_string_contains("form_build_id=form-Xy9_token"))
        .and(body_string_contains("form_id=loof_search_form"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULT_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).lookup_by_chip(CHIP).await.unwrap();
    assert_eq!(record.breed.as_deref(), Some("Maine Coon"));
}

#[tokio::test]
async fn test_search_page_failure_skips_post() {
    let server = MockServer::start().await;
    mount_search_page(&server, 503, "Service Unavailable").await;
    mount_result_page(&server, 200, RESULT_PAGE).await;

    let err = client_for(&server).lookup_by_chip(CHIP).await.unwrap_err();

    assert_eq!(err, LookupError::Network { status: 503 });
    assert_eq!(err.status(), Some(503));
    assert_eq!(post_count(&server).await, 0);
}

#[tokio::test]
async fn test_missing_tokens_skips_post() {
    let server = MockServer::start().await;
    mount_search_page(
        &server,
        200,
        "<html><body><h1>Site en maintenance</h1></body></html>",
    )
    .await;
    mount_result_page(&server, 200, RESULT_PAGE).await;

    let err = client_for(&server).lookup_by_chip(CHIP).await.unwrap_err();

    assert_eq!(err, LookupError::TokenNotFound);
    assert_eq!(post_count(&server).await, 0);
}

#[tokio::test]
async fn test_submit_failure_is_network_error() {
    let server = MockServer::start().await;
    mount_search_page(&server, 200, SEARCH_PAGE).await;
    mount_result_page(&server, 500, "<html>Internal error</html>").await;

    let err = client_for(&server).lookup_by_chip(CHIP).await.unwrap_err();
    assert_eq!(err, LookupError::Network { status: 500 });
}

#[tokio::test]
async fn test_unknown_chip_is_empty_success() {
    let server = MockServer::start().await;
    mount_search_page(&server, 200, SEARCH_PAGE).await;
    mount_result_page(&server, 200, "<html><body><p>Aucun résultat</p></body></html>").await;

    let record = client_for(&server).lookup_by_chip(CHIP).await.unwrap();

    assert!(record.is_empty());
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        serde_json::json!({ "chipId": CHIP })
    );
    assert!(!RecordPatch::from_record(&record).is_known());
}

#[tokio::test]
async fn test_lookup_is_idempotent() {
    let server = MockServer::start().await;
    mount_search_page(&server, 200, SEARCH_PAGE).await;
    mount_result_page(&server, 200, RESULT_PAGE).await;

    let client = client_for(&server);
    let first = client.lookup_by_chip(CHIP).await.unwrap();
    let second = client.lookup_by_chip(CHIP).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_each_lookup_fetches_fresh_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(2)
        .mount(&server)
        .await;
    mount_result_page(&server, 200, RESULT_PAGE).await;

    let client = client_for(&server);
    client.lookup_by_chip(CHIP).await.unwrap();
    client.lookup_by_chip(CHIP).await.unwrap();
}

#[tokio::test]
async fn test_outcome_shape() {
    let server = MockServer::start().await;
    mount_search_page(&server, 503, "").await;

    let outcome = client_for(&server).lookup(CHIP).await;
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Network error: registry returned HTTP 503");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SEARCH_PAGE)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .lookup_with_deadline(CHIP, Duration::from_millis(50))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "network_error");
    assert!(err.to_string().contains("deadline exceeded"));
}

#[tokio::test]
async fn test_request_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SEARCH_PAGE)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = RegistryConfig {
        search_url: format!("{}/search", server.uri()),
        request_timeout_ms: 50,
        ..RegistryConfig::default()
    };
    let err = RegistryClient::new(&config)
        .unwrap()
        .lookup_by_chip(CHIP)
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_lookups() {
    let server = MockServer::start().await;
    mount_search_page(&server, 200, SEARCH_PAGE).await;
    mount_result_page(&server, 200, RESULT_PAGE).await;

    let client = client_for(&server);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.lookup_by_chip(CHIP).await })
        })
        .collect();

    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert_eq!(record.title_count(), 4);
    }
}
