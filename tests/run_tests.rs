//! Full scraper runs: mock portal + mock collector

use deed_scraper::{run_scraper, ScrapeArgs};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_counties(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let file = dir.join("counties.yaml");
    let yaml = format!(
        r#"counties:
  dauphin:
    name: Dauphin County
    base_url: {}
    search_path: /Search/SearchResults
    data_path: /Search/GridResults
    city_filter: ""
    doc_types: [DEED]
    doc_types_display: Deeds
"#,
        base_url
    );
    fs::write(&file, yaml).unwrap();
    file
}

fn args(dir: &TempDir, portal: &MockServer, collector: &MockServer) -> ScrapeArgs {
    ScrapeArgs {
        date: Some("01/05/2026".to_string()),
        dry_run: false,
        county: "dauphin".to_string(),
        counties: write_counties(dir.path(), &portal.uri()),
        webhook_url: Some(format!("{}/webhook", collector.uri())),
        webhook_secret: Some("s3cret".to_string()),
        timeout: 5,
        webhook_timeout: 5,
        log_dir: dir.path().join("logs"),
        verbose: false,
    }
}

async fn mount_portal(portal: &MockServer, grid: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/Search/SearchResults"))
        .respond_with(ResponseTemplate::new(200))
        .mount(portal)
        .await;
    Mock::given(method("POST"))
        .and(path("/Search/GridResults"))
        .respond_with(grid)
        .mount(portal)
        .await;
}

async fn untouched(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn delivers_successful_scrape_once() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    mount_portal(
        &portal,
        ResponseTemplate::new(200).set_body_json(json!({"Data": [{"doc": "DEED"}, {"doc": "DEED"}]})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(header("X-Webhook-Secret", "s3cret"))
        .and(body_partial_json(json!({
            "status": "success",
            "county": "dauphin",
            "date_searched": "01/05/2026",
            "record_count": 2
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&collector)
        .await;

    run_scraper(args(&dir, &portal, &collector)).await.unwrap();
}

#[tokio::test]
async fn delivers_scrape_errors_too() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    mount_portal(&portal, ResponseTemplate::new(500)).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "status": "error",
            "error_type": "request_error"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&collector)
        .await;

    run_scraper(args(&dir, &portal, &collector)).await.unwrap();
}

#[tokio::test]
async fn failed_delivery_is_an_error() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    mount_portal(&portal, ResponseTemplate::new(200).set_body_json(json!({"Data": []}))).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .expect(1)
        .mount(&collector)
        .await;

    let err = run_scraper(args(&dir, &portal, &collector)).await.unwrap_err();
    assert!(err.to_string().contains("Failed to deliver"));
}

#[tokio::test]
async fn dry_run_skips_delivery() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    mount_portal(&portal, ResponseTemplate::new(200).set_body_json(json!({"Data": [{"doc": "DEED"}]}))).await;
    untouched(&collector).await;

    let mut a = args(&dir, &portal, &collector);
    a.dry_run = true;
    run_scraper(a).await.unwrap();

    assert_eq!(portal.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn dry_run_does_not_need_webhook_settings() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    mount_portal(&portal, ResponseTemplate::new(200).set_body_json(json!({"Data": []}))).await;

    let mut a = args(&dir, &portal, &collector);
    a.dry_run = true;
    a.webhook_url = None;
    a.webhook_secret = None;
    run_scraper(a).await.unwrap();
}

#[tokio::test]
async fn invalid_date_makes_no_requests() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    untouched(&portal).await;
    untouched(&collector).await;

    let mut a = args(&dir, &portal, &collector);
    a.date = Some("13/40/2025".to_string());
    let err = run_scraper(a).await.unwrap_err();
    assert!(err.to_string().contains("Invalid date format: 13/40/2025"));
}

#[tokio::test]
async fn unknown_county_makes_no_requests() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    untouched(&portal).await;
    untouched(&collector).await;

    let mut a = args(&dir, &portal, &collector);
    a.county = "lancaster".to_string();
    let err = run_scraper(a).await.unwrap_err();
    assert!(err.to_string().contains("Unknown county 'lancaster'"));
}

#[tokio::test]
async fn missing_webhook_url_makes_no_requests() {
    let dir = tempdir().unwrap();
    let portal = MockServer::start().await;
    let collector = MockServer::start().await;
    untouched(&portal).await;

    let mut a = args(&dir, &portal, &collector);
    a.webhook_url = None;
    let err = run_scraper(a).await.unwrap_err();
    assert!(err.to_string().contains("Webhook URL not set"));
}
