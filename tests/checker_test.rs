//! 站点检查器集成测试（wiremock 模拟目标站点）

use std::time::Duration;

use page_analyzer::checker::{CheckError, HttpSiteChecker, SiteChecker};
use page_analyzer::config::{CheckerConfig, StatusPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>  Example Domain </title>
    <meta name="description" content="An example page">
  </head>
  <body><h1>Example</h1><h1>Second</h1></body>
</html>"#;

fn checker(timeout_secs: u64, status_policy: StatusPolicy) -> HttpSiteChecker {
    HttpSiteChecker::new(&CheckerConfig {
        timeout_secs,
        status_policy,
        ..CheckerConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn extracts_signals_from_html_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&server)
        .await;

    let result = checker(5, StatusPolicy::Record).check(&server.uri()).await.unwrap();

    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.h1.as_deref(), Some("Example"));
    assert_eq!(result.title.as_deref(), Some("Example Domain"));
    assert_eq!(result.description.as_deref(), Some("An example page"));
}

#[tokio::test]
async fn sends_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>ua</title>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = checker(5, StatusPolicy::Record).check(&server.uri()).await.unwrap();
    assert_eq!(result.title.as_deref(), Some("ua"));

    let requests = server.received_requests().await.unwrap();
    let user_agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert_eq!(user_agent, CheckerConfig::default().user_agent);
}

#[tokio::test]
async fn records_not_found_page_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_raw("<h1>Not Found</h1>", "text/html"),
        )
        .mount(&server)
        .await;

    let result = checker(5, StatusPolicy::Record).check(&server.uri()).await.unwrap();

    assert_eq!(result.status_code, Some(404));
    assert_eq!(result.h1.as_deref(), Some("Not Found"));
    assert!(result.title.is_none());
}

#[tokio::test]
async fn reject_policy_fails_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = checker(5, StatusPolicy::Reject).check(&server.uri()).await.unwrap_err();
    assert!(matches!(err, CheckError::HttpStatus(503)));
}

#[tokio::test]
async fn follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/home", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<h1>Home</h1>", "text/html"))
        .mount(&server)
        .await;

    let result = checker(5, StatusPolicy::Record).check(&server.uri()).await.unwrap();
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.h1.as_deref(), Some("Home"));
}

#[tokio::test]
async fn slow_site_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1>late</h1>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = checker(1, StatusPolicy::Record).check(&server.uri()).await.unwrap_err();
    assert!(matches!(err, CheckError::Timeout { seconds: 1 }));
}

#[tokio::test]
async fn refused_connection_is_a_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = checker(5, StatusPolicy::Record)
        .check(&format!("http://127.0.0.1:{port}"))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::Connect(_)));
}

#[tokio::test]
async fn non_html_body_yields_empty_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let result = checker(5, StatusPolicy::Record).check(&server.uri()).await.unwrap();
    assert_eq!(result.status_code, Some(200));
    assert!(result.h1.is_none());
    assert!(result.title.is_none());
    assert!(result.description.is_none());
}
