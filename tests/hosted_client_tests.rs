//! Hosted functions backend against a mock function host.

use mockito::{Matcher, Server};
use serde_json::json;
use status_client::{
    ClientConfig, ErrorInfo, FunctionsClient, HostedFunctionsClient, HttpMethod, InvokeOptions,
    InvokeResponse, StatusAction, StatusClient,
};

fn hosted_client(url: &str) -> StatusClient {
    let mut config = ClientConfig::hosted(url, "anon-key");
    config.hosted.timeout_ms = 2000;
    StatusClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_invoke_posts_to_function_with_credentials() {
    let mut server = Server::new_async().await;
    let function = server
        .mock("POST", "/functions/v1/status-aggregator")
        .match_header("authorization", "Bearer anon-key")
        .match_header("apikey", "anon-key")
        .match_body(Matcher::Json(json!({"action": "maintenances"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"maintenances":[]}"#)
        .create_async()
        .await;

    let client = hosted_client(&server.url());
    assert!(client.is_hosted());

    let response = client.aggregate(StatusAction::Maintenances).await;

    assert_eq!(response, InvokeResponse::ok(json!({"maintenances": []})));
    function.assert_async().await;
}

#[tokio::test]
async fn test_hosted_mode_never_touches_local_paths() {
    let mut server = Server::new_async().await;
    let local = server
        .mock("GET", Matcher::Regex(r"^/(status-|api/)".to_string()))
        .expect(0)
        .create_async()
        .await;
    let function = server
        .mock("POST", "/functions/v1/status-overview")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"source":"hosted"}"#)
        .create_async()
        .await;

    let mut config = ClientConfig::hosted(server.url(), "anon-key");
    config.fallback.base_url = server.url();
    let client = StatusClient::from_config(&config).unwrap();

    let response = client.status_overview().await;

    assert_eq!(response.data, Some(json!({"source": "hosted"})));
    function.assert_async().await;
    local.assert_async().await;
}

#[tokio::test]
async fn test_get_method_hint_is_honored() {
    let mut server = Server::new_async().await;
    let function = server
        .mock("GET", "/functions/v1/status-overview")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let client = hosted_client(&server.url());
    let response = client
        .invoke(
            "status-overview",
            InvokeOptions {
                method: Some(HttpMethod::Get),
                body: None,
            },
        )
        .await;

    assert!(response.is_ok());
    function.assert_async().await;
}

#[tokio::test]
async fn test_non_success_maps_to_http_error() {
    let mut server = Server::new_async().await;
    let _function = server
        .mock("POST", "/functions/v1/status-overview")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = hosted_client(&server.url());
    let response = client.status_overview().await;

    assert_eq!(response, InvokeResponse::err(ErrorInfo::Http(503)));
}

#[tokio::test]
async fn test_unknown_function_is_delegated_to_host() {
    let mut server = Server::new_async().await;
    let function = server
        .mock("POST", "/functions/v1/nonexistent-op")
        .with_status(404)
        .create_async()
        .await;

    let client = hosted_client(&server.url());
    let response = client
        .invoke("nonexistent-op", InvokeOptions::default())
        .await;

    assert_eq!(response.error, Some(ErrorInfo::Http(404)));
    function.assert_async().await;
}

#[tokio::test]
async fn test_text_and_empty_bodies() {
    let mut server = Server::new_async().await;
    let _text = server
        .mock("POST", "/functions/v1/plain")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("all systems go")
        .create_async()
        .await;
    let _empty = server
        .mock("POST", "/functions/v1/empty")
        .with_status(204)
        .create_async()
        .await;

    let client = HostedFunctionsClient::from_credentials(&server.url(), "anon-key", 2000).unwrap();

    let text = client.invoke("plain", InvokeOptions::default()).await;
    assert_eq!(text, InvokeResponse::ok(json!("all systems go")));

    let empty = client.invoke("empty", InvokeOptions::default()).await;
    assert_eq!(empty, InvokeResponse::ok(serde_json::Value::Null));
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mut server = Server::new_async().await;
    let _function = server
        .mock("POST", "/functions/v1/status-overview")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let client = hosted_client(&server.url());
    let response = client.status_overview().await;

    assert!(matches!(response.error, Some(ErrorInfo::Decode(_))));
    assert_eq!(response.data, None);
}
