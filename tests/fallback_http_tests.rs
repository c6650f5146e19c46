//! Fallback backend against a live HTTP server.
//!
//! Every test runs its own mockito server so candidate paths never collide.

use mockito::Server;
use serde_json::json;
use status_client::{
    ClientConfig, ErrorInfo, FunctionsClient, InvokeOptions, InvokeResponse, StatusAction,
    StatusClient,
};

fn fallback_client(base_url: &str) -> StatusClient {
    let mut config = ClientConfig::fallback(base_url);
    config.fallback.timeout_ms = 2000;
    StatusClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_overview_served_by_primary_path() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("GET", "/status-overview")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"operational","components":3}"#)
        .create_async()
        .await;
    let secondary = server
        .mock("GET", "/api/status/overview")
        .expect(0)
        .create_async()
        .await;

    let client = fallback_client(&server.url());
    let response = client.status_overview().await;

    assert_eq!(
        response,
        InvokeResponse::ok(json!({"status": "operational", "components": 3}))
    );
    primary.assert_async().await;
    secondary.assert_async().await;
}

#[tokio::test]
async fn test_secondary_path_used_after_non_success() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("GET", "/status-aggregator?action=incidents")
        .with_status(502)
        .create_async()
        .await;
    let secondary = server
        .mock("GET", "/api/status/incidents")
        .with_status(200)
        .with_body(r#"[{"id":"inc-1","status":"investigating"}]"#)
        .create_async()
        .await;

    let client = fallback_client(&server.url());
    let response = client.aggregate(StatusAction::Incidents).await;

    assert_eq!(
        response.into_result(),
        Ok(json!([{"id": "inc-1", "status": "investigating"}]))
    );
    primary.assert_async().await;
    secondary.assert_async().await;
}

#[tokio::test]
async fn test_each_action_hits_its_own_paths() {
    let cases = [
        (
            StatusAction::Maintenances,
            "/status-aggregator?action=maintenances",
            "/api/status/maintenances",
        ),
        (
            StatusAction::Components,
            "/status-aggregator?action=components",
            "/api/status/components",
        ),
        (
            StatusAction::Overview,
            "/status-overview",
            "/api/status/overview",
        ),
    ];

    for (action, primary_path, secondary_path) in cases {
        let mut server = Server::new_async().await;
        let primary = server
            .mock("GET", primary_path)
            .with_status(404)
            .create_async()
            .await;
        let secondary = server
            .mock("GET", secondary_path)
            .with_status(200)
            .with_body(format!(r#"{{"action":"{}"}}"#, action))
            .create_async()
            .await;

        let client = fallback_client(&server.url());
        let response = client.aggregate(action).await;

        assert_eq!(
            response,
            InvokeResponse::ok(json!({ "action": action.as_str() })),
            "action {}",
            action
        );
        primary.assert_async().await;
        secondary.assert_async().await;
    }
}

#[tokio::test]
async fn test_both_paths_non_success_is_generic_failure() {
    let mut server = Server::new_async().await;
    let _primary = server
        .mock("GET", "/status-overview")
        .with_status(500)
        .create_async()
        .await;
    let _secondary = server
        .mock("GET", "/api/status/overview")
        .with_status(503)
        .create_async()
        .await;

    let client = fallback_client(&server.url());
    let response = client
        .invoke("status-aggregator", InvokeOptions::with_action("bogus"))
        .await;

    assert_eq!(response.data, None);
    assert_eq!(response.error, Some(ErrorInfo::all_endpoints_failed()));
}

#[tokio::test]
async fn test_invalid_json_falls_through_to_secondary() {
    let mut server = Server::new_async().await;
    let _primary = server
        .mock("GET", "/status-overview")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<!doctype html><html></html>")
        .create_async()
        .await;
    let _secondary = server
        .mock("GET", "/api/status/overview")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let client = fallback_client(&server.url());
    let response = client
        .invoke("status-overview", InvokeOptions::default())
        .await;

    assert_eq!(response, InvokeResponse::ok(json!({"ok": true})));
}

#[tokio::test]
async fn test_post_hint_is_sent_as_get_to_local_endpoints() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("GET", "/status-aggregator?action=components")
        .with_status(200)
        .with_body(r#"{"components":[]}"#)
        .create_async()
        .await;

    let client = fallback_client(&server.url());
    let response = client
        .invoke(
            "status-aggregator",
            InvokeOptions::post(json!({"action": "components"})),
        )
        .await;

    assert!(response.is_ok());
    primary.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_origin_reports_network_error() {
    // Reserve a port, then close it so connections are refused
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = fallback_client(&format!("http://{}", addr));
    let response = client.status_overview().await;

    assert_eq!(response.data, None);
    assert!(
        matches!(response.error, Some(ErrorInfo::Network(_))),
        "unexpected error: {:?}",
        response.error
    );
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let mut server = Server::new_async().await;
    let _overview = server
        .mock("GET", "/status-overview")
        .with_status(200)
        .with_body(r#"{"kind":"overview"}"#)
        .expect(2)
        .create_async()
        .await;
    let _incidents = server
        .mock("GET", "/status-aggregator?action=incidents")
        .with_status(200)
        .with_body(r#"{"kind":"incidents"}"#)
        .create_async()
        .await;

    let client = fallback_client(&server.url());
    let responses = futures::future::join_all([
        client.invoke("status-overview", InvokeOptions::default()),
        client.invoke("status-aggregator", InvokeOptions::with_action("incidents")),
        client.invoke("status-aggregator", InvokeOptions::default()),
        client.invoke("status-history", InvokeOptions::default()),
    ])
    .await;

    assert_eq!(responses[0].data, Some(json!({"kind": "overview"})));
    assert_eq!(responses[1].data, Some(json!({"kind": "incidents"})));
    assert_eq!(responses[2].data, Some(json!({"kind": "overview"})));
    assert_eq!(
        responses[3].error,
        Some(ErrorInfo::unknown_function("status-history"))
    );
}
