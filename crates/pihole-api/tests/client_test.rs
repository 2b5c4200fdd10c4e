#![allow(clippy::unwrap_used)]
// Integration tests for `PiholeClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use pihole_api::{Error, PiholeClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PiholeClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = PiholeClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("hunter2".to_string()),
    );
    (server, client)
}

fn session_body(sid: Option<&str>, valid: bool) -> Value {
    json!({
        "session": { "valid": valid, "totp": false, "sid": sid, "validity": 1800 },
        "took": 0.003
    })
}

async fn mount_login(server: &MockServer, sid: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(Some(sid), true)))
        .mount(server)
        .await;
}

async fn mount_probe(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_summary(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queries": {
                "total": 1000, "blocked": 250, "percent_blocked": 25.0,
                "unique_domains": 300, "forwarded": 500, "cached": 250
            },
            "clients": { "active": 4, "total": 9 },
            "gravity": { "domains_being_blocked": 120_000 }
        })))
        .mount(server)
        .await;
}

/// `METHOD /path` for every request the server saw, in order.
async fn calls(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| format!("{} {}", r.method.as_str(), r.url.path()))
        .collect()
}

async fn last_request(server: &MockServer) -> Request {
    server.received_requests().await.unwrap().pop().unwrap()
}

fn sid_header(req: &Request) -> Option<String> {
    req.headers
        .get("sid")
        .map(|v| v.to_str().unwrap().to_owned())
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_session_id() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    let resp = client.login().await.unwrap();

    assert_eq!(resp.code, 200);
    assert_eq!(resp.reason, "OK");
    assert_eq!(resp.data["session"]["sid"], json!("abc123"));
    assert_eq!(
        client.session_id().await.unwrap().expose_secret(),
        "abc123"
    );

    let req = last_request(&server).await;
    assert_eq!(req.body_json::<Value>().unwrap(), json!({ "password": "hunter2" }));
    assert_eq!(sid_header(&req), None);
    assert_eq!(
        req.headers.get("accept").unwrap().to_str().unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_login_failure_keeps_no_session() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "key": "unauthorized", "message": "Unauthorized" }
        })))
        .mount(&server)
        .await;

    let result = client.login().await;

    assert!(
        matches!(result, Err(Error::Unauthorized)),
        "expected Unauthorized, got: {result:?}"
    );
    assert!(!client.has_session().await);
}

#[tokio::test]
async fn test_login_without_session_object_is_unexpected_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "took": 0.1 })))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(matches!(result, Err(Error::UnexpectedBody { .. })));
}

#[tokio::test]
async fn test_logout_clears_session_with_empty_body() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/auth"))
        .and(header("sid", "abc123"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let resp = client.logout().await.unwrap();

    assert_eq!(resp.code, 204);
    assert!(resp.data.is_empty());
    assert!(!client.has_session().await);
}

#[tokio::test]
async fn test_logout_clears_session_regardless_of_body() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
        )
        .mount(&server)
        .await;

    client.login().await.unwrap();
    client.logout().await.unwrap();

    assert!(!client.has_session().await);
}

#[tokio::test]
async fn test_authentication_status_logs_in_first_without_session() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;

    let resp = client.authentication_status().await.unwrap();

    assert_eq!(resp.data["session"]["valid"], json!(true));
    assert_eq!(calls(&server).await, vec!["POST /api/auth", "GET /api/auth"]);
    assert_eq!(sid_header(&last_request(&server).await).as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_authentication_status_does_not_probe_itself() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), false)),
    )
    .await;

    client.login().await.unwrap();
    let resp = client.authentication_status().await.unwrap();

    assert_eq!(resp.data["session"]["valid"], json!(false));
    assert_eq!(calls(&server).await, vec!["POST /api/auth", "GET /api/auth"]);
}

// ── Session pipeline tests ──────────────────────────────────────────

#[tokio::test]
async fn test_first_call_logs_in_before_dispatch() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_summary(&server).await;

    client.summary().await.unwrap();

    assert_eq!(
        calls(&server).await,
        vec!["POST /api/auth", "GET /api/stats/summary"]
    );
    assert_eq!(sid_header(&last_request(&server).await).as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_valid_session_is_probed_and_reused() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;
    mount_summary(&server).await;

    client.login().await.unwrap();
    client.summary().await.unwrap();

    assert_eq!(
        calls(&server).await,
        vec!["POST /api/auth", "GET /api/auth", "GET /api/stats/summary"]
    );
}

#[tokio::test]
async fn test_invalid_session_triggers_relogin() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(Some("first"), true)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_login(&server, "second").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(None, false)),
    )
    .await;
    mount_summary(&server).await;

    client.login().await.unwrap();
    client.summary().await.unwrap();

    assert_eq!(
        calls(&server).await,
        vec![
            "POST /api/auth",
            "GET /api/auth",
            "POST /api/auth",
            "GET /api/stats/summary"
        ]
    );
    assert_eq!(sid_header(&last_request(&server).await).as_deref(), Some("second"));
    assert_eq!(client.session_id().await.unwrap().expose_secret(), "second");
}

#[tokio::test]
async fn test_unauthorized_probe_triggers_relogin() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(&server, ResponseTemplate::new(401)).await;
    mount_summary(&server).await;

    client.login().await.unwrap();
    client.summary().await.unwrap();

    assert_eq!(
        calls(&server).await,
        vec![
            "POST /api/auth",
            "GET /api/auth",
            "POST /api/auth",
            "GET /api/stats/summary"
        ]
    );
}

#[tokio::test]
async fn test_non_200_probe_triggers_relogin() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(&server, ResponseTemplate::new(204)).await;
    mount_summary(&server).await;

    client.login().await.unwrap();
    client.summary().await.unwrap();

    assert_eq!(
        calls(&server).await,
        vec![
            "POST /api/auth",
            "GET /api/auth",
            "POST /api/auth",
            "GET /api/stats/summary"
        ]
    );
}

#[tokio::test]
async fn test_probe_server_error_propagates() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(&server, ResponseTemplate::new(500)).await;
    mount_summary(&server).await;

    client.login().await.unwrap();
    let result = client.summary().await;

    assert!(matches!(result, Err(Error::ServerError)), "got: {result:?}");
    assert_eq!(calls(&server).await, vec!["POST /api/auth", "GET /api/auth"]);
    assert!(client.has_session().await);
}

#[tokio::test]
async fn test_failed_implicit_login_aborts_operation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    mount_summary(&server).await;

    let result = client.summary().await;

    assert!(matches!(result, Err(Error::TooManyRequests)), "got: {result:?}");
    assert_eq!(calls(&server).await, vec!["POST /api/auth"]);
    assert!(client.summary_cache().is_empty());
}

#[tokio::test]
async fn test_passwordless_appliance_sends_no_sid() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(None, true)))
        .mount(&server)
        .await;
    mount_summary(&server).await;

    client.summary().await.unwrap();

    assert!(!client.has_session().await);
    assert_eq!(sid_header(&last_request(&server).await), None);
}

// ── Statistics tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_summary_updates_cache() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_summary(&server).await;

    let resp = client.summary().await.unwrap();

    assert_eq!(client.summary_cache(), resp.data);
    let stats = client.summary_stats().unwrap();
    assert_eq!(stats.queries.blocked, 250);
    assert_eq!(stats.clients.active, 4);
    assert_eq!(stats.gravity.domains_being_blocked, 120_000);
}

#[tokio::test]
async fn test_summary_cache_survives_failure() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "queries": { "total": 7 } })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    client.summary().await.unwrap();
    let result = client.summary().await;

    assert!(matches!(result, Err(Error::ServiceUnavailable)));
    assert_eq!(client.summary_cache()["queries"]["total"], json!(7));
}

#[tokio::test]
async fn test_padd_full_query_parameter() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/api/padd"))
        .and(query_param("full", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cpu_percent": 3.5 })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.padd(false).await.unwrap();

    assert_eq!(resp.data["cpu_percent"], json!(3.5));
    assert_eq!(client.padd_cache(), resp.data);
}

#[tokio::test]
async fn test_refresh_polls_in_order() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;
    mount_summary(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/dns/blocking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "enabled", "timer": null })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/padd"))
        .and(query_param("full", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "active_clients": 3 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "groups": [] })))
        .mount(&server)
        .await;

    client.refresh().await.unwrap();

    let targets: Vec<String> = calls(&server)
        .await
        .into_iter()
        .filter(|c| !c.ends_with("/api/auth"))
        .collect();
    assert_eq!(
        targets,
        vec![
            "GET /api/stats/summary",
            "GET /api/dns/blocking",
            "GET /api/padd",
            "GET /api/groups"
        ]
    );
    assert!(client.blocking_state().unwrap().is_enabled());
}

// ── Blocking tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_blocking_disable_with_timer() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("POST"))
        .and(path("/api/dns/blocking"))
        .and(body_json(json!({ "blocking": false, "timer": 120 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "disabled", "timer": 120.0 })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .blocking_disable(Some(pihole_api::DEFAULT_DISABLE_SECS))
        .await
        .unwrap();

    let state = client.blocking_state().unwrap();
    assert!(!state.is_enabled());
    assert_eq!(state.timer, Some(120.0));
}

#[tokio::test]
async fn test_blocking_disable_indefinitely_sends_null_timer() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("POST"))
        .and(path("/api/dns/blocking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "disabled", "timer": null })))
        .mount(&server)
        .await;

    client.blocking_disable(None).await.unwrap();

    let body: Value = last_request(&server).await.body_json().unwrap();
    assert_eq!(body, json!({ "blocking": false, "timer": null }));
}

#[tokio::test]
async fn test_blocking_enable_sends_no_timer() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("POST"))
        .and(path("/api/dns/blocking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "enabled", "timer": null })))
        .mount(&server)
        .await;

    client.blocking_enable().await.unwrap();

    let body: Value = last_request(&server).await.body_json().unwrap();
    assert_eq!(body, json!({ "blocking": true, "timer": null }));
    assert_eq!(client.blocking_cache()["blocking"], json!("enabled"));
}

// ── Group tests ─────────────────────────────────────────────────────

async fn mount_groups(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [
                { "name": "g1", "comment": "c", "enabled": true, "id": 1, "date_added": 1 }
            ],
            "took": 0.001
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_groups_populates_cache() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_groups(&server).await;

    client.list_groups().await.unwrap();

    let cache = serde_json::to_value(client.groups_cache()).unwrap();
    assert_eq!(
        cache,
        json!({ "g1": { "name": "g1", "comment": "c", "enabled": true } })
    );
}

#[tokio::test]
async fn test_list_groups_rebuilds_cache() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [{ "name": "old", "comment": null, "enabled": true }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_groups(&server).await;

    client.list_groups().await.unwrap();
    client.list_groups().await.unwrap();

    let cache = client.groups_cache();
    assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["g1"]);
}

#[tokio::test]
async fn test_group_enable_carries_comment() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;
    mount_groups(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/groups/g1"))
        .and(body_json(json!({ "name": "g1", "comment": "c", "enabled": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "processed": { "success": [{ "item": "g1" }] } })))
        .expect(1)
        .mount(&server)
        .await;

    client.list_groups().await.unwrap();
    client.group_enable("g1").await.unwrap();
}

#[tokio::test]
async fn test_group_disable_sends_false() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;
    mount_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(session_body(Some("abc123"), true)),
    )
    .await;
    mount_groups(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/groups/g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.list_groups().await.unwrap();
    client.group_disable("g1").await.unwrap();

    let body: Value = last_request(&server).await.body_json().unwrap();
    assert_eq!(body, json!({ "name": "g1", "comment": "c", "enabled": false }));
}

#[tokio::test]
async fn test_unknown_group_sends_nothing() {
    let (server, client) = setup().await;

    let result = client.group_enable("nope").await;

    match result {
        Err(Error::UnknownGroup { ref name }) => assert_eq!(name, "nope"),
        other => panic!("expected UnknownGroup, got: {other:?}"),
    }
    assert!(calls(&server).await.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_mapped_status_error() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/api/dns/blocking"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.blocking_status().await;
    assert!(matches!(result, Err(Error::Forbidden)), "got: {result:?}");
}

#[tokio::test]
async fn test_unmapped_status_is_unimplemented() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    match client.summary().await {
        Err(Error::UnimplementedStatus { status }) => assert_eq!(status, 418),
        other => panic!("expected UnimplementedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_content_type_error() {
    let (server, client) = setup().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.summary().await;
    assert!(
        matches!(result, Err(Error::ContentType { .. })),
        "got: {result:?}"
    );
    assert!(client.summary_cache().is_empty());
}

#[tokio::test]
async fn test_timeout_is_client_connector() {
    let (server, client) = setup().await;
    let client = client.with_timeout(Duration::from_millis(100));

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(session_body(Some("abc123"), true))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.login().await;

    match result {
        Err(ref err @ Error::ClientConnector(_)) => assert!(err.is_timeout()),
        other => panic!("expected ClientConnector, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_client_connector() {
    // Bind then drop a listener to get a port nothing is serving.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = PiholeClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{port}/api")).unwrap(),
        SecretString::from("hunter2".to_string()),
    );

    let result = client.summary().await;
    assert!(
        matches!(result, Err(Error::ClientConnector(_))),
        "got: {result:?}"
    );
}
