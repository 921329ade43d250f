// ABOUTME: Integration tests for the TrainingPeaks client over a recording fake transport
// ABOUTME: Covers token gating, verb shaping, OAuth exchanges, header capture and introspection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use common::{sandbox_client, RecordingTransport};
use serde_json::{json, Value};
use std::collections::HashMap;
use trainingpeaks_api::{ClientError, HttpMethod, Parameters};
use url::Url;

fn query_map(url: &str) -> HashMap<String, String> {
    Url::parse(url).unwrap().query_pairs().into_owned().collect()
}

fn body_pairs(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

// =============================================================================
// Token Lifecycle Tests
// =============================================================================

#[test]
fn test_fresh_client_needs_no_refresh() {
    let client = sandbox_client(RecordingTransport::ok_json("{}"));
    assert!(!client.is_token_refresh_needed());
    assert_eq!(client.tokens().access_token(), None);
}

#[test]
fn test_set_access_token_returns_stored_token() {
    let mut client = sandbox_client(RecordingTransport::ok_json("{}"));
    let expires_at = Utc::now() + Duration::hours(2);

    let stored = client
        .set_access_token("A1", Some("R1".to_owned()), Some(expires_at))
        .unwrap();
    assert_eq!(stored, "A1");
    assert_eq!(client.tokens().refresh_token(), Some("R1"));
    assert_eq!(client.tokens().expires_at(), Some(expires_at));
    assert!(!client.is_token_refresh_needed());
}

#[test]
fn test_set_access_token_partial_update_keeps_previous_values() {
    let mut client = sandbox_client(RecordingTransport::ok_json("{}"));
    let expires_at = Utc::now() + Duration::hours(2);
    client
        .set_access_token("A1", Some("R1".to_owned()), Some(expires_at))
        .unwrap();

    client.set_access_token("A2", None, None).unwrap();

    assert_eq!(client.tokens().access_token(), Some("A2"));
    assert_eq!(client.tokens().refresh_token(), Some("R1"));
    assert_eq!(client.tokens().expires_at(), Some(expires_at));
}

#[test]
fn test_set_access_token_inside_window_is_rejected() {
    let mut client = sandbox_client(RecordingTransport::ok_json("{}"));
    client
        .set_access_token("A1", None, Some(Utc::now() + Duration::hours(2)))
        .unwrap();

    let result = client.set_access_token(
        "A2",
        Some("R2".to_owned()),
        Some(Utc::now() + Duration::minutes(30)),
    );

    assert!(matches!(result, Err(ClientError::TokenExpired)));
    assert_ne!(client.tokens().access_token(), Some("A2"));
    assert_eq!(client.tokens().refresh_token(), Some("R2"));
    assert!(client.is_token_refresh_needed());
}

#[test]
fn test_already_expired_token_is_rejected() {
    let mut client = sandbox_client(RecordingTransport::ok_json("{}"));
    let result = client.set_access_token("A1", None, Some(Utc::now() - Duration::hours(1)));
    assert!(result.unwrap_err().is_token_expired());
    assert_eq!(client.tokens().access_token(), None);
}

#[tokio::test]
async fn test_store_token_response_with_out_of_range_lifetime() {
    let transport = RecordingTransport::ok_json(
        r#"{"access_token":"A","refresh_token":"R","expires_in":9223372036854775807}"#,
    );
    let mut client = sandbox_client(transport);

    let response = client.token_exchange("code").await.unwrap();
    let stored = client
        .store_token_response(&response.token_response().unwrap())
        .unwrap();

    assert_eq!(stored, "A");
    assert_eq!(client.tokens().refresh_token(), Some("R"));
    assert_eq!(client.tokens().expires_at(), None);
    assert!(!client.is_token_refresh_needed());
}

#[test]
fn test_store_token_response() {
    let mut client = sandbox_client(RecordingTransport::ok_json("{}"));
    let response: trainingpeaks_api::TokenResponse = serde_json::from_value(json!({
        "access_token": "A9",
        "refresh_token": "R9",
        "expires_in": 7200,
        "token_type": "bearer"
    }))
    .unwrap();

    client.store_token_response(&response).unwrap();
    assert_eq!(client.tokens().access_token(), Some("A9"));
    assert_eq!(client.tokens().refresh_token(), Some("R9"));
    assert!(!client.is_token_refresh_needed());
}

// =============================================================================
// Freshness Gate Tests
// =============================================================================

#[tokio::test]
async fn test_stale_token_blocks_every_verb_without_transport_call() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client
        .set_access_token("A1", None, Some(Utc::now() + Duration::hours(2)))
        .unwrap();
    let _ = client.set_access_token("A2", None, Some(Utc::now() + Duration::minutes(5)));
    assert!(client.is_token_refresh_needed());

    let params = Parameters::new();
    for method in [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ] {
        let result = client.request(method, "activities", &params).await;
        assert!(
            matches!(result, Err(ClientError::TokenExpired)),
            "{method} was not gated"
        );
    }
    assert!(matches!(
        client.deauthorize().await,
        Err(ClientError::TokenExpired)
    ));

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refused_first_token_reports_expiry_not_absence() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    let _ = client.set_access_token("A", None, Some(Utc::now() - Duration::minutes(1)));
    assert_eq!(client.tokens().access_token(), None);

    let result = client.post("workouts", &Parameters::new()).await;
    assert!(matches!(result, Err(ClientError::TokenExpired)));
    assert!(matches!(
        client.deauthorize().await,
        Err(ClientError::TokenExpired)
    ));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_access_token_is_reported() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);

    let result = client.get("activities", &Parameters::new()).await;
    assert!(matches!(result, Err(ClientError::MissingAccessToken)));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_caller_access_token_parameter_is_rejected() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    let params = Parameters::new().with("access_token", "other");
    let result = client.get("activities", &params).await;

    assert!(matches!(
        result,
        Err(ClientError::ReservedParameter { ref key }) if key == "access_token"
    ));
    assert!(log.lock().unwrap().is_empty());
}

// =============================================================================
// Verb Shaping Tests
// =============================================================================

#[tokio::test]
async fn test_get_puts_parameters_in_query() {
    let transport = RecordingTransport::ok_json(r#"{"ok": true}"#);
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    let response = client
        .get("activities", &Parameters::new().with("foo", "bar"))
        .await
        .unwrap();

    let expected = "https://api.sandbox.trainingpeaks.com/v1/activities?foo=bar&access_token=T";
    let sent = log.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, expected);
    assert_eq!(sent[0].body, None);
    assert_eq!(sent[0].method(), HttpMethod::Get);
    assert_eq!(client.last_request_url(), expected);
    assert_eq!(client.last_request_parameters().get("foo"), Some("bar"));
    assert_eq!(response.body, json!({"ok": true}));
}

#[tokio::test]
async fn test_post_sends_form_body_without_override() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    client
        .post("workouts", &Parameters::new().with("title", "Sweet spot"))
        .await
        .unwrap();

    let sent = log.lock().unwrap().clone();
    assert_eq!(sent[0].url, "https://api.sandbox.trainingpeaks.com/v1/workouts");
    assert_eq!(sent[0].method_override, None);
    assert_eq!(sent[0].method(), HttpMethod::Post);
    assert_eq!(
        body_pairs(sent[0].body.as_deref().unwrap()),
        vec![
            ("title".to_owned(), "Sweet spot".to_owned()),
            ("access_token".to_owned(), "T".to_owned()),
        ]
    );
}

#[tokio::test]
async fn test_put_and_delete_override_method() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    client
        .put("workouts/7", &Parameters::new().with("title", "Tempo"))
        .await
        .unwrap();
    client.delete("workouts/7", &Parameters::new()).await.unwrap();

    let sent = log.lock().unwrap().clone();
    assert_eq!(sent[0].method_override, Some(HttpMethod::Put));
    assert_eq!(sent[0].method(), HttpMethod::Put);
    assert!(sent[0].body.as_deref().unwrap().contains("title=Tempo"));
    assert_eq!(sent[1].method_override, Some(HttpMethod::Delete));
    assert_eq!(sent[1].body.as_deref(), Some("access_token=T"));
    assert_eq!(sent[1].url, "https://api.sandbox.trainingpeaks.com/v1/workouts/7");
}

#[tokio::test]
async fn test_absolute_url_is_used_verbatim() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    client
        .get(
            "https://api.sandbox.trainingpeaks.com/v2/athlete/profile",
            &Parameters::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        log.lock().unwrap()[0].url,
        "https://api.sandbox.trainingpeaks.com/v2/athlete/profile?access_token=T"
    );
}

// =============================================================================
// OAuth Flow Tests
// =============================================================================

#[test]
fn test_authentication_url_has_no_network_call() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let client = sandbox_client(transport);

    let url = client.authentication_url("https://app/cb", Some("workouts"));

    assert!(url.starts_with("https://oauth.sandbox.trainingpeaks.com/oauth/authorize?"));
    let query = query_map(&url);
    assert_eq!(query["client_id"], "client-42");
    assert_eq!(query["redirect_uri"], "https://app/cb");
    assert_eq!(query["response_type"], "code");
    assert_eq!(query["scope"], "workouts");
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_authentication_url_without_scope() {
    let client = sandbox_client(RecordingTransport::ok_json("{}"));
    let query = query_map(&client.authentication_url("https://app/cb", None));
    assert!(!query.contains_key("scope"));
}

#[tokio::test]
async fn test_token_exchange_posts_authorization_code_grant() {
    let transport = RecordingTransport::ok_json(
        r#"{"access_token":"A","refresh_token":"R","expires_in":3600,"token_type":"bearer"}"#,
    );
    let log = transport.log();
    let mut client = sandbox_client(transport);

    let response = client.token_exchange("the-code").await.unwrap();

    let sent = log.lock().unwrap().clone();
    assert_eq!(sent[0].url, "https://oauth.sandbox.trainingpeaks.com/oauth/token");
    assert!(!sent[0].authenticated);
    let body: HashMap<_, _> = body_pairs(sent[0].body.as_deref().unwrap())
        .into_iter()
        .collect();
    assert_eq!(body["client_id"], "client-42");
    assert_eq!(body["client_secret"], "secret-shh");
    assert_eq!(body["code"], "the-code");
    assert_eq!(body["grant_type"], "authorization_code");

    let tokens = response.token_response().unwrap();
    assert_eq!(tokens.access_token, "A");
    assert_eq!(tokens.refresh_token.as_deref(), Some("R"));
    assert_eq!(client.tokens().access_token(), None);
}

#[tokio::test]
async fn test_token_exchange_ignores_stale_token() {
    let mut client = sandbox_client(RecordingTransport::ok_json("{}"));
    let _ = client.set_access_token("A", Some("R".to_owned()), Some(Utc::now()));
    assert!(client.is_token_refresh_needed());

    assert!(client.token_exchange("code").await.is_ok());
    assert!(client.token_exchange_refresh().await.unwrap().is_some());
}

#[tokio::test]
async fn test_refresh_without_refresh_token_skips_transport() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);

    assert!(client.token_exchange_refresh().await.unwrap().is_none());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_posts_refresh_grant() {
    let transport = RecordingTransport::ok_json(r#"{"access_token":"A2"}"#);
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_refresh_token("R1");

    let response = client.token_exchange_refresh().await.unwrap().unwrap();

    let sent = log.lock().unwrap().clone();
    let body: HashMap<_, _> = body_pairs(sent[0].body.as_deref().unwrap())
        .into_iter()
        .collect();
    assert_eq!(body["grant_type"], "refresh_token");
    assert_eq!(body["refresh_token"], "R1");
    assert_eq!(response.body["access_token"], "A2");
}

#[tokio::test]
async fn test_deauthorize_posts_access_token() {
    let transport = RecordingTransport::ok_json("{}");
    let log = transport.log();
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    client.deauthorize().await.unwrap();

    let sent = log.lock().unwrap().clone();
    assert_eq!(
        sent[0].url,
        "https://oauth.sandbox.trainingpeaks.com/oauth/deauthorize"
    );
    assert_eq!(sent[0].method(), HttpMethod::Post);
    assert_eq!(sent[0].body.as_deref(), Some("access_token=T"));
}

// =============================================================================
// Response Introspection Tests
// =============================================================================

#[tokio::test]
async fn test_headers_captured_from_last_response() {
    let transport = RecordingTransport::responding(
        200,
        "{}",
        &["X-Foo: bar", "Content-Type: application/json"],
    );
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    let response = client.get("activities", &Parameters::new()).await.unwrap();

    assert_eq!(client.response_header("X-Foo").unwrap(), "bar");
    assert_eq!(response.header("Content-Type").unwrap(), "application/json");
    assert!(matches!(
        client.response_header("X-Missing"),
        Err(ClientError::HeaderNotFound { ref name }) if name == "X-Missing"
    ));
    assert_eq!(client.response_headers().len(), 2);
    assert_eq!(client.last_request_info().unwrap().status, 200);
}

#[tokio::test]
async fn test_non_json_body_decodes_to_null() {
    let transport = RecordingTransport::responding(502, "<html>bad gateway</html>", &[]);
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    let response = client.get("activities", &Parameters::new()).await.unwrap();

    assert_eq!(response.body, Value::Null);
    assert_eq!(response.raw_body, "<html>bad gateway</html>");
    assert_eq!(response.status(), 502);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_transport_failure_clears_previous_response_state() {
    let transport = RecordingTransport::responding(200, "{}", &["X-Foo: bar"])
        .then(RecordingTransport::failing("connection refused"));
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    client.get("activities", &Parameters::new()).await.unwrap();
    assert_eq!(client.response_header("X-Foo").unwrap(), "bar");
    assert!(client.last_request_info().is_some());

    let result = client
        .get("athlete/profile", &Parameters::new().with("page", 2))
        .await;

    match result {
        Err(ClientError::Transport { reason }) => assert!(reason.contains("connection refused")),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(client.response_headers().is_empty());
    assert!(client.last_request_info().is_none());
    assert_eq!(
        client.last_request_url(),
        "https://api.sandbox.trainingpeaks.com/v1/athlete/profile?page=2&access_token=T"
    );
    assert_eq!(client.last_request_parameters().get("page"), Some("2"));
}

#[tokio::test]
async fn test_headers_replaced_by_next_response() {
    let transport = RecordingTransport::responding(200, "{}", &["X-Foo: bar", "X-Page: 1"])
        .then(RecordingTransport::responding(200, "{}", &["X-Page: 2"]));
    let mut client = sandbox_client(transport);
    client.set_access_token("T", None, None).unwrap();

    client.get("activities", &Parameters::new()).await.unwrap();
    client.get("activities", &Parameters::new()).await.unwrap();

    let captured: Vec<_> = client.response_headers().iter().collect();
    assert_eq!(captured, vec![("X-Page", "2")]);
    assert!(matches!(
        client.response_header("X-Foo"),
        Err(ClientError::HeaderNotFound { .. })
    ));
}
