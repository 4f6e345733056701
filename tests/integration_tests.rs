//! Integration tests using wiremock to simulate the VK API and OAuth servers.
//!
//! The client is blocking, so every client is created, used and dropped
//! inside `spawn_blocking` while the mock server runs on the test runtime.

use serde_json::json;
use std::time::{Duration, Instant};
use vkapi::{methods, Client, ClientBuilder, Error, ErrorCode, Params};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(uri: &str) -> ClientBuilder {
    Client::builder()
        .api_url(format!("{}/method/", uri))
        .unwrap()
        .oauth_url(uri)
        .unwrap()
        .max_requests_per_second(100)
}

async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_successful_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .and(query_param("user_ids", "1"))
        .and(query_param("v", "5.45"))
        .and(query_param("lang", "en"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{"id": 1, "first_name": "Pavel", "last_name": "Durov"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let envelope = blocking(move || {
        let mut client = client_for(&uri)
            .access_token("tok")
            .api_version("5.45")
            .lang("en")
            .build()
            .unwrap();
        client.invoke(methods::users::GET, Params::new().with("user_ids", "1"))
    })
    .await
    .unwrap();

    assert_eq!(envelope["response"][0]["first_name"], "Pavel");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_spaces_are_escaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/users.search"))
        .and(query_param("q", "Pavel Durov"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": {"count": 0, "items": []}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let envelope = blocking(move || {
        let mut client = client_for(&uri).build().unwrap();
        client.call("users.search", Params::from([("q", "Pavel Durov")]))
    })
    .await
    .unwrap();

    assert_eq!(envelope.response().unwrap()["count"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/wall.get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {
                "error_code": 15,
                "error_msg": "Access denied",
                "request_params": [
                    {"key": "oauth", "value": "1"},
                    {"key": "method", "value": "wall.get"},
                    {"key": "owner_id", "value": "1"}
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = blocking(move || {
        let mut client = client_for(&uri).build().unwrap();
        client.call("wall.get", Params::new().with("owner_id", "1"))
    })
    .await;

    match result {
        Err(Error::Api(api_error)) => {
            assert_eq!(api_error.code, ErrorCode::ACCESS_DENIED);
            assert_eq!(api_error.message, "Access denied");
            assert_eq!(api_error.request_params.len(), 3);
            assert_eq!(api_error.request_param("owner_id"), Some("1"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = blocking(move || {
        let mut client = client_for(&uri).build().unwrap();
        client.call("users.get", Params::new())
    })
    .await;

    match result {
        Err(Error::Decode { raw_response, .. }) => {
            assert_eq!(raw_response, "<html>Bad Gateway</html>");
        }
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_success_status_is_still_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"response": [1]})))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let envelope = blocking(move || {
        let mut client = client_for(&uri).build().unwrap();
        client.call("users.get", Params::new())
    })
    .await
    .unwrap();

    assert_eq!(envelope.response(), Some(&json!([1])));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeouts_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = blocking(move || {
        let mut client = client_for(&uri)
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        client.call("users.get", Params::new())
    })
    .await;

    match result {
        Err(e @ Error::Transport { .. }) => {
            assert!(e.is_timeout());
            assert!(matches!(e, Error::Transport { attempts: 3, .. }));
        }
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused_is_not_retried() {
    let result = blocking(|| {
        // Nothing listens on the discard port
        let mut client = client_for("http://127.0.0.1:9").build().unwrap();
        client.call("users.get", Params::new())
    })
    .await;

    match result {
        Err(e @ Error::Transport { .. }) => {
            assert!(!e.is_timeout());
            assert!(matches!(e, Error::Transport { attempts: 1, .. }));
        }
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rate_limit_blocks_fourth_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/utils.getServerTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": 1454000000})))
        .expect(4)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let elapsed = blocking(move || {
        let mut client = client_for(&uri).max_requests_per_second(3).build().unwrap();
        let start = Instant::now();
        for _ in 0..4 {
            client
                .invoke(methods::utils::GET_SERVER_TIME, Params::new())
                .unwrap();
        }
        start.elapsed()
    })
    .await;

    assert!(
        elapsed >= Duration::from_millis(900),
        "Fourth call should wait for the window, took {:?}",
        elapsed
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_authorize_and_use_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/token"))
        .and(query_param("grant_type", "password"))
        .and(query_param("client_id", "3697615"))
        .and(query_param("client_secret", "AlVXZFMUqyrnABp8ncuU"))
        .and(query_param("username", "user@example.com"))
        .and(query_param("password", "secret phrase"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "533bacf01e11f55b536a565b57531ac114461ae8736d6506a3",
            "expires_in": 0,
            "user_id": 66748
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/method/users.search"))
        .and(query_param(
            "access_token",
            "533bacf01e11f55b536a565b57531ac114461ae8736d6506a3",
        ))
        .and(query_param("count", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"count": 2, "items": [{"id": 1}, {"id": 2}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (token, envelope) = blocking(move || {
        let mut client = client_for(&uri)
            .app_id("3697615")
            .app_secret("AlVXZFMUqyrnABp8ncuU")
            .build()
            .unwrap();
        let token = client.authorize("user@example.com", "secret phrase").unwrap();
        let envelope = client
            .invoke(methods::users::SEARCH, Params::new().with("count", "500"))
            .unwrap();
        (token, envelope)
    })
    .await;

    assert_eq!(token, "533bacf01e11f55b536a565b57531ac114461ae8736d6506a3");
    assert_eq!(envelope["response"]["items"][1]["id"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_authorize_rejected_by_oauth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Username or password is incorrect"
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (result, token) = blocking(move || {
        let mut client = client_for(&uri).access_token("previous").build().unwrap();
        let result = client.authorize("user@example.com", "wrong");
        (result, client.access_token().map(str::to_string))
    })
    .await;

    match result {
        Err(Error::Authorization { message }) => {
            assert!(message.contains("invalid_client"));
        }
        other => panic!("Expected Authorization error, got {:?}", other),
    }
    assert_eq!(token.as_deref(), Some("previous"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_authorize_with_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {
                "error_code": 5,
                "error_msg": "User authorization failed: invalid application type",
                "request_params": []
            }
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (result, token) = blocking(move || {
        let mut client = client_for(&uri).build().unwrap();
        let result = client.authorize("user@example.com", "password");
        (result, client.access_token().map(str::to_string))
    })
    .await;

    assert_eq!(
        result.unwrap_err().api_code(),
        Some(ErrorCode::AUTHORIZATION_FAILED)
    );
    assert_eq!(token, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_last_response_tracks_latest_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/method/friends.get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": [1, 2]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/method/friends.del"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (first, second) = blocking(move || {
        let mut client = client_for(&uri).build().unwrap();
        client.invoke(methods::friends::GET, Params::new()).unwrap();
        let first = client.last_response().cloned();
        let _ = client.invoke(methods::friends::DEL, Params::new());
        (first, client.last_response().cloned())
    })
    .await;

    assert_eq!(first.unwrap().response(), Some(&json!([1, 2])));
    assert!(second.is_none());
}
