//! Integration tests for `Client` over `HyperTransport` using wiremock.

use std::collections::HashMap;
use std::time::Duration;

use hasty::{Client, Config, DEFAULT_USER_AGENT, Error, Header, StatusErrorHandler};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, header, method, path},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn url(server: &MockServer, path: &str) -> String {
    format!("{}{path}", server.uri())
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let mut out = User::default();

    let status = client
        .get(&url(&mock_server, "/users/1"), Some(&mut out), None)
        .await
        .expect("response");

    assert_eq!(status, 200);
    assert_eq!(out, user);
}

#[tokio::test]
async fn test_post_request_with_json_body() {
    let mock_server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };
    let output = User {
        id: 42,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(&output))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let mut out = User::default();

    let status = client
        .post(&url(&mock_server, "/users"), Some(&input), Some(&mut out), None)
        .await
        .expect("response");

    assert_eq!(status, 201);
    assert_eq!(out, output);
}

#[tokio::test]
async fn test_put_patch_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(serde_json::json!({"name": "Carol"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/1"))
        .and(body_json(serde_json::json!({"name": "Dave"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let uri = url(&mock_server, "/users/1");

    let put = client
        .put::<_, ()>(&uri, Some(&serde_json::json!({"name": "Carol"})), None, None)
        .await
        .expect("put");
    let patch = client
        .patch::<_, ()>(&uri, Some(&serde_json::json!({"name": "Dave"})), None, None)
        .await
        .expect("patch");
    let delete = client
        .delete::<(), ()>(&uri, None, None, None)
        .await
        .expect("delete");

    assert_eq!((put, patch, delete), (200, 202, 204));
}

#[tokio::test]
async fn test_custom_headers_sent_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("X-Api-Key", "secret"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let headers = Header::from([
        ("X-Api-Key".to_string(), "secret".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]);

    let status = client
        .get::<()>(&url(&mock_server, "/headers"), None, Some(&headers))
        .await
        .expect("response");

    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_post_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("foo=bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let form = HashMap::from([("foo".to_string(), "bar".to_string())]);
    let mut out = HashMap::<String, bool>::new();

    let status = client
        .post_form(&url(&mock_server, "/login"), &form, Some(&mut out), None)
        .await
        .expect("response");

    assert_eq!(status, 200);
    assert_eq!(out.get("ok"), Some(&true));
}

#[tokio::test]
async fn test_not_found_returns_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let client = Client::new();

    let status = client
        .get::<()>(&url(&mock_server, "/missing"), None, None)
        .await
        .expect("non-2xx is not an error by default");

    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_status_error_handler() {
    #[derive(Debug, Deserialize)]
    struct ApiError {
        code: String,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"code": "NOT_FOUND"})),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_config(Config::builder().error_handler(StatusErrorHandler).build());
    let mut out = User::default();

    let err = client
        .get(&url(&mock_server, "/missing"), Some(&mut out), None)
        .await
        .expect_err("404 is classified");

    assert!(matches!(err, Error::Http { status: 404, .. }));
    assert_eq!(err.status_code(), 404);
    let api_error: ApiError = err
        .decode_body()
        .expect("body attached")
        .expect("valid json");
    assert_eq!(api_error.code, "NOT_FOUND");
    assert_eq!(out, User::default());
}

#[tokio::test]
async fn test_default_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let default = Client::new();
    let named = Client::with_config(Config::builder().name("my-service/2.0").build());
    let silent = Client::with_config(Config::builder().no_default_user_agent(true).build());
    let named_silent = Client::with_config(
        Config::builder()
            .name("my-service/2.0")
            .no_default_user_agent(true)
            .build(),
    );

    for (client, route) in [
        (&default, "/default"),
        (&named, "/named"),
        (&silent, "/silent"),
        (&named_silent, "/named-silent"),
    ] {
        client
            .get::<()>(&url(&mock_server, route), None, None)
            .await
            .expect("response");
    }

    let requests = mock_server.received_requests().await.expect("recording enabled");
    let user_agent = |route: &str| {
        requests
            .iter()
            .find(|request| request.url.path() == route)
            .expect("request received")
            .headers
            .get("user-agent")
            .map(|value| value.to_str().expect("ascii").to_string())
    };

    assert_eq!(user_agent("/default").as_deref(), Some(DEFAULT_USER_AGENT));
    assert_eq!(user_agent("/named").as_deref(), Some("my-service/2.0"));
    assert_eq!(user_agent("/silent"), None);
    assert_eq!(user_agent("/named-silent").as_deref(), Some("my-service/2.0"));
}

#[tokio::test]
async fn test_caller_user_agent_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("User-Agent", "caller/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let headers = Header::from([("User-Agent".to_string(), "caller/1.0".to_string())]);

    let status = client
        .get::<()>(&url(&mock_server, "/"), None, Some(&headers))
        .await
        .expect("response");

    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_read_timeout_covers_slow_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .mount(&mock_server)
        .await;

    let client = Client::with_config(
        Config::builder()
            .read_timeout(Duration::from_millis(100))
            .build(),
    );

    let err = client
        .get::<()>(&url(&mock_server, "/slow"), None, None)
        .await
        .expect_err("times out");

    assert!(err.is_timeout());
    assert_eq!(err.status_code(), 0);
}

#[tokio::test]
async fn test_write_timeout_ignores_slow_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    let client = Client::with_config(
        Config::builder()
            .write_timeout(Duration::from_millis(50))
            .read_timeout(Duration::from_secs(5))
            .build(),
    );

    let status = client
        .post::<_, ()>(
            &url(&mock_server, "/slow"),
            Some(&serde_json::json!({"payload": "small"})),
            None,
            None,
        )
        .await
        .expect("request was written in time");

    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_connection_refused() {
    let client = Client::new();

    let err = client
        .get::<()>("http://127.0.0.1:1/", None, None)
        .await
        .expect_err("nothing listens on port 1");

    assert!(err.is_connection());
    assert_eq!(err.status_code(), 0);
    assert!(err.to_string().starts_with("send request:"));
}

#[tokio::test]
async fn test_decode_failure_discards_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("something wrong"))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let mut out = User::default();

    let err = client
        .get(&url(&mock_server, "/broken"), Some(&mut out), None)
        .await
        .expect_err("body is not json");

    assert!(err.is_decode());
    assert_eq!(err.status_code(), 0);
}
