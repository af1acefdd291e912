//! Integration tests for middleware over a real HTTP transport.

use std::time::{Duration, Instant};

use courier::middleware::{ApiKeyLayer, BasicAuthLayer, LoggingLayer, Middleware};
use courier::{Client, Context, HyperTransport, Stage, TransportConfig};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

/// Test that basic auth middleware sends the encoded credentials.
#[tokio::test]
async fn test_basic_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder(HyperTransport::new())
        .with_basic_auth("user", "pass")
        .build();

    let body = client
        .get(
            &Context::background(),
            &format!("{}/protected", mock_server.uri()),
        )
        .await
        .expect("body");

    assert_eq!(&body[..], b"welcome");
}

/// Test that API key middleware sends a bearer token.
#[tokio::test]
async fn test_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Bearer my-secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder(HyperTransport::new())
        .with_api_key("my-secret-key")
        .build();

    let body = client
        .get(
            &Context::background(),
            &format!("{}/protected", mock_server.uri()),
        )
        .await
        .expect("body");

    assert_eq!(&body[..], b"hello");
}

/// Test that the first-listed auth middleware is the one the server sees.
#[tokio::test]
async fn test_middleware_order_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ordered"))
        .and(header("Authorization", "Bearer listed-first"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let middlewares: Vec<Box<dyn Middleware>> = vec![
        Box::new(ApiKeyLayer::new("listed-first")),
        Box::new(BasicAuthLayer::new("listed", "second")),
        Box::new(LoggingLayer::debug()),
    ];
    let client = Client::new(HyperTransport::new(), middlewares);

    let body = client
        .get(
            &Context::background(),
            &format!("{}/ordered", mock_server.uri()),
        )
        .await
        .expect("body");

    assert_eq!(&body[..], b"ok");
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let client = Client::builder(HyperTransport::new())
        .with_logging()
        .build();

    let body = client
        .get(
            &Context::background(),
            &format!("{}/logged", mock_server.uri()),
        )
        .await
        .expect("body");

    assert_eq!(&body[..], b"down");
}

/// Test that a context deadline aborts a slow server promptly.
#[tokio::test]
async fn test_context_deadline_aborts_slow_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let client = Client::builder(HyperTransport::new()).build();
    let ctx = Context::background().with_timeout(Duration::from_millis(100));

    let start = Instant::now();
    let err = client
        .get(&ctx, &format!("{}/slow", mock_server.uri()))
        .await
        .expect_err("deadline");

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(err.stage(), Some(Stage::Transport));
    assert!(err.is_cancelled());
}

/// Test that the transport timeout surfaces as a request failure.
#[tokio::test]
async fn test_transport_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::with_config(
        TransportConfig::builder()
            .timeout(Duration::from_millis(100))
            .build(),
    );
    let client = Client::builder(transport).build();

    let err = client
        .get(
            &Context::background(),
            &format!("{}/slow", mock_server.uri()),
        )
        .await
        .expect_err("timeout");

    assert!(err.to_string().contains("request failed"));
    assert!(err.is_timeout());
}

/// Test that an unreachable server is reported as a connection failure.
#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let uri = format!("http://{}/", listener.local_addr().expect("addr"));
    drop(listener);

    let client = Client::builder(HyperTransport::new()).build();

    let err = client
        .get(&Context::background(), &uri)
        .await
        .expect_err("connection refused");

    assert_eq!(err.stage(), Some(Stage::Transport));
    assert!(err.is_connection());
}
