//! Drives `FlowiseProvider` against a one-shot local HTTP server.

use std::net::SocketAddr;

use chatflow_flowise_model::{FlowiseConfigBuilder, FlowiseProvider};
use chatflow_model::{
    ErrorKind, PredictionProvider, PredictionProviderError, PredictionRequest,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct CannedResponse {
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
}

/// Serves exactly one request with `resp` and yields the raw request text.
async fn serve_once(resp: CannedResponse) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let raw_request = read_request(&mut stream).await;
        let payload = format!(
            "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            resp.status,
            resp.content_type,
            resp.body.len(),
            resp.body
        );
        stream.write_all(payload.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        raw_request
    });
    (addr, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8(buf).unwrap()
}

fn provider_for(addr: SocketAddr) -> FlowiseProvider {
    let config = FlowiseConfigBuilder::with_flow_id("flow-123")
        .with_base_url(format!("http://{addr}/"))
        .build();
    FlowiseProvider::new(config)
}

fn request_body(raw_request: &str) -> serde_json::Value {
    let (_, body) = raw_request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_successful_prediction() {
    let (addr, server) = serve_once(CannedResponse {
        status: "200 OK",
        content_type: "application/json; charset=utf-8",
        body: r#"{"text":"Hi there","chatId":"chat-1"}"#,
    })
    .await;

    let resp = provider_for(addr)
        .predict(&PredictionRequest::new("Hello", "chat-1"))
        .await
        .unwrap();
    assert_eq!(resp.text, "Hi there");

    let raw_request = server.await.unwrap();
    let lowercase = raw_request.to_ascii_lowercase();
    assert!(raw_request.starts_with("POST /api/v1/prediction/flow-123 HTTP/1.1"));
    assert!(lowercase.contains("content-type: application/json"));
    assert!(!lowercase.contains("authorization:"));
    assert_eq!(
        request_body(&raw_request),
        serde_json::json!({ "question": "Hello", "chatId": "chat-1" })
    );
}

#[tokio::test]
async fn test_api_key_is_sent() {
    let (addr, server) = serve_once(CannedResponse {
        status: "200 OK",
        content_type: "application/json",
        body: r#"{"text":"ok"}"#,
    })
    .await;

    let config = FlowiseConfigBuilder::with_flow_id("flow-123")
        .with_base_url(format!("http://{addr}"))
        .with_api_key("secret")
        .build();
    FlowiseProvider::new(config)
        .predict(&PredictionRequest::new("Hello", "chat-1"))
        .await
        .unwrap();

    let raw_request = server.await.unwrap().to_ascii_lowercase();
    assert!(raw_request.contains("authorization: bearer secret"));
}

#[tokio::test]
async fn test_error_status_is_transport_failure() {
    let (addr, server) = serve_once(CannedResponse {
        status: "500 Internal Server Error",
        content_type: "application/json",
        body: r#"{"text":"should not be used"}"#,
    })
    .await;

    let err = provider_for(addr)
        .predict(&PredictionRequest::new("Ping", "chat-1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.message().contains("500"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_answer_is_protocol_failure() {
    let (addr, server) = serve_once(CannedResponse {
        status: "200 OK",
        content_type: "application/json",
        body: r#"{"json":{"answer":"Hi"}}"#,
    })
    .await;

    let err = provider_for(addr)
        .predict(&PredictionRequest::new("Ping", "chat-1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    server.await.unwrap();
}

#[tokio::test]
async fn test_html_body_is_protocol_failure() {
    let (addr, server) = serve_once(CannedResponse {
        status: "200 OK",
        content_type: "text/html",
        body: "<html>maintenance</html>",
    })
    .await;

    let err = provider_for(addr)
        .predict(&PredictionRequest::new("Ping", "chat-1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = provider_for(addr)
        .predict(&PredictionRequest::new("Ping", "chat-1"))
        .await
        .unwrap_err();
    assert!(err.kind().is_transport());
}
