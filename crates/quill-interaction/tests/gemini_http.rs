use futures::StreamExt;
use quill_core::error::QuillError;
use quill_core::generation::GenerationChannel;
use quill_interaction::GeminiStreamChannel;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Answers a single connection with `status`, `content_type` and `body`, and
/// hands back the request it received.
async fn serve_once(
    status: u16,
    content_type: &'static str,
    body: String,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1beta/models/", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _ = tx.send(read_request(&mut socket).await);

        let response = format!(
            "HTTP/1.1 {status} Canned\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    (base_url, rx)
}

/// Reads the request head and as much body as `content-length` announces.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let body_len = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= head_end + 4 + body_len {
                return text;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

fn event(text: &str) -> String {
    format!(
        "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":{}}}],\"role\":\"model\"}}}}]}}\r\n\r\n",
        serde_json::to_string(text).unwrap()
    )
}

#[tokio::test]
async fn test_generate_streams_sse_body_as_fragments() {
    let body = format!(
        "{}{}data: {{\"candidates\":[{{\"finishReason\":\"STOP\"}}],\"usageMetadata\":{{}}}}\r\n\r\n",
        event("Καλη"),
        event("μέρα")
    );
    let (base_url, request) = serve_once(200, "text/event-stream", body).await;
    let channel =
        GeminiStreamChannel::new("test-key", "gemini-2.0-flash").with_base_url(base_url);

    let fragments = channel.generate("Write about mornings").await.unwrap();
    let texts: Vec<String> = fragments.map(|item| item.unwrap()).collect().await;
    assert_eq!(texts, vec!["Καλη".to_string(), "μέρα".to_string()]);

    let request = request.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert_eq!(
        request_line,
        "POST /v1beta/models/gemini-2.0-flash:streamGenerateContent?alt=sse&key=test-key HTTP/1.1"
    );
}

#[tokio::test]
async fn test_generate_maps_error_status_before_streaming() {
    let body =
        r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#
            .to_string();
    let (base_url, _request) = serve_once(400, "application/json", body).await;
    let channel =
        GeminiStreamChannel::new("bad-key", "gemini-2.0-flash").with_base_url(base_url);

    let err = match channel.generate("Write about mornings").await {
        Err(err) => err,
        Ok(_) => panic!("a 400 response must not open a stream"),
    };
    assert_eq!(
        err,
        QuillError::generation("Gemini API returned 400: INVALID_ARGUMENT: API key not valid")
    );
}
