//! Tests for `ProxyFetcher` against a local fake relay: status and content
//! type checks, timeouts, the body cap and the relay query that is sent.

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use linkshelf::services::favicon::FaviconFallback;
use linkshelf::services::metadata_resolver::{
    MetadataResolver, MetadataResolverTrait, PageFetcher, ProxyFetcher,
};
use linkshelf::types::errors::FetchError;
use linkshelf::types::settings::ResolverSettings;

const MIB: usize = 1024 * 1024;

/// What the fake relay writes back after reading the request head.
struct Reply {
    head: String,
    body: Vec<u8>,
    /// Keep the connection open without finishing the body.
    stall: bool,
}

impl Reply {
    fn html(body: &str) -> Self {
        Self {
            head: format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\n\r\n",
                body.len()
            ),
            body: body.as_bytes().to_vec(),
            stall: false,
        }
    }
}

/// Serves one connection and reports the request line it received.
async fn fake_relay(reply: Reply) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request_line = String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        let _ = tx.send(request_line);

        let _ = socket.write_all(reply.head.as_bytes()).await;
        let _ = socket.write_all(&reply.body).await;
        if reply.stall {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });

    (format!("http://{}/raw?url=", addr), rx)
}

fn settings(proxy_url: String, timeout_secs: u64, max_body_bytes: usize) -> ResolverSettings {
    ResolverSettings {
        proxy_url,
        timeout_secs,
        max_body_bytes,
        ..ResolverSettings::default()
    }
}

#[tokio::test]
async fn test_relay_receives_encoded_target() {
    let (proxy, request_line) = fake_relay(Reply::html("<title>Ok</title>")).await;
    let fetcher = ProxyFetcher::new(&settings(proxy, 5, MIB)).unwrap();

    let body = fetcher.fetch("https://example.com/a?b=c").await.unwrap();
    assert_eq!(body, "<title>Ok</title>");
    assert_eq!(
        request_line.await.unwrap(),
        "GET /raw?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc HTTP/1.1"
    );
}

#[tokio::test]
async fn test_not_found_is_http_status() {
    let (proxy, _) = fake_relay(Reply {
        head: "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_string(),
        body: Vec::new(),
        stall: false,
    })
    .await;
    let fetcher = ProxyFetcher::new(&settings(proxy, 5, MIB)).unwrap();

    let result = fetcher.fetch("https://missing.example").await;
    assert!(matches!(result, Err(FetchError::HttpStatus(404))), "{:?}", result);
}

#[tokio::test]
async fn test_image_is_not_html() {
    let (proxy, _) = fake_relay(Reply {
        head: "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 4\r\n\r\n".to_string(),
        body: b"\x89PNG".to_vec(),
        stall: false,
    })
    .await;
    let fetcher = ProxyFetcher::new(&settings(proxy, 5, MIB)).unwrap();

    let result = fetcher.fetch("https://example.com/logo.png").await;
    assert!(
        matches!(result, Err(FetchError::NotHtml(ref ct)) if ct == "image/png"),
        "{:?}",
        result
    );
}

#[tokio::test]
async fn test_stalled_body_below_cap_times_out() {
    let (proxy, _) = fake_relay(Reply {
        head: "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 5000\r\n\r\n".to_string(),
        body: b"<title>Slow</title>".to_vec(),
        stall: true,
    })
    .await;
    let fetcher = ProxyFetcher::new(&settings(proxy, 1, MIB)).unwrap();

    let result = fetcher.fetch("https://slow.example").await;
    assert!(
        matches!(result, Err(FetchError::Timeout(ref url)) if url == "https://slow.example"),
        "{:?}",
        result
    );
}

fn oversized_reply() -> Reply {
    let mut body = b"<html><head><title>Big Page</title></head><body>".to_vec();
    body.extend(std::iter::repeat(b'x').take(2 * MIB));
    Reply {
        head: format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n",
            3 * MIB
        ),
        body,
        stall: true,
    }
}

#[tokio::test]
async fn test_oversized_body_stops_at_cap() {
    let (proxy, _) = fake_relay(oversized_reply()).await;
    let fetcher = ProxyFetcher::new(&settings(proxy, 5, MIB)).unwrap();

    let started = Instant::now();
    let body = fetcher.fetch("https://big.example").await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(body.len(), MIB);
    assert!(body.contains("<title>Big Page</title>"));
}

#[tokio::test]
async fn test_resolver_reads_title_from_capped_body() {
    let (proxy, _) = fake_relay(oversized_reply()).await;
    let resolver = MetadataResolver::from_settings(&settings(proxy, 5, MIB)).unwrap();

    let meta = resolver.resolve("https://big.example").await;
    assert_eq!(meta.title, "Big Page");
    assert_eq!(meta.favicon, FaviconFallback::default().for_host("big.example"));
}
