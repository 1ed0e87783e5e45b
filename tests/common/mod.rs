//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use basket_client::auth::{AuthEvents, CredentialStore, MemoryStore};
use basket_client::http::{
    PipelineConfig, RequestPipeline, Transport, TransportError, TransportRequest,
    TransportResponse,
};
use basket_client::resilience::RetryPolicy;
use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: body.to_string(),
        }
    }
}

fn status_line(status: u16) -> String {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    format!("{} {}", status, reason)
}

/// Read one request (head plus Content-Length body) and return its head, lowercased.
async fn read_request(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body_read = buf.len() - head_end;
    while body_read < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body_read += n;
    }
    Some(head)
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the zero-based call index. Every request head is recorded.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let calls = Arc::new(AtomicU32::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_task = seen.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let calls = calls.clone();
                    let seen = seen_task.clone();
                    tokio::spawn(async move {
                        let Some(head) = read_request(&mut socket).await else {
                            return;
                        };
                        seen.lock().unwrap().push(head);
                        let index = calls.fetch_add(1, Ordering::SeqCst);
                        let response = f(index).await;

                        let mut raw = format!("HTTP/1.1 {}\r\n", status_line(response.status));
                        if let Some(ct) = response.content_type {
                            raw.push_str(&format!("Content-Type: {}\r\n", ct));
                        }
                        raw.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.body.len(),
                            response.body
                        ));
                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

/// Start a backend that accepts connections and never answers.
///
/// The flag flips once the client closes its side of the socket.
pub async fn start_hanging_backend() -> (SocketAddr, Arc<AtomicBool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let closed = Arc::new(AtomicBool::new(false));
    let closed_task = closed.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let closed = closed_task.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => {
                            closed.store(true, Ordering::SeqCst);
                            break;
                        }
                        Ok(_) => continue,
                    }
                }
            });
        }
    });

    (addr, closed)
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// What the scripted transport does for one attempt.
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(MockResponse),
    NetworkError,
    Hang,
}

/// In-memory transport replaying a script; the last step repeats forever.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    pub requests: Mutex<Vec<TransportRequest>>,
    /// Virtual time at which each attempt started.
    pub started_at: Mutex<Vec<tokio::time::Instant>>,
    /// Number of hung attempts whose future has been dropped.
    pub abandoned: Arc<AtomicU32>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            started_at: Mutex::new(Vec::new()),
            abandoned: Arc::new(AtomicU32::new(0)),
        })
    }

    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Gaps between consecutive attempt start times.
    pub fn gaps(&self) -> Vec<Duration> {
        let started = self.started_at.lock().unwrap();
        started.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn next_step(&self) -> Scripted {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match script.pop_front() {
            Some(step) => {
                *last = Some(step.clone());
                step
            }
            None => last.clone().unwrap_or(Scripted::NetworkError),
        }
    }
}

struct AbandonGuard(Arc<AtomicU32>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportResponse, TransportError>> {
        self.requests.lock().unwrap().push(request);
        self.started_at.lock().unwrap().push(tokio::time::Instant::now());
        let step = self.next_step();
        let abandoned = self.abandoned.clone();

        Box::pin(async move {
            match step {
                Scripted::Respond(response) => {
                    let mut headers = HeaderMap::new();
                    if let Some(ct) = response.content_type {
                        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
                    }
                    Ok(TransportResponse {
                        status: StatusCode::from_u16(response.status).unwrap(),
                        headers,
                        body: response.body.into_bytes(),
                    })
                }
                Scripted::NetworkError => Err(TransportError::Network("connection refused".into())),
                Scripted::Hang => {
                    let _guard = AbandonGuard(abandoned);
                    std::future::pending().await
                }
            }
        })
    }
}

/// Pipeline settings with the production defaults and a custom base URL.
pub fn config(base_url: &str) -> PipelineConfig {
    PipelineConfig {
        base_url: base_url.to_string(),
        ..PipelineConfig::default()
    }
}

/// Pipeline settings with fast retries for real-socket tests.
pub fn fast_config(base_url: &str, retries: u32) -> PipelineConfig {
    PipelineConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        retry: RetryPolicy::new(retries, Duration::from_millis(10)),
    }
}

/// Build a pipeline around any transport, returning its event channel for inspection.
pub fn pipeline_with(
    config: PipelineConfig,
    transport: Arc<dyn Transport>,
    store: Arc<MemoryStore>,
) -> (Arc<RequestPipeline>, AuthEvents) {
    let events = AuthEvents::new();
    let store: Arc<dyn CredentialStore> = store;
    let pipeline = RequestPipeline::new(config, transport, store, events.clone());
    (Arc::new(pipeline), events)
}

/// Build a pipeline over the real reqwest transport.
pub fn reqwest_pipeline(
    config: PipelineConfig,
    store: Arc<MemoryStore>,
) -> (Arc<RequestPipeline>, AuthEvents) {
    let events = AuthEvents::new();
    let store: Arc<dyn CredentialStore> = store;
    let pipeline = RequestPipeline::with_reqwest(config, store, events.clone()).unwrap();
    (Arc::new(pipeline), events)
}
