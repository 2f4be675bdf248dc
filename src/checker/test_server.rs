// src/checker/test_server.rs
// =============================================================================
// A tiny HTTP server for tests.
//
// An axum router whose fallback answers every request with an empty body and
// a status chosen by a closure, and records what it saw so tests can count
// requests. Binding to 127.0.0.1:0 lets the OS pick a free port, so tests can
// run in parallel.
// =============================================================================

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Respond = dyn Fn(&str, &str) -> u16 + Send + Sync;
type Delay = dyn Fn(&str) -> Duration + Send + Sync;

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    user_agent: String,
}

struct Shared {
    respond: Box<Respond>,
    delay: Box<Delay>,
    requests: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

pub struct TestServer {
    addr: SocketAddr,
    pub requests: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl TestServer {
    /// Starts serving; `respond(method, path)` picks the status code.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str, &str) -> u16 + Send + Sync + 'static,
    {
        Self::start_with_delay(respond, |_| Duration::ZERO).await
    }

    /// Like `start`, but holds each response back for `delay(path)`.
    pub async fn start_with_delay<F, D>(respond: F, delay: D) -> Self
    where
        F: Fn(&str, &str) -> u16 + Send + Sync + 'static,
        D: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let shared = Arc::new(Shared {
            respond: Box::new(respond),
            delay: Box::new(delay),
            requests: requests.clone(),
            seen: seen.clone(),
        });
        let app = Router::new().fallback(record).with_state(shared);

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            seen,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn methods(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|s| s.method.clone()).collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|s| s.path.clone()).collect()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|s| s.user_agent.clone()).collect()
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> StatusCode {
    let path = uri.path().to_string();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let code = (shared.respond)(method.as_str(), &path);
    let delay = (shared.delay)(&path);
    shared.requests.fetch_add(1, Ordering::SeqCst);
    shared.seen.lock().unwrap().push(Seen {
        method: method.to_string(),
        path,
        user_agent,
    });

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
