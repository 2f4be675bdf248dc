// src/checker/http.rs
// =============================================================================
// This module checks if a remote URL is alive.
//
// Strategy:
// - Send a HEAD request first (lightweight, no body download)
// - Some servers refuse HEAD (400/403/405/501); for those, retry ONCE with GET
// - Any 2xx or 3xx answer is a pass, anything else is a failure
// - Network errors (DNS, refused connection, timeout, TLS) are failures too
//
// Every request carries a User-Agent because some servers reject anonymous
// clients with 403.
// =============================================================================

use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::RemoteFailure;

/// Status codes that mean "this server doesn't like HEAD", so we try GET.
const HEAD_REJECTED: &[StatusCode] = &[
    StatusCode::BAD_REQUEST,
    StatusCode::FORBIDDEN,
    StatusCode::METHOD_NOT_ALLOWED,
    StatusCode::NOT_IMPLEMENTED,
];

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: usize = 10;

/// Checks remote URLs with a shared, connection-pooling HTTP client.
#[derive(Debug, Clone)]
pub struct RemoteChecker {
    client: Client,
}

impl RemoteChecker {
    /// Builds a checker whose requests each time out after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Self::builder(timeout).build().map(Self::from_client)
    }

    /// The client configuration used by `new`, for callers that need to
    /// tweak it further (tests disable proxies, for example).
    pub fn builder(timeout: Duration) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Checks one URL. None means the link is fine.
    ///
    /// At most two requests are made: HEAD, and GET if HEAD was rejected.
    pub async fn check(&self, url: &str) -> Option<RemoteFailure> {
        let status = match self.request(Method::HEAD, url).await {
            Ok(status) if HEAD_REJECTED.contains(&status) => {
                debug!(url, status = status.as_u16(), "HEAD rejected, retrying with GET");
                match self.request(Method::GET, url).await {
                    Ok(status) => status,
                    Err(e) => return Some(describe_error(&e)),
                }
            }
            Ok(status) => status,
            Err(e) => return Some(describe_error(&e)),
        };

        evaluate_status(status)
    }

    async fn request(&self, method: Method, url: &str) -> reqwest::Result<StatusCode> {
        let response = self.client.request(method, url).send().await?;
        Ok(response.status())
    }
}

// 200-399 passes; everything else is reported with its canonical phrase
fn evaluate_status(status: StatusCode) -> Option<RemoteFailure> {
    if (200..400).contains(&status.as_u16()) {
        return None;
    }
    Some(RemoteFailure::Status {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

// Turns a reqwest error into a short, readable description
fn describe_error(error: &reqwest::Error) -> RemoteFailure {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_builder() {
        format!("invalid URL ({error})")
    } else if error.is_connect() {
        format!("connection failed ({})", root_cause(error))
    } else {
        root_cause(error)
    };
    RemoteFailure::Network(message)
}

// reqwest's own Display is generic ("error sending request for url ...");
// the innermost source says what actually went wrong.
fn root_cause(error: &reqwest::Error) -> String {
    let mut cause: &dyn std::error::Error = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::dispatch::{check_remote_links, RemoteLinks, RemoteOccurrence};
    use crate::checker::test_server::TestServer;
    use crate::error::FailureReason;
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;

    fn checker() -> RemoteChecker {
        let client = RemoteChecker::builder(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        RemoteChecker::from_client(client)
    }

    #[test]
    fn test_evaluate_status() {
        assert_eq!(evaluate_status(StatusCode::OK), None);
        assert_eq!(evaluate_status(StatusCode::MOVED_PERMANENTLY), None);
        assert_eq!(
            evaluate_status(StatusCode::NOT_FOUND),
            Some(RemoteFailure::Status {
                code: 404,
                reason: "Not Found".to_string(),
            })
        );
        assert!(evaluate_status(StatusCode::INTERNAL_SERVER_ERROR).is_some());
    }

    #[tokio::test]
    async fn test_ok_url_passes_with_single_head() {
        let server = TestServer::start(|_, _| 200).await;
        assert_eq!(checker().check(&server.url("/ok")).await, None);
        assert_eq!(server.requests.load(Ordering::SeqCst), 1);
        assert_eq!(server.methods(), vec!["HEAD"]);
    }

    #[tokio::test]
    async fn test_not_found_is_reported_without_fallback() {
        let server = TestServer::start(|_, _| 404).await;
        let failure = checker().check(&server.url("/404")).await.unwrap();
        assert_eq!(failure.to_string(), "HTTP 404: Not Found");
        assert_eq!(server.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_head_falls_back_to_get() {
        let server = TestServer::start(|method, _| if method == "HEAD" { 405 } else { 200 }).await;
        assert_eq!(checker().check(&server.url("/page")).await, None);
        assert_eq!(server.methods(), vec!["HEAD", "GET"]);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_reported() {
        let server = TestServer::start(|method, _| if method == "HEAD" { 403 } else { 500 }).await;
        let failure = checker().check(&server.url("/page")).await.unwrap();
        assert_eq!(failure.to_string(), "HTTP 500: Internal Server Error");
        assert_eq!(server.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        let server = TestServer::start(|_, _| 200).await;
        checker().check(&server.url("/")).await;
        let agents = server.user_agents();
        assert_eq!(agents, vec![USER_AGENT.to_string()]);
    }

    #[tokio::test]
    async fn test_slow_url_times_out_without_failing_fast_one() {
        let server = TestServer::start_with_delay(
            |_, _| 200,
            |path| {
                if path == "/slow" {
                    Duration::from_millis(500)
                } else {
                    Duration::ZERO
                }
            },
        )
        .await;
        let client = RemoteChecker::builder(Duration::from_millis(100))
            .no_proxy()
            .build()
            .unwrap();
        let checker = RemoteChecker::from_client(client);

        let mut links = RemoteLinks::new();
        for (path, line) in [("/slow", 1), ("/fast", 2)] {
            links.entry(server.url(path)).or_default().push(RemoteOccurrence {
                document: PathBuf::from("a.md"),
                raw: server.url(path),
                line,
            });
        }

        let checker = &checker;
        let failures =
            check_remote_links(&links, 2, move |url| async move { checker.check(&url).await }).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].link, server.url("/slow"));
        assert_eq!(failures[0].line, Some(1));
        assert_eq!(
            failures[0].reason,
            FailureReason::Remote(RemoteFailure::Network("request timed out".to_string()))
        );
        let mut paths = server.paths();
        paths.sort();
        assert_eq!(paths, vec!["/fast", "/slow"]);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind and drop a listener to get a port nobody is listening on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let failure = checker()
            .check(&format!("http://127.0.0.1:{port}/"))
            .await
            .unwrap();
        assert!(matches!(failure, RemoteFailure::Network(_)));
        assert!(failure.to_string().starts_with("network error: "));
    }
}
