// src/checker/batch.rs
// =============================================================================
// This module drives the batched HTTP sweep over a list of URLs.
//
// How it works:
// 1. Partition the URL list into consecutive chunks of batch_size
// 2. Within a chunk, issue every request concurrently
// 3. Wait for ALL of them to settle (success, failure, or timeout) before
//    the next chunk starts -- a fan-out/fan-in barrier per chunk
// 4. Return exactly one FetchOutcome per input URL, in input order
//
// Partial-failure tolerance is the central property: one dead URL must
// never hide the status of the other nineteen. A timeout or transport
// error becomes an outcome with `error` set; it aborts nothing.
//
// Why batches instead of one big concurrent wave? Bounds outbound request
// pressure against the target server and avoids false failures from local
// connection-pool exhaustion. This runs as a periodic health check, so
// predictable load matters more than wall-clock time.
// =============================================================================

use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;

// The result of one HTTP check
//
// Exactly one of these exists per checked URL. `status` is absent on
// transport failure, `body` is absent when the body could not be read,
// `error` holds a human-readable description when the request never
// produced a response.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL that was checked
    pub url: String,
    /// HTTP status code, absent on network error
    pub status: Option<u16>,
    /// Response body text, absent when unreadable
    pub body: Option<String>,
    /// Transport-level failure description, absent on any HTTP response
    pub error: Option<String>,
}

impl FetchOutcome {
    fn failed(url: String, error: String) -> Self {
        FetchOutcome {
            url,
            status: None,
            body: None,
            error: Some(error),
        }
    }
}

// Sweeps a list of URLs in sequential batches of concurrent requests
//
// Guarantees:
// - output.len() == urls.len()
// - output[i].url == urls[i] for every i
// - batch N+1 does not start until every request of batch N has settled
//
// batch_size must be >= 1 (validated by the config layer).
pub async fn run_batched(
    client: &Client,
    urls: Vec<String>,
    batch_size: usize,
    per_request_timeout: Duration,
) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::with_capacity(urls.len());

    for chunk in urls.chunks(batch_size.max(1)) {
        // Fan out: one future per URL in the chunk.
        // fetch_one never fails as a future, so join_all is our
        // settle-all barrier and preserves chunk order.
        let requests = chunk
            .iter()
            .map(|url| fetch_one(client, url.clone(), per_request_timeout));

        outcomes.extend(join_all(requests).await);
    }

    outcomes
}

// Performs one HTTP GET and converts every possible ending into an outcome
//
// The body is read whenever a response arrives, even for error statuses:
// the classifier wants to report a noindex directive alongside a bad
// status on a must-be-indexable page.
async fn fetch_one(client: &Client, url: String, timeout: Duration) -> FetchOutcome {
    let request = client.get(&url).send();

    let response = match tokio::time::timeout(timeout, request).await {
        Err(_) => {
            return FetchOutcome::failed(url, format!("timed out after {:?}", timeout));
        }
        Ok(Err(e)) => {
            let description = describe_transport_error(&e);
            return FetchOutcome::failed(url, description);
        }
        Ok(Ok(response)) => response,
    };

    let status = response.status().as_u16();

    // Reading the body counts against the same per-request budget
    let body = match tokio::time::timeout(timeout, response.text()).await {
        Ok(Ok(text)) => Some(text),
        _ => None,
    };

    FetchOutcome {
        url,
        status: Some(status),
        body,
        error: None,
    }
}

// Turns a reqwest error into a short human-readable description
//
// reqwest errors can happen for many reasons: timeout, DNS failure,
// refused connection, TLS problems. The description ends up verbatim in
// the violation detail, so it should be actionable on its own.
fn describe_transport_error(error: &reqwest::Error) -> String {
    let error_string = error.to_string();

    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "could not resolve hostname".to_string()
        } else {
            "connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "TLS certificate error".to_string()
    } else {
        error_string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Serves canned (path, status, body) responses on the given listener.
    // A request for "/hang" sleeps past any test timeout and never answers,
    // which is how we simulate a request that never resolves.
    fn serve(listener: TcpListener, routes: Vec<(String, u16, String)>) {
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let path = request
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or("/")
                        .to_string();

                    if path == "/hang" {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        return;
                    }

                    let (status, body) = routes
                        .iter()
                        .find(|(p, _, _)| *p == path)
                        .map(|(_, s, b)| (*s, b.clone()))
                        .unwrap_or((404, String::new()));

                    let response = format!(
                        "HTTP/1.1 {} X\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
    }

    async fn start_server(routes: Vec<(&str, u16, &str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let routes = routes
            .into_iter()
            .map(|(p, s, b)| (p.to_string(), s, b.to_string()))
            .collect();
        serve(listener, routes);
        origin
    }

    #[tokio::test]
    async fn test_output_matches_input_order_and_length() {
        let origin = start_server(vec![
            ("/a/", 200, "a"),
            ("/b/", 404, ""),
            ("/c/", 200, "c"),
        ])
        .await;

        let urls = vec![
            format!("{}/a/", origin),
            format!("{}/b/", origin),
            format!("{}/c/", origin),
        ];

        // Batch sizes below, at, and above the input length all preserve order
        for batch_size in [1, 2, 3, 10] {
            let outcomes = run_batched(
                &Client::new(),
                urls.clone(),
                batch_size,
                Duration::from_secs(5),
            )
            .await;

            assert_eq!(outcomes.len(), urls.len());
            for (outcome, url) in outcomes.iter().zip(&urls) {
                assert_eq!(&outcome.url, url);
            }
            assert_eq!(outcomes[0].status, Some(200));
            assert_eq!(outcomes[1].status, Some(404));
            assert_eq!(outcomes[2].status, Some(200));
        }
    }

    #[tokio::test]
    async fn test_hanging_request_does_not_affect_batch_mates() {
        let origin = start_server(vec![
            ("/1/", 200, "one"),
            ("/2/", 200, "two"),
            ("/4/", 200, "four"),
            ("/5/", 500, ""),
        ])
        .await;

        // Request #3 never resolves within the timeout
        let urls = vec![
            format!("{}/1/", origin),
            format!("{}/2/", origin),
            format!("{}/hang", origin),
            format!("{}/4/", origin),
            format!("{}/5/", origin),
        ];

        let outcomes = run_batched(
            &Client::new(),
            urls.clone(),
            5,
            Duration::from_millis(500),
        )
        .await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes[0].status, Some(200));
        assert_eq!(outcomes[1].status, Some(200));
        assert_eq!(outcomes[3].status, Some(200));
        assert_eq!(outcomes[4].status, Some(500));

        // The hung request settles as an error outcome, nothing more
        assert!(outcomes[2].status.is_none());
        assert!(outcomes[2].error.is_some());
        assert_eq!(outcomes[2].url, urls[2]);
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_error_outcome() {
        // Bind-then-drop gives us a port with nothing listening on it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let outcomes = run_batched(
            &Client::new(),
            vec![format!("{}/", origin)],
            10,
            Duration::from_secs(2),
        )
        .await;

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].status.is_none());
        assert!(outcomes[0].error.is_some());
    }

    #[tokio::test]
    async fn test_body_is_read_even_for_error_status() {
        let origin =
            start_server(vec![("/gone/", 404, "<html>not here</html>")]).await;

        let outcomes = run_batched(
            &Client::new(),
            vec![format!("{}/gone/", origin)],
            10,
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcomes[0].status, Some(404));
        assert_eq!(outcomes[0].body.as_deref(), Some("<html>not here</html>"));
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let outcomes =
            run_batched(&Client::new(), Vec::new(), 10, Duration::from_secs(1)).await;
        assert!(outcomes.is_empty());
    }
}
