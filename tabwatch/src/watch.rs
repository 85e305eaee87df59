//! Reload watcher: the long-poll client.

use log::error;
use url::Url;

use crate::error::AppError;

/// Outcome of one long-poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The server signalled a change: reload the document.
    Reload,
    /// The poll failed; watching stops until the next reload.
    Stopped,
}

/// The watch endpoint under `base`.
pub fn watch_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_path("/watch");
    url
}

/// The raw-document endpoint under `base`.
pub fn csv_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_path("/csv");
    url
}

/// Issue one long-lived request against the watch endpoint and wait it
/// out.
///
/// Success means the document changed and the caller should reload. Any
/// failure is logged and terminal for this watcher instance: no retry,
/// no timeout of our own.
pub async fn watch_once(client: &reqwest::Client, url: Url) -> WatchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            error!("Long-poll failed: {e}");
            return WatchOutcome::Stopped;
        }
    };

    let status = response.status();
    if status.is_success() {
        return WatchOutcome::Reload;
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<failed to read body>"));
    error!("Long-poll failed: HTTP {}: {}", status.as_u16(), body);
    WatchOutcome::Stopped
}

/// Fetch the raw document bytes from a serving instance.
pub async fn fetch_document(client: &reqwest::Client, base: &Url) -> Result<Vec<u8>, AppError> {
    let response = client.get(csv_url(base)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::FetchStatus(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Response, StatusCode};
    use hyper_util::rt::TokioIo;
    use tokio::net::TcpListener;

    /// Serve one connection, answering every request with `status`/`body`.
    async fn stub_server(status: StatusCode, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let io = TokioIo::new(stream);
            let service = service_fn(move |_req| async move {
                Ok::<_, Infallible>(
                    Response::builder()
                        .status(status)
                        .body(Full::new(Bytes::from(body)))
                        .unwrap(),
                )
            });
            let _ = http1::Builder::new().serve_connection(io, service).await;
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let base = Url::parse("http://localhost:8080").unwrap();
        assert_eq!(watch_url(&base).as_str(), "http://localhost:8080/watch");
        assert_eq!(csv_url(&base).as_str(), "http://localhost:8080/csv");
    }

    #[tokio::test]
    async fn test_success_response_signals_reload() {
        let base = stub_server(StatusCode::OK, "OK").await;
        let client = reqwest::Client::new();
        assert_eq!(
            watch_once(&client, watch_url(&base)).await,
            WatchOutcome::Reload
        );
    }

    #[tokio::test]
    async fn test_failure_response_stops_watching() {
        let base = stub_server(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let client = reqwest::Client::new();
        assert_eq!(
            watch_once(&client, watch_url(&base)).await,
            WatchOutcome::Stopped
        );
    }

    #[tokio::test]
    async fn test_connection_failure_stops_watching() {
        // Bind then drop to find a port with nothing behind it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}")).unwrap();
        let client = reqwest::Client::new();
        assert_eq!(
            watch_once(&client, watch_url(&base)).await,
            WatchOutcome::Stopped
        );
    }

    #[tokio::test]
    async fn test_fetch_document_returns_bytes() {
        let base = stub_server(StatusCode::OK, "a,b\n1,2\n").await;
        let client = reqwest::Client::new();
        let bytes = fetch_document(&client, &base).await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_fetch_document_propagates_status() {
        let base = stub_server(StatusCode::NOT_FOUND, "nope").await;
        let client = reqwest::Client::new();
        assert!(matches!(
            fetch_document(&client, &base).await,
            Err(AppError::FetchStatus(404))
        ));
    }
}
