//! Serve mode: the rendered page, the raw input, and the change
//! long-poll endpoint.

use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, info};
use tokio::net::TcpListener;

use crate::error::AppError;
use crate::html::{self, RenderOptions};
use crate::load::{self, LoadOptions};

/// How often the long-poll checks the input file's metadata.
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Everything the server needs to answer requests.
pub struct ServeConfig {
    pub addr: String,
    pub input: Option<PathBuf>,
    /// One-shot snapshot of stdin, taken at startup when no input file
    /// was given.
    pub stdin: Option<Vec<u8>>,
    pub load: LoadOptions,
    pub detect_links: bool,
    /// Whether `/watch` is served. Requires an input file.
    pub watch: bool,
}

/// Bind the address and serve until the process ends.
pub async fn serve(config: ServeConfig) -> Result<(), AppError> {
    let listener = TcpListener::bind(&config.addr).await.map_err(|e| AppError::Serve {
        addr: config.addr.clone(),
        source: e,
    })?;

    if config.watch {
        if let Some(input) = &config.input {
            info!("Watching {} for changes", input.display());
        }
    }
    info!("Serving on {}", config.addr);

    let config = Arc::new(config);
    loop {
        let (stream, peer) = listener.accept().await.map_err(|e| AppError::Serve {
            addr: config.addr.clone(),
            source: e,
        })?;
        debug!("accepted connection from {peer}");

        let config = Arc::clone(&config);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req: Request<Incoming>| {
                let config = Arc::clone(&config);
                async move { Ok::<_, Infallible>(handle(req, &config).await) }
            });
            // Long-polls hold connections open for a while; an error here
            // is usually just the client going away.
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("connection closed: {e}");
            }
        });
    }
}

async fn handle(req: Request<Incoming>, config: &ServeConfig) -> Response<Full<Bytes>> {
    match req.uri().path() {
        "/" => page(config),
        "/csv" => raw(config),
        "/watch" => match (&config.input, config.watch) {
            (Some(input), true) => watch_input(input).await,
            _ => text(StatusCode::NOT_FOUND, "not found"),
        },
        _ => text(StatusCode::NOT_FOUND, "not found"),
    }
}

fn page(config: &ServeConfig) -> Response<Full<Bytes>> {
    match render(config) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(e) => text(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("render page: {e}"),
        ),
    }
}

/// Render the page from the current input. The file is re-read per
/// request, so a reload after a change picks up fresh content.
fn render(config: &ServeConfig) -> Result<String, AppError> {
    let bytes = input_bytes(config)?;
    let mut table = load::from_bytes(&bytes, config.load)?;
    let options = RenderOptions {
        detect_links: config.detect_links,
        title: html::title_for(config.input.as_deref()),
    };
    Ok(html::render_page(&mut table, &options))
}

fn raw(config: &ServeConfig) -> Response<Full<Bytes>> {
    match input_bytes(config) {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/csv; charset=utf-8")
            .body(Full::new(Bytes::from(bytes)))
            .unwrap(),
        Err(e) => text(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("read input: {e}"),
        ),
    }
}

fn text(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap()
}

fn input_bytes(config: &ServeConfig) -> Result<Vec<u8>, AppError> {
    match (&config.input, &config.stdin) {
        (Some(path), _) => Ok(fs::read(path)?),
        (None, Some(snapshot)) => Ok(snapshot.clone()),
        (None, None) => Ok(Vec::new()),
    }
}

async fn watch_input(input: &Path) -> Response<Full<Bytes>> {
    match wait_for_change(input, WATCH_POLL_INTERVAL).await {
        Ok(()) => text(StatusCode::OK, "OK"),
        Err(e) => text(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("watch input: {e}"),
        ),
    }
}

/// Resolve once the file at `path` changes in a way worth reporting.
///
/// A missing file is being replaced, and an empty file was just
/// truncated and is being rewritten; both keep the poll alive.
async fn wait_for_change(path: &Path, poll: Duration) -> io::Result<()> {
    let initial = fingerprint(path)?;
    let mut interval = tokio::time::interval(poll);
    interval.tick().await;
    loop {
        interval.tick().await;
        let current = match fingerprint(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        if current.size == 0 {
            continue;
        }
        if current != initial {
            info!("File changed ({} bytes)", current.size);
            return Ok(());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    size: u64,
}

fn fingerprint(path: &Path) -> io::Result<Fingerprint> {
    let meta = fs::metadata(path)?;
    Ok(Fingerprint {
        modified: meta.modified()?,
        size: meta.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_POLL: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn test_wait_resolves_when_the_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let waiter = {
            let path = path.clone();
            tokio::spawn(async move { wait_for_change(&path, FAST_POLL).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();

        tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("change not detected")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_ignores_truncation_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b\n").unwrap();

        let waiter = {
            let path = path.clone();
            tokio::spawn(async move { wait_for_change(&path, FAST_POLL).await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        fs::write(&path, "").unwrap();

        // Truncation alone must not resolve the poll.
        let timed_out = tokio::time::timeout(Duration::from_millis(100), waiter).await;
        assert!(timed_out.is_err());
    }

    #[tokio::test]
    async fn test_wait_fails_fast_when_the_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(wait_for_change(&path, FAST_POLL).await.is_err());
    }

    #[test]
    fn test_input_bytes_prefers_file_over_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "x\n").unwrap();

        let config = ServeConfig {
            addr: "127.0.0.1:0".into(),
            input: Some(path),
            stdin: Some(b"snapshot\n".to_vec()),
            load: LoadOptions {
                delimiter: b',',
                has_header: true,
            },
            detect_links: true,
            watch: false,
        };
        assert_eq!(input_bytes(&config).unwrap(), b"x\n");

        let config = ServeConfig {
            input: None,
            ..config
        };
        assert_eq!(input_bytes(&config).unwrap(), b"snapshot\n");
    }
}
