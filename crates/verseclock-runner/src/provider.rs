//! Verse providers: HTTP and local file.
//!
//! Uses enum dispatch rather than trait objects, since the provider trait's
//! async method is not dyn-compatible. Both variants re-read their source on
//! every fetch; the HTTP variant also defeats any cache between it and the
//! server.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use tracing::debug;
use verseclock_core::config::SourceConfig;
use verseclock_core::error::LoadError;
use verseclock_core::store::VerseProvider;

use crate::error::RunnerError;

// ---------------------------------------------------------------------------
// Unified source enum
// ---------------------------------------------------------------------------

/// Where the verse document comes from.
#[derive(Debug)]
pub enum VerseSource {
    /// Fetched over HTTP.
    Http(HttpVerseProvider),
    /// Read from the local filesystem.
    File(FileVerseProvider),
}

impl VerseProvider for VerseSource {
    fn describe(&self) -> String {
        match self {
            Self::Http(provider) => provider.url.clone(),
            Self::File(provider) => provider.path.display().to_string(),
        }
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        match self {
            Self::Http(provider) => provider.fetch().await,
            Self::File(provider) => provider.fetch().await,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fetches the verse document with `GET`, bypassing caches.
///
/// Every request carries a fresh `v` and `nocache` query parameter and the
/// `Cache-Control`, `Pragma`, and `Expires` headers, so neither the client
/// nor any proxy can answer from a stale copy.
#[derive(Debug)]
pub struct HttpVerseProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpVerseProvider {
    /// Create a provider for `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::HttpClient`] if the client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunnerError::HttpClient(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        let now_ms = Utc::now().timestamp_millis();
        let version = format!("{now_ms}{}", rand::random::<u32>());
        let nocache = now_ms.to_string();

        let response = self
            .client
            .get(&self.url)
            .query(&[("v", version.as_str()), ("nocache", nocache.as_str())])
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0")
            .send()
            .await
            .map_err(|e| LoadError::Unreachable {
                message: format!("request to {} failed: {e}", self.url),
            })?;

        let status = response.status();
        debug!(url = self.url, status = status.as_u16(), "verse document response");
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| LoadError::Unreachable {
            message: format!("failed to read response from {}: {e}", self.url),
        })
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// Reads the verse document from disk on every fetch.
#[derive(Debug)]
pub struct FileVerseProvider {
    path: PathBuf,
}

impl FileVerseProvider {
    /// Create a provider for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::Unreachable {
                message: format!("failed to read {}: {e}", self.path.display()),
            })
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a verse source from configuration. A configured `path` wins
/// over `url`.
///
/// # Errors
///
/// Returns [`RunnerError::HttpClient`] if the HTTP client cannot be built.
pub fn create_source(config: &SourceConfig) -> Result<VerseSource, RunnerError> {
    if let Some(path) = &config.path {
        return Ok(VerseSource::File(FileVerseProvider::new(path)));
    }
    let provider = HttpVerseProvider::new(&config.url, config.request_timeout())?;
    Ok(VerseSource::Http(provider))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    const BODY: &str =
        r#"{"verses": [{"book": "John", "chapter": 3, "verse": 16, "text": "loved"}]}"#;

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(buf.get(..n).unwrap());
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });

        (format!("http://{addr}/verses.json"), handle)
    }

    #[tokio::test]
    async fn http_fetch_sends_cache_busters() {
        let (url, server) = serve_once("200 OK", BODY).await;
        let provider = HttpVerseProvider::new(&url, Duration::from_secs(5)).unwrap();

        let body = provider.fetch().await.unwrap();
        assert_eq!(body, BODY);

        let request = server.await.unwrap().to_lowercase();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("get /verses.json?v="));
        assert!(request_line.contains("&nocache="));
        assert!(request.contains("cache-control: no-cache, no-store, must-revalidate"));
        assert!(request.contains("pragma: no-cache"));
        assert!(request.contains("expires: 0"));
    }

    #[tokio::test]
    async fn http_non_success_is_status_error() {
        let (url, server) = serve_once("404 Not Found", "{}").await;
        let provider = HttpVerseProvider::new(&url, Duration::from_secs(5)).unwrap();

        let result = provider.fetch().await;
        assert!(matches!(result, Err(LoadError::Status { status: 404 })));
        let _ = server.await;
    }

    #[tokio::test]
    async fn http_refused_connection_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/verses.json");
        let provider = HttpVerseProvider::new(&url, Duration::from_secs(5)).unwrap();
        let result = provider.fetch().await;
        assert!(matches!(result, Err(LoadError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn file_fetch_reads_current_contents() {
        let path = std::env::temp_dir().join(format!("verseclock-test-{}.json", std::process::id()));
        tokio::fs::write(&path, BODY).await.unwrap();

        let source = VerseSource::File(FileVerseProvider::new(&path));
        assert_eq!(source.fetch().await.unwrap(), BODY);

        tokio::fs::write(&path, r#"{"verses": []}"#).await.unwrap();
        assert_eq!(source.fetch().await.unwrap(), r#"{"verses": []}"#);

        tokio::fs::remove_file(&path).await.unwrap();
        let result = source.fetch().await;
        assert!(matches!(result, Err(LoadError::Unreachable { .. })));
    }

    #[test]
    fn path_takes_precedence_over_url() {
        let config = SourceConfig {
            path: Some("data/verses.json".to_owned()),
            ..SourceConfig::default()
        };
        let source = create_source(&config).unwrap();
        assert!(matches!(source, VerseSource::File(_)));
        assert_eq!(source.describe(), "data/verses.json");
    }

    #[tokio::test]
    async fn url_builds_http_source() {
        let source = create_source(&SourceConfig::default()).unwrap();
        assert!(matches!(source, VerseSource::Http(_)));
        assert_eq!(source.describe(), "http://localhost:8080/verses.json");
    }
}
