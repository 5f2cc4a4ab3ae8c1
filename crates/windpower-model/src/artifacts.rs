//! Fetch-if-missing for model and scaler artifacts.
//!
//! An artifact already present at its configured path is used as is.
//! Otherwise it is fetched once into `<path>.partial` and renamed into place,
//! so an interrupted fetch never leaves a truncated artifact behind.
//! There is no retry: a failed fetch fails predictor construction.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use windpower_common::{ForecastError, ForecastResult};

/// Downloads artifacts over HTTP(S) or copies them from `file://` URLs.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: Client,
}

impl ArtifactFetcher {
    /// Create a fetcher with a default HTTP client.
    pub fn new() -> ForecastResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ForecastError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Make sure `path` exists, fetching it from `url` if it does not.
    ///
    /// Parent directories are created as needed. Returns the local path.
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn ensure_local(&self, url: &str, path: &Path) -> ForecastResult<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ForecastError::fetch(url, format!("cannot create {}: {}", parent.display(), e)))?;
        }

        if path.exists() {
            debug!("Artifact already present, skipping fetch");
            return Ok(path.to_path_buf());
        }

        let partial = partial_path(path);
        let result = match url.strip_prefix("file://") {
            Some(source) => copy_local(url, Path::new(source), &partial).await,
            None => self.download(url, &partial).await,
        };

        if let Err(e) = result {
            fs::remove_file(&partial).await.ok();
            return Err(e);
        }

        fs::rename(&partial, path)
            .await
            .map_err(|e| ForecastError::fetch(url, format!("cannot move into place: {}", e)))?;

        info!("Fetched artifact");
        Ok(path.to_path_buf())
    }

    /// Stream an HTTP response body to `dest`.
    async fn download(&self, url: &str, dest: &Path) -> ForecastResult<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ForecastError::fetch(url, e))?;

        match response.status() {
            StatusCode::OK => {}
            status => return Err(ForecastError::fetch(url, format!("HTTP error: {}", status))),
        }

        let mut file = File::create(dest)
            .await
            .map_err(|e| ForecastError::fetch(url, e))?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ForecastError::fetch(url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ForecastError::fetch(url, e))?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| ForecastError::fetch(url, e))?;
        file.sync_all().await.map_err(|e| ForecastError::fetch(url, e))?;

        debug!(bytes = written, "Download complete");
        Ok(written)
    }
}

async fn copy_local(url: &str, source: &Path, dest: &Path) -> ForecastResult<u64> {
    fs::copy(source, dest)
        .await
        .map_err(|e| ForecastError::fetch(url, e))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}
