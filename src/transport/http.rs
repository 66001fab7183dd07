//! HTTP capability built on [`ureq`].
use std::fs::File;
use std::io::{Read as _, Write as _};
use std::path::Path;
use std::time::Duration;

use crate::error::SyncError;

/// Size of each chunk copied from the response body to disk.
const CHUNK_SIZE: usize = 64 * 1024;

/// Fetches remote resources.
pub trait Downloader: Send + Sync + std::fmt::Debug {
    /// Fetch `url` fully into memory.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Download`] on any network or HTTP status failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SyncError>;

    /// Stream `url` into the file at `dest`, calling `progress` with the
    /// running byte count after every chunk. Returns the total byte count.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Download`] on any network, HTTP status, or write
    /// failure. A partially written `dest` may remain.
    fn download(&self, url: &str, dest: &Path, progress: &dyn Fn(u64)) -> Result<u64, SyncError>;
}

/// [`Downloader`] backed by [`ureq`].
///
/// The manifest is small, so [`Downloader::fetch`] bounds the whole request.
/// Archives can be large, so [`Downloader::download`] only bounds connecting
/// and waiting for the response head; the body may take as long as it needs.
#[derive(Debug, Clone)]
pub struct HttpClient {
    fetch_agent: ureq::Agent,
    download_agent: ureq::Agent,
}

impl HttpClient {
    /// Create a client that gives up on a stalled server after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let fetch_agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        let download_agent = ureq::Agent::config_builder()
            .timeout_connect(Some(timeout))
            .timeout_recv_response(Some(timeout))
            .build()
            .into();
        Self {
            fetch_agent,
            download_agent,
        }
    }
}

fn download_error(url: &str, e: impl std::fmt::Display) -> SyncError {
    SyncError::Download(format!("{url}: {e}"))
}

impl Downloader for HttpClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        let mut response = self
            .fetch_agent
            .get(url)
            .call()
            .map_err(|e| download_error(url, e))?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| download_error(url, e))
    }

    fn download(&self, url: &str, dest: &Path, progress: &dyn Fn(u64)) -> Result<u64, SyncError> {
        let response = self
            .download_agent
            .get(url)
            .call()
            .map_err(|e| download_error(url, e))?;
        let mut reader = response.into_body().into_reader();
        let mut file = File::create(dest).map_err(|e| download_error(url, e))?;

        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = reader.read(&mut buf).map_err(|e| download_error(url, e))?;
            if n == 0 {
                break;
            }
            let chunk = buf.get(..n).unwrap_or_default();
            file.write_all(chunk).map_err(|e| download_error(url, e))?;
            total += u64::try_from(n).unwrap_or(0);
            progress(total);
        }
        file.flush().map_err(|e| download_error(url, e))?;
        Ok(total)
    }
}
