use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::{Client, NoProxy, Proxy};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::progress::{mib_per_sec, ProgressFn};

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Streams release assets to disk.
pub struct Downloader {
    /// Upper bound on connecting and on each read of the response body.
    pub timeout: Duration,
    /// Optional HTTP proxy URL.
    pub proxy: Option<String>,
    /// Optional progress callback.
    pub progress: Option<ProgressFn>,
}

impl Downloader {
    /// Create a downloader with default settings and no progress output.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            progress: None,
        }
    }

    /// Create a downloader with explicit configuration.
    pub fn with_config(timeout: Duration, proxy: Option<String>, progress: Option<ProgressFn>) -> Self {
        Self {
            timeout,
            proxy,
            progress,
        }
    }

    /// Assets can be large, so the timeout bounds stalls rather than the
    /// whole transfer.
    fn build_client(&self) -> std::result::Result<Client, reqwest::Error> {
        let mut builder = Client::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .user_agent(crate::USER_AGENT);
        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(Proxy::all(proxy_url)?.no_proxy(NoProxy::from_env()));
        }
        builder.build()
    }

    /// Stream `url` into the file at `dest`, returning the number of bytes
    /// written.
    ///
    /// `size_hint` is the size announced by the release metadata and is only
    /// used for progress; when it is zero the response `Content-Length` is
    /// used instead. The file is created only after a successful status and
    /// removed again if the transfer fails halfway.
    pub async fn download(&self, url: &str, size_hint: u64, dest: &Path) -> Result<u64> {
        let remote = |source| Error::Remote {
            url: url.to_owned(),
            source,
        };

        let client = self.build_client().map_err(remote)?;
        debug!(url, "GET");
        let resp = client.get(url).send().await.map_err(remote)?;
        if !resp.status().is_success() {
            return Err(Error::RemoteStatus {
                url: url.to_owned(),
                status: resp.status().to_string(),
            });
        }

        let total = match size_hint {
            0 => resp.content_length().unwrap_or(0),
            n => n,
        };
        let label = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_owned());

        let mut file = std::fs::File::create(dest).map_err(|e| Error::fs("error creating output file", dest, e))?;
        info!(url, dest = %dest.display(), size = total, "downloading asset");

        let start = Instant::now();
        let result = self.stream_to(resp, &mut file, dest, &label, total, start).await;
        drop(file);

        match result {
            Ok(downloaded) => {
                self.report(&label, downloaded, total, start, true);
                info!(
                    dest = %dest.display(),
                    bytes = downloaded,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "download complete"
                );
                Ok(downloaded)
            }
            Err(e) => {
                let _ = std::fs::remove_file(dest);
                Err(e)
            }
        }
    }

    async fn stream_to(
        &self,
        resp: reqwest::Response,
        file: &mut std::fs::File,
        dest: &Path,
        label: &str,
        total: u64,
        start: Instant,
    ) -> Result<u64> {
        let url = resp.url().to_string();
        let mut stream = resp.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| Error::Remote {
                url: url.clone(),
                source,
            })?;
            file.write_all(&chunk)
                .map_err(|e| Error::fs("error writing to output file", dest, e))?;
            downloaded += chunk.len() as u64;
            self.report(label, downloaded, total, start, false);
        }

        file.flush()
            .map_err(|e| Error::fs("error writing to output file", dest, e))?;
        Ok(downloaded)
    }

    fn report(&self, label: &str, downloaded: u64, total: u64, start: Instant, complete: bool) {
        if let Some(progress) = &self.progress {
            let rate = mib_per_sec(downloaded, start.elapsed().as_secs_f64());
            progress(label, downloaded, total, rate, complete);
        }
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}
