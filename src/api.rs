use std::path::PathBuf;
use std::time::Duration;

use crate::deploy::{check_file_name, TempDownload};
use crate::downloader::{Downloader, DEFAULT_TIMEOUT};
use crate::error::Result;
use crate::progress::{default_progress_fn, ProgressFn};
use crate::release::Release;
use crate::resolver::{Resolver, Verification};

// ──────────────────────────────────────────────────────────────────────────────
// Api
// ──────────────────────────────────────────────────────────────────────────────

/// Top-level entry-point with a chainable builder API.
///
/// # Example
/// ```rust,no_run
/// use giteafetch::{Api, Destination};
///
/// #[tokio::main]
/// async fn main() {
///     let repo = Api::new("https://git.example.com").repo("acme", "tool");
///     let release = repo.resolve("latest").await.unwrap();
///     repo.download(&release, "tool-linux.tar.gz", &Destination::Directory(".".into()))
///         .await
///         .unwrap();
/// }
/// ```
pub struct Api {
    server_url: String,
    timeout: Duration,
    proxy: Option<String>,
    progress: Option<ProgressFn>,
}

impl Api {
    /// Create a new `Api` for the Gitea server at `server_url`.
    ///
    /// Proxy is read from `HTTP_PROXY` / `HTTPS_PROXY` environment variables.
    pub fn new(server_url: &str) -> Self {
        let proxy = std::env::var("HTTP_PROXY")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("HTTPS_PROXY").ok().filter(|s| !s.is_empty()));

        Self {
            server_url: server_url.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            proxy,
            progress: Some(default_progress_fn()),
        }
    }

    /// Set the timeout applied to every outbound request (builder).
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the progress callback (builder).
    pub fn set_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Disable progress output (builder).
    pub fn no_progress(mut self) -> Self {
        self.progress = None;
        self
    }

    /// Set an explicit HTTP/HTTPS proxy URL (builder).
    pub fn set_proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_owned());
        self
    }

    /// Select a repository and return a [`RepoApi`].
    pub fn repo(self, owner: &str, name: &str) -> RepoApi {
        let resolver = Resolver::with_config(&self.server_url, owner, name, self.timeout, self.proxy.clone());
        RepoApi { api: self, resolver }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// RepoApi
// ──────────────────────────────────────────────────────────────────────────────

/// Where [`RepoApi::download`] puts the asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write straight to `<dir>/<asset name>`.
    Directory(PathBuf),
    /// Stage at `<temp_dir>/<asset name>`, then move into `deploy_dir`.
    Deploy { temp_dir: PathBuf, deploy_dir: PathBuf },
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
    pub deployed: bool,
}

/// Intermediate builder after a repository has been specified.
pub struct RepoApi {
    api: Api,
    resolver: Resolver,
}

impl RepoApi {
    /// Every release of the repository, in API order.
    pub async fn releases(&self) -> Result<Vec<Release>> {
        self.resolver.list_releases().await
    }

    /// The newest release.
    pub async fn latest(&self) -> Result<Release> {
        self.resolver.resolve_latest().await
    }

    /// A release by tag or title, or the newest one for `"latest"`.
    pub async fn resolve(&self, identifier: &str) -> Result<Release> {
        self.resolver.resolve(identifier).await
    }

    /// Best-effort check that the repository is reachable.
    pub async fn verify(&self) -> Verification {
        self.resolver.verify_repository().await
    }

    fn downloader(&self) -> Downloader {
        Downloader::with_config(self.api.timeout, self.api.proxy.clone(), self.api.progress.clone())
    }

    /// Download `asset_name` from `release` into `destination`.
    ///
    /// The asset is looked up before anything touches the filesystem, so a
    /// missing asset leaves no file behind. Names that are not a plain file
    /// name are refused rather than joined onto the destination.
    pub async fn download(
        &self,
        release: &Release,
        asset_name: &str,
        destination: &Destination,
    ) -> Result<Downloaded> {
        let asset = release.find_asset(asset_name)?;
        check_file_name(&asset.name)?;
        let downloader = self.downloader();

        match destination {
            Destination::Directory(dir) => {
                let path = dir.join(&asset.name);
                let bytes = downloader.download(&asset.download_url, asset.size, &path).await?;
                Ok(Downloaded {
                    path,
                    bytes,
                    deployed: false,
                })
            }
            Destination::Deploy { temp_dir, deploy_dir } => {
                let staged = TempDownload::new(temp_dir, &asset.name)?;
                let bytes = downloader
                    .download(&asset.download_url, asset.size, staged.path())
                    .await?;
                let path = staged.deploy(deploy_dir, &asset.name)?;
                Ok(Downloaded {
                    path,
                    bytes,
                    deployed: true,
                })
            }
        }
    }
}
