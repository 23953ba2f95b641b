use std::time::Duration;

use reqwest::{Client, NoProxy, Proxy, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::downloader::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};
use crate::release::{find_release, Release, LATEST};

/// Outcome of the best-effort repository check done by `repo add`.
///
/// Public repositories can exist while their API stays hidden, so an
/// `Unconfirmed` result is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "log the verification result, even though it is never fatal"]
pub enum Verification {
    Confirmed,
    Unconfirmed(String),
}

/// Queries release metadata for one repository on a Gitea server.
pub struct Resolver {
    /// Server base URL without the `/api/v1` suffix.
    pub server_url: String,
    pub owner: String,
    pub name: String,
    /// Total time allowed for each API request.
    pub timeout: Duration,
    /// Optional HTTP proxy URL.
    pub proxy: Option<String>,
}

impl Resolver {
    /// Create a resolver with the default timeout and no proxy.
    pub fn new(server_url: &str, owner: &str, name: &str) -> Self {
        Self::with_config(server_url, owner, name, DEFAULT_TIMEOUT, None)
    }

    /// Create a resolver with explicit configuration.
    pub fn with_config(
        server_url: &str,
        owner: &str,
        name: &str,
        timeout: Duration,
        proxy: Option<String>,
    ) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
            owner: owner.to_owned(),
            name: name.to_owned(),
            timeout,
            proxy,
        }
    }

    fn build_client(&self) -> std::result::Result<Client, reqwest::Error> {
        let mut builder = Client::builder().timeout(self.timeout).user_agent(crate::USER_AGENT);
        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(Proxy::all(proxy_url)?.no_proxy(NoProxy::from_env()));
        }
        builder.build()
    }

    fn repo_url(&self) -> String {
        format!("{}/api/v1/repos/{}/{}", self.server_url, self.owner, self.name)
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let remote = |source| Error::Remote {
            url: url.to_owned(),
            source,
        };

        let client = self.build_client().map_err(remote)?;
        debug!(url, "GET");
        let resp = client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(remote)?;

        if !resp.status().is_success() {
            return Err(Error::RemoteStatus {
                url: url.to_owned(),
                status: resp.status().to_string(),
            });
        }

        resp.json().await.map_err(remote)
    }

    /// Every release, in the order the server returns them.
    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        let url = format!("{}/releases", self.repo_url());
        let releases: Vec<Release> = self.get_json(&url).await?;
        debug!(owner = %self.owner, name = %self.name, count = releases.len(), "fetched releases");
        Ok(releases)
    }

    /// The newest release only.
    pub async fn resolve_latest(&self) -> Result<Release> {
        let url = format!("{}/releases?limit=1", self.repo_url());
        let releases: Vec<Release> = self.get_json(&url).await?;
        releases.into_iter().next().ok_or_else(|| Error::ReleaseNotFound {
            owner: self.owner.clone(),
            name: self.name.clone(),
        })
    }

    /// Resolve `identifier` to a release.
    ///
    /// `"latest"` asks for the newest release; anything else is matched
    /// against tag names and titles of the full list, first hit wins.
    pub async fn resolve(&self, identifier: &str) -> Result<Release> {
        if identifier == LATEST {
            return self.resolve_latest().await;
        }
        let releases = self.list_releases().await?;
        find_release(releases, identifier)
    }

    /// Check that the repository answers on the API. Never fails.
    pub async fn verify_repository(&self) -> Verification {
        let url = self.repo_url();
        match self.get_json::<serde_json::Value>(&url).await {
            Ok(_) => Verification::Confirmed,
            Err(Error::RemoteStatus { status, .. }) if status.starts_with(StatusCode::NOT_FOUND.as_str()) => {
                Verification::Unconfirmed(format!("{}/{} is not visible on the API", self.owner, self.name))
            }
            Err(e) => Verification::Unconfirmed(e.to_string()),
        }
    }
}
