use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gitea-release.json";

/// Alias table plus the single Gitea server every alias lives on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "gitea_url")]
    pub server_url: String,
    #[serde(default)]
    pub repos: BTreeMap<String, RepoRef>,
}

/// A repository on the configured server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// What [`Config::add_repo`] did, for the confirmation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub alias: String,
    /// Set when `--url` named an existing alias and its server URL was kept.
    pub reused_alias: Option<String>,
}

impl Config {
    /// Start a config bound to `server_url` with no repositories.
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.to_owned(),
            repos: BTreeMap::new(),
        }
    }

    /// Read the config at `path`.
    ///
    /// A missing file is reported as [`Error::ConfigNotFound`] so callers can
    /// decide whether to start fresh.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(Error::fs("error opening config file", path, e)),
        };

        let config: Config = serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), repos = config.repos.len(), "loaded config");
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields an empty config bound
    /// to `server_url`.
    pub fn load_or_new(path: &Path, server_url: &str) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound { .. }) => {
                debug!(path = %path.display(), "no config yet, starting fresh");
                Ok(Self::new(server_url))
            }
            other => other,
        }
    }

    /// Overwrite `path` with this config as indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut json = serde_json::to_string_pretty(self).map_err(|e| write_err(io::Error::other(e)))?;
        json.push('\n');
        std::fs::write(path, json).map_err(write_err)?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Register `owner/name` under `alias` (default: the repository name).
    ///
    /// `url_or_alias` is either a server URL or the alias of an already
    /// configured repository; in the latter case the current server URL is
    /// kept. An existing entry with the same alias is replaced.
    pub fn add_repo(
        &mut self,
        url_or_alias: &str,
        owner: &str,
        name: &str,
        alias: Option<&str>,
    ) -> AddOutcome {
        let alias = alias.filter(|a| !a.is_empty()).unwrap_or(name).to_owned();

        let reused_alias = if self.repos.contains_key(url_or_alias) {
            Some(url_or_alias.to_owned())
        } else {
            self.server_url = url_or_alias.to_owned();
            None
        };

        self.repos.insert(
            alias.clone(),
            RepoRef {
                owner: owner.to_owned(),
                name: name.to_owned(),
            },
        );

        AddOutcome { alias, reused_alias }
    }

    /// Look up an alias.
    pub fn repo(&self, alias: &str) -> Result<&RepoRef> {
        self.repos.get(alias).ok_or_else(|| Error::AliasNotFound {
            alias: alias.to_owned(),
            available: self.repos.keys().cloned().collect(),
        })
    }
}
