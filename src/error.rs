//! Error types shared by every command.

use std::path::PathBuf;

/// Everything that can end a command early.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file does not exist yet.
    #[error("config file {} not found", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// The config file exists but is not valid JSON for [`crate::Config`].
    #[error("error decoding config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file could not be serialized or written.
    #[error("error writing config file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No repository is configured under this alias.
    #[error("repository alias {alias} not found{}", available_hint(.available))]
    AliasNotFound {
        alias: String,
        available: Vec<String>,
    },

    /// Transport-level failure talking to the server.
    #[error("request to {url} failed: {source}")]
    Remote {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} failed, status: {status}")]
    RemoteStatus { url: String, status: String },

    /// The repository has no releases at all.
    #[error("no releases found for {owner}/{name}")]
    ReleaseNotFound { owner: String, name: String },

    /// No release carries this tag or title.
    #[error("release with tag or title '{identifier}' not found")]
    IdentifierNotFound { identifier: String },

    /// The resolved release has no asset with this name.
    #[error("asset {asset} not found in release {release}")]
    AssetNotFound { asset: String, release: String },

    /// The asset name is not a plain file name and cannot be saved as-is.
    #[error("asset name '{asset}' is not a plain file name")]
    InvalidAssetName { asset: String },

    /// Creating, writing, or moving a file failed.
    #[error("{context} {}: {source}", .path.display())]
    Filesystem {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn fs(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            context,
            path: path.into(),
            source,
        }
    }
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

/// Result type for every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AssetNotFound {
            asset: "app.tar.gz".to_string(),
            release: "Release 1.0".to_string(),
        };
        assert_eq!(err.to_string(), "asset app.tar.gz not found in release Release 1.0");

        let err = Error::InvalidAssetName {
            asset: "../app.tar.gz".to_string(),
        };
        assert_eq!(err.to_string(), "asset name '../app.tar.gz' is not a plain file name");

        let err = Error::IdentifierNotFound {
            identifier: "v9".to_string(),
        };
        assert_eq!(err.to_string(), "release with tag or title 'v9' not found");

        let err = Error::ReleaseNotFound {
            owner: "acme".to_string(),
            name: "tool".to_string(),
        };
        assert_eq!(err.to_string(), "no releases found for acme/tool");
    }

    #[test]
    fn test_alias_not_found_lists_available() {
        let err = Error::AliasNotFound {
            alias: "nope".to_string(),
            available: vec!["api".to_string(), "web".to_string()],
        };
        assert_eq!(err.to_string(), "repository alias nope not found (available: api, web)");

        let err = Error::AliasNotFound {
            alias: "nope".to_string(),
            available: Vec::new(),
        };
        assert_eq!(err.to_string(), "repository alias nope not found");
    }

    #[test]
    fn test_filesystem_error_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::fs("error creating output file", "/tmp/x.bin", io_err);
        assert_eq!(err.to_string(), "error creating output file /tmp/x.bin: denied");
    }
}
