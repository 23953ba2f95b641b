//! Gitea release metadata types and the lookups done on them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier that selects the newest release instead of a tag or title.
pub const LATEST: &str = "latest";

/// A release as returned by `/api/v1/repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub name: String,
    pub tag_name: String,
    /// Missing or `null` on unpublished drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    pub size: u64,
}

impl Release {
    /// Publication time in RFC 3339, offset as sent by the server, or an
    /// empty string when the server sent none.
    pub fn published(&self) -> String {
        self.published_at.map(|t| t.to_rfc3339()).unwrap_or_default()
    }

    /// First asset named exactly `asset_name`.
    pub fn find_asset(&self, asset_name: &str) -> Result<&Asset> {
        self.assets
            .iter()
            .find(|a| a.name == asset_name)
            .ok_or_else(|| Error::AssetNotFound {
                asset: asset_name.to_owned(),
                release: self.name.clone(),
            })
    }
}

/// First release, in list order, whose tag or title equals `identifier`.
pub fn find_release(releases: Vec<Release>, identifier: &str) -> Result<Release> {
    releases
        .into_iter()
        .find(|r| r.tag_name == identifier || r.name == identifier)
        .ok_or_else(|| Error::IdentifierNotFound {
            identifier: identifier.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(name: &str, tag: &str, assets: &[(&str, u64)]) -> Release {
        Release {
            name: name.to_owned(),
            tag_name: tag.to_owned(),
            published_at: Some(DateTime::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap()),
            assets: assets
                .iter()
                .map(|(n, size)| Asset {
                    name: (*n).to_owned(),
                    download_url: format!("https://git.example.com/attachments/{n}"),
                    size: *size,
                })
                .collect(),
        }
    }

    #[test]
    fn test_find_release_by_tag_or_title() {
        let releases = vec![
            release("Second", "v2.0.0", &[]),
            release("First", "v1.0.0", &[]),
        ];

        assert_eq!(find_release(releases.clone(), "v1.0.0").unwrap().name, "First");
        assert_eq!(find_release(releases, "Second").unwrap().tag_name, "v2.0.0");
    }

    #[test]
    fn test_find_release_first_match_in_list_order_wins() {
        // Title of the first entry collides with the tag of the second.
        let releases = vec![
            release("v1.0.0", "build-42", &[]),
            release("Stable", "v1.0.0", &[]),
        ];
        assert_eq!(find_release(releases, "v1.0.0").unwrap().tag_name, "build-42");

        let releases = vec![
            release("Stable", "v1.0.0", &[]),
            release("v1.0.0", "build-42", &[]),
        ];
        assert_eq!(find_release(releases, "v1.0.0").unwrap().tag_name, "v1.0.0");
    }

    #[test]
    fn test_find_release_missing() {
        let err = find_release(vec![release("One", "v1", &[])], "v2").unwrap_err();
        assert!(matches!(err, Error::IdentifierNotFound { identifier } if identifier == "v2"));
    }

    #[test]
    fn test_find_asset_exact_first_match() {
        let r = release("One", "v1", &[("app.zip", 10), ("App.zip", 20), ("app.zip", 30)]);

        assert_eq!(r.find_asset("app.zip").unwrap().size, 10);
        assert_eq!(r.find_asset("App.zip").unwrap().size, 20);
        assert!(matches!(r.find_asset("APP.ZIP"), Err(Error::AssetNotFound { .. })));
    }

    #[test]
    fn test_deserialize_gitea_payload() {
        let json = r#"{
            "id": 7,
            "tag_name": "v1.2.3",
            "name": "Release 1.2.3",
            "draft": false,
            "published_at": "2024-05-06T07:08:09+02:00",
            "assets": [
                {"id": 1, "name": "tool-linux.tar.gz", "size": 2048,
                 "browser_download_url": "https://git.example.com/acme/tool/releases/download/v1.2.3/tool-linux.tar.gz"}
            ]
        }"#;

        let r: Release = serde_json::from_str(json).unwrap();
        assert_eq!(r.tag_name, "v1.2.3");
        assert_eq!(r.published(), "2024-05-06T07:08:09+02:00");
        assert_eq!(r.assets[0].size, 2048);
        assert!(r.assets[0].download_url.ends_with("tool-linux.tar.gz"));
    }

    #[test]
    fn test_deserialize_without_publication_time() {
        for json in [
            r#"{"tag_name": "v0.1.0", "name": "Draft", "published_at": null, "assets": []}"#,
            r#"{"tag_name": "v0.1.0", "name": "Draft"}"#,
        ] {
            let r: Release = serde_json::from_str(json).unwrap();
            assert_eq!(r.published_at, None);
            assert_eq!(r.published(), "");
            assert!(r.assets.is_empty());
        }
    }
}
