//! # giteafetch
//!
//! List the releases of repositories on a self-hosted Gitea server and
//! download, optionally deploy, their assets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use giteafetch::{Api, Destination};
//!
//! #[tokio::main]
//! async fn main() {
//!     let repo = Api::new("https://git.example.com").repo("acme", "tool");
//!     let release = repo.resolve("v1.2.0").await.unwrap();
//!     let done = repo
//!         .download(
//!             &release,
//!             "tool-linux-amd64",
//!             &Destination::Deploy {
//!                 temp_dir: std::env::temp_dir(),
//!                 deploy_dir: "/opt/tool/bin".into(),
//!             },
//!         )
//!         .await
//!         .unwrap();
//!     println!("{}", done.path.display());
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod downloader;
pub mod error;
pub mod progress;
pub mod release;
pub mod resolver;

pub use api::{Api, Destination, Downloaded, RepoApi};
pub use config::{Config, RepoRef};
pub use downloader::Downloader;
pub use error::{Error, Result};
pub use release::{Asset, Release};
pub use resolver::{Resolver, Verification};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("giteafetch/", env!("CARGO_PKG_VERSION"));
