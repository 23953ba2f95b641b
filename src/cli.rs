//! Command-line definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::downloader::DEFAULT_TIMEOUT;
use crate::release::LATEST;

/// Interact with Gitea releases
#[derive(Parser, Debug)]
#[command(name = "giteafetch", version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// HTTP timeout in seconds for every request (0 keeps the default)
    #[arg(long, global = true, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },

    /// List all releases for a repository
    List {
        /// Repository alias
        alias: String,
    },

    /// Fetch a specific or the latest release for a repository
    #[command(long_about = "Fetch a specific release by tag/title or the latest release for a repository")]
    Fetch(FetchArgs),
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// Add a repository to the configuration
    Add(AddArgs),

    /// List all configured repositories
    List,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Gitea URL or an existing repository alias
    #[arg(long)]
    pub url: String,

    /// Repository owner
    #[arg(long)]
    pub owner: String,

    /// Repository name
    #[arg(long)]
    pub name: String,

    /// Repository alias (defaults to the repository name)
    #[arg(long)]
    pub alias: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Repository alias
    pub alias: String,

    /// Release tag or title, or "latest"
    #[arg(default_value = LATEST)]
    pub release: String,

    /// Download a specific asset from the release
    #[arg(long, value_name = "ASSET")]
    pub download: Option<String>,

    /// Directory to deploy the downloaded asset to
    #[arg(long, value_name = "DIR")]
    pub deploy: Option<PathBuf>,

    /// Output only the tag name with no additional text
    #[arg(long)]
    pub tag: bool,

    /// Output only the published date with no additional text
    #[arg(long)]
    pub date: bool,
}

/// Runtime settings threaded through every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub timeout: Duration,
    /// Draw a progress bar while downloading.
    pub progress: bool,
    /// Where plain downloads land.
    pub work_dir: PathBuf,
    /// Where deploy downloads are staged.
    pub temp_dir: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        let timeout = match cli.timeout {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        Self {
            config_path: cli.config.clone(),
            timeout,
            progress: true,
            work_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            temp_dir: std::env::temp_dir(),
        }
    }
}
