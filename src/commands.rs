//! Subcommand handlers and their text output.
//!
//! Each handler returns the text meant for stdout so the binary decides how
//! to print it; `--tag` and `--date` rely on getting the bare value back.

use std::fmt;

use tracing::{debug, info};

use crate::api::{Api, Destination};
use crate::cli::{AddArgs, Command, FetchArgs, RepoCommand, Settings};
use crate::config::{Config, RepoRef};
use crate::error::Result;
use crate::release::Release;
use crate::resolver::Verification;

/// Run one parsed command to completion.
pub async fn run(command: &Command, settings: &Settings) -> Result<String> {
    match command {
        Command::Repo {
            command: RepoCommand::Add(args),
        } => repo_add(args, settings).await,
        Command::Repo {
            command: RepoCommand::List,
        } => repo_list(settings),
        Command::List { alias } => list(alias, settings).await,
        Command::Fetch(args) => fetch(args, settings).await,
    }
}

fn api(server_url: &str, settings: &Settings) -> Api {
    let api = Api::new(server_url).set_timeout(settings.timeout);
    if settings.progress {
        api
    } else {
        api.no_progress()
    }
}

pub async fn repo_add(args: &AddArgs, settings: &Settings) -> Result<String> {
    let mut config = Config::load_or_new(&settings.config_path, &args.url)?;
    let outcome = config.add_repo(&args.url, &args.owner, &args.name, args.alias.as_deref());

    match api(&config.server_url, settings)
        .no_progress()
        .repo(&args.owner, &args.name)
        .verify()
        .await
    {
        Verification::Confirmed => debug!(owner = %args.owner, name = %args.name, "repository confirmed"),
        Verification::Unconfirmed(reason) => {
            debug!(owner = %args.owner, name = %args.name, %reason, "repository not confirmed, adding anyway")
        }
    }

    config.save(&settings.config_path)?;
    info!(alias = %outcome.alias, server = %config.server_url, "repository added");

    let mut out = String::new();
    if let Some(reused) = &outcome.reused_alias {
        out.push_str(&format!("Using Gitea URL from existing alias '{reused}'\n"));
    }
    out.push_str(&format!(
        "Repository {}/{} added with alias {}\n",
        args.owner, args.name, outcome.alias
    ));
    Ok(out)
}

pub fn repo_list(settings: &Settings) -> Result<String> {
    let config = Config::load(&settings.config_path)?;
    Ok(RepoList(&config).to_string())
}

pub async fn list(alias: &str, settings: &Settings) -> Result<String> {
    let config = Config::load(&settings.config_path)?;
    let repo = config.repo(alias)?;

    let releases = api(&config.server_url, settings)
        .repo(&repo.owner, &repo.name)
        .releases()
        .await?;

    Ok(ReleaseList { repo, releases: &releases }.to_string())
}

pub async fn fetch(args: &FetchArgs, settings: &Settings) -> Result<String> {
    let config = Config::load(&settings.config_path)?;
    let repo = config.repo(&args.alias)?;

    let repo_api = api(&config.server_url, settings).repo(&repo.owner, &repo.name);
    let release = repo_api.resolve(&args.release).await?;

    if let Some(asset_name) = &args.download {
        let destination = match &args.deploy {
            Some(deploy_dir) => Destination::Deploy {
                temp_dir: settings.temp_dir.clone(),
                deploy_dir: deploy_dir.clone(),
            },
            None => Destination::Directory(settings.work_dir.clone()),
        };

        let downloaded = repo_api.download(&release, asset_name, &destination).await?;
        let verb = if downloaded.deployed {
            "downloaded and deployed"
        } else {
            "downloaded"
        };
        return Ok(format!(
            "Asset {asset_name} from release {} has been {verb} to {}\n",
            release.name,
            downloaded.path.display()
        ));
    }

    if args.tag {
        return Ok(release.tag_name);
    }
    if args.date {
        return Ok(release.published());
    }

    Ok(ReleaseInfo {
        repo,
        release: &release,
    }
    .to_string())
}

/// `repo list` output.
pub struct RepoList<'a>(pub &'a Config);

impl fmt::Display for RepoList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configured repositories:")?;
        for (alias, repo) in &self.0.repos {
            writeln!(f, "  {alias}: {}/{}", repo.owner, repo.name)?;
        }
        Ok(())
    }
}

/// `list` output.
pub struct ReleaseList<'a> {
    pub repo: &'a RepoRef,
    pub releases: &'a [Release],
}

impl fmt::Display for ReleaseList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let RepoRef { owner, name } = self.repo;
        if self.releases.is_empty() {
            return writeln!(f, "No releases found for {owner}/{name}");
        }

        writeln!(f, "Releases for {owner}/{name}:")?;
        for release in self.releases {
            writeln!(f, "  {} (Published: {})", release.name, release.published())?;
            writeln!(f, "    Tag: {}", release.tag_name)?;
            writeln!(f, "    Assets:")?;
            for asset in &release.assets {
                writeln!(f, "      {} (Size: {} bytes)", asset.name, asset.size)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Full `fetch` output for one release.
pub struct ReleaseInfo<'a> {
    pub repo: &'a RepoRef,
    pub release: &'a Release,
}

impl fmt::Display for ReleaseInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = self.release;
        writeln!(f, "Release for {}/{}:", self.repo.owner, self.repo.name)?;
        writeln!(f, "  Name: {}", release.name)?;
        writeln!(f, "  Tag: {}", release.tag_name)?;
        writeln!(f, "  Published: {}", release.published())?;
        writeln!(f, "  Assets:")?;
        for asset in &release.assets {
            writeln!(f, "    {} (Size: {} bytes)", asset.name, asset.size)?;
        }
        Ok(())
    }
}
