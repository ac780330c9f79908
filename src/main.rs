use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

mod error_handling;
mod git;
mod github;
mod manifest;
mod models;
mod readme;
mod sync;
mod ui;

use github::GitHubService;
use models::RepoIdentity;

#[derive(Parser)]
#[command(name = "sprout")]
#[command(about = "One-shot initializer for repositories created from a template")]
#[command(version)]
#[command(
    long_about = "Run once after creating a repository from the template: rewrites the package manifest, configures repository settings through the GitHub CLI, registers the repository for cross-repository file sync, regenerates the README, and deletes itself."
)]
struct Cli {
    /// Keep the package private: sets "private" in the manifest, skips the
    /// publish token, and omits release instructions from the README
    #[arg(long)]
    private: bool,

    /// Register for file sync by cloning the sync repository instead of
    /// going through the contents API
    #[arg(long)]
    clone_sync: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    preflight()?;

    let remote_url = git::origin_url()?;
    let identity = RepoIdentity::from_remote_url(&remote_url)?;
    ui::print_info(&format!("Initializing {identity}"));

    manifest::update(Path::new(manifest::MANIFEST_FILE), &identity, cli.private)?;
    ui::print_success(&format!("✓ Updated {}", manifest::MANIFEST_FILE));

    configure_repository(&identity, cli.private);

    if cli.clone_sync {
        sync::register_via_clone(&identity)?;
    } else {
        sync::register_via_api(&identity)?;
    }

    readme::write(Path::new("README.md"), &identity, cli.private)?;
    ui::print_success("✓ Regenerated README.md");

    remove_self()?;

    ui::print_success(&format!("Repository {identity} initialized!"));
    Ok(())
}

/// Verify the external tools this run depends on before touching anything
fn preflight() -> Result<()> {
    git::check_git_availability()?;

    if !GitHubService::check_availability()? {
        ui::show_error_with_help(
            "GitHub CLI is not available or not authenticated",
            &[
                "Install GitHub CLI: https://cli.github.com/",
                "Then authenticate: gh auth login",
            ],
        );
        anyhow::bail!("GitHub CLI not available");
    }

    let account = GitHubService::current_account()?;
    ui::print_info(&format!("Authenticated as {account}"));
    Ok(())
}

/// The best-effort configuration sequence. Each call is isolated: one
/// failure is logged and the rest still run.
fn configure_repository(identity: &RepoIdentity, private: bool) {
    let slug = identity.slug();

    github::best_effort("Configured issues, wiki and projects", || {
        GitHubService::configure_repo_features(&slug)
    });
    github::best_effort("Enabled GitHub Actions", || {
        GitHubService::enable_actions(&slug)
    });
    github::best_effort("Set workflow token permissions", || {
        GitHubService::set_workflow_permissions(&slug)
    });

    let branch = match GitHubService::default_branch(&slug) {
        Ok(branch) => branch,
        Err(e) => {
            ui::print_warning(&format!("Could not determine default branch: {e:#}"));
            "main".to_string()
        }
    };
    github::best_effort(&format!("Protected branch '{branch}'"), || {
        GitHubService::protect_branch(&slug, &branch)
    });

    if private {
        return;
    }

    match std::env::var("NPM_TOKEN") {
        Ok(token) => {
            github::best_effort("Configured NPM_TOKEN secret", || {
                GitHubService::set_secret(&slug, "NPM_TOKEN", &token)
            });
        }
        Err(_) => {
            ui::print_warning("NPM_TOKEN is not set; skipping publish token configuration");
        }
    }
}

/// Remove the running executable. The initializer is single-use: once the
/// repository is set up there is nothing left for it to do.
fn remove_self() -> Result<()> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    std::fs::remove_file(&exe)
        .with_context(|| format!("Failed to remove {}", exe.display()))?;
    ui::print_info(&format!("Removed {}", exe.display()));
    Ok(())
}
