use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use tempfile::TempDir;

use crate::git;
use crate::github::GitHubService;
use crate::models::RepoIdentity;
use crate::ui;

/// Repository (per owner) holding the file-sync configuration
pub const SYNC_REPO_NAME: &str = "repo-file-sync";

/// Tracked file listing every repository participating in the sync
pub const SYNC_CONFIG_FILE: &str = "sync.yml";

/// Sentinel line anchoring the workflow sync group
pub const WORKFLOW_SENTINEL: &str = "# template-workflows";

/// Sentinel line anchoring the config sync group
pub const CONFIG_SENTINEL: &str = "# template-configs";

/// Outcome of patching the sync-config document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// The repository is already registered
    Unchanged,
    /// The document with the new entry inserted under both sentinels
    Updated(String),
}

/// Insert `slug` into both automation groups of the sync-config document.
///
/// Idempotent: if the entry already appears anywhere in the document the
/// patch is skipped. A missing sentinel means the document is malformed
/// and is an error.
pub fn patch_sync_config(doc: &str, slug: &str) -> Result<Patch> {
    if doc.lines().any(|line| line.trim() == slug) {
        return Ok(Patch::Unchanged);
    }

    let patched = insert_after_sentinel(doc, WORKFLOW_SENTINEL, slug)?;
    let patched = insert_after_sentinel(&patched, CONFIG_SENTINEL, slug)?;
    Ok(Patch::Updated(patched))
}

/// Insert `entry` on a new line directly after the sentinel, reusing the
/// sentinel's indentation. Everything else in the document is untouched.
fn insert_after_sentinel(doc: &str, sentinel: &str, entry: &str) -> Result<String> {
    let pattern = Regex::new(&format!(
        r"(?m)^[ \t]*{}[ \t]*$",
        regex::escape(sentinel)
    ))
    .expect("valid pattern");

    let found = pattern.find(doc).with_context(|| {
        format!("Sync config has no '{sentinel}' sentinel line. Is {SYNC_CONFIG_FILE} malformed?")
    })?;

    let indent: String = doc[found.start()..found.end()]
        .chars()
        .take_while(char::is_ascii_whitespace)
        .collect();

    let mut out = String::with_capacity(doc.len() + indent.len() + entry.len() + 1);
    out.push_str(&doc[..found.end()]);
    out.push('\n');
    out.push_str(&indent);
    out.push_str(entry);
    out.push_str(&doc[found.end()..]);
    Ok(out)
}

fn sync_repo_slug(identity: &RepoIdentity) -> String {
    format!("{}/{}", identity.owner, SYNC_REPO_NAME)
}

fn commit_message(identity: &RepoIdentity) -> String {
    format!("Register {} for file sync", identity.slug())
}

/// Register the repository by updating the sync config through the
/// contents API, carrying the fetched blob SHA to catch lost updates.
pub fn register_via_api(identity: &RepoIdentity) -> Result<()> {
    let sync_slug = sync_repo_slug(identity);
    let file = GitHubService::get_repo_file(&sync_slug, SYNC_CONFIG_FILE)?;

    match patch_sync_config(&file.content, &identity.slug())? {
        Patch::Unchanged => {
            ui::print_info(&format!("{} is already registered for file sync", identity));
        }
        Patch::Updated(doc) => {
            GitHubService::update_repo_file(
                &sync_slug,
                SYNC_CONFIG_FILE,
                &doc,
                &file.sha,
                &commit_message(identity),
            )?;
            ui::print_success(&format!("✓ Registered {identity} for file sync"));
        }
    }

    Ok(())
}

/// Register the repository by cloning the sync repository, patching the
/// config in place, and pushing to its default branch. The clone lives in
/// a temporary directory that is removed on every exit path.
pub fn register_via_clone(identity: &RepoIdentity) -> Result<()> {
    let sync_slug = sync_repo_slug(identity);
    let clone_url = format!("https://{}/{}.git", identity.host, sync_slug);

    let temp_dir = TempDir::new().context("Failed to create temporary directory for sync clone")?;
    let clone_path = temp_dir.path().join(SYNC_REPO_NAME);

    git::clone_into(&clone_url, &clone_path)?;

    let config_path = clone_path.join(SYNC_CONFIG_FILE);
    let doc = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {SYNC_CONFIG_FILE} from sync clone"))?;

    match patch_sync_config(&doc, &identity.slug())? {
        Patch::Unchanged => {
            ui::print_info(&format!("{} is already registered for file sync", identity));
        }
        Patch::Updated(patched) => {
            fs::write(&config_path, patched)
                .with_context(|| format!("Failed to write {SYNC_CONFIG_FILE} in sync clone"))?;
            git::add_all(&clone_path)?;
            git::commit(&commit_message(identity), &clone_path)?;
            git::push(&clone_path)?;
            ui::print_success(&format!("✓ Registered {identity} for file sync"));
        }
    }

    Ok(())
}
