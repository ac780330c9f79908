use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;

/// Identity of the repository being initialized, derived from the URL of
/// its `origin` remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub name: String,
    pub owner: String,
    pub host: String,
}

impl RepoIdentity {
    /// Parse a git remote URL into a repository identity.
    ///
    /// Accepts the SSH (`git@host:owner/repo.git`) and HTTPS
    /// (`https://host/owner/repo[.git]`) shapes. Anything else is a
    /// configuration error: both the package-name match and the
    /// owner/repo match fail explicitly.
    pub fn from_remote_url(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');

        let name_pattern = Regex::new(r"([^/:]+?)(?:\.git)?$").expect("valid pattern");
        let caps = name_pattern.captures(trimmed).with_context(|| {
            format!("Cannot derive a package name from remote URL '{url}'")
        })?;
        let name = caps[1].to_string();

        let segments_pattern = Regex::new(
            r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?(?:[^@/\s]+@)?(?P<host>[^:/\s]+)[:/](?P<owner>[^/\s]+)/(?P<repo>[^/\s]+?)(?:\.git)?$",
        )
        .expect("valid pattern");
        let caps = segments_pattern.captures(trimmed).with_context(|| {
            format!("Cannot derive owner and repository from remote URL '{url}'")
        })?;

        Ok(Self {
            name,
            owner: caps["owner"].to_string(),
            host: caps["host"].to_string(),
        })
    }

    /// `owner/repo` form used in API paths and sync-config entries
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Canonical HTTPS clone URL recorded in the manifest
    #[must_use]
    pub fn https_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.owner, self.name)
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
