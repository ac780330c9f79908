use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::RepoIdentity;

/// Render the README for a freshly initialized repository.
///
/// The release instructions only apply to packages that publish, so they
/// are omitted for private repositories.
#[must_use]
pub fn render(identity: &RepoIdentity, private: bool) -> String {
    let name = &identity.name;

    let mut readme = format!(
        "# {name}\n\
         \n\
         {name} (created from the project template)\n\
         \n\
         ## Getting started\n\
         \n\
         ```sh\n\
         npm install\n\
         npm test\n\
         ```\n\
         \n\
         ## Synced files\n\
         \n\
         CI workflows and shared configuration in this repository are managed\n\
         centrally and updated by the file sync automation. Do not edit them here.\n"
    );

    if !private {
        readme.push_str(
            "\n\
             ## Releasing\n\
             \n\
             1. Bump the version in `package.json`.\n\
             2. Open a pull request and merge it once checks pass.\n\
             3. Tag the merge commit: `git tag v<version> && git push --tags`.\n\
             4. CI publishes the package using the `NPM_TOKEN` secret.\n",
        );
    }

    readme
}

/// Overwrite the README on disk
pub fn write(path: &Path, identity: &RepoIdentity, private: bool) -> Result<()> {
    fs::write(path, render(identity, private))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
