use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::models::RepoIdentity;

/// The package manifest rewritten during initialization
pub const MANIFEST_FILE: &str = "package.json";

/// Read the manifest, rewrite its identity fields, and write it back.
pub fn update(path: &Path, identity: &RepoIdentity, private: bool) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

    let mut manifest: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in manifest: {}", path.display()))?;

    apply(&mut manifest, identity, private)?;

    let mut out = serde_json::to_string_pretty(&manifest)?;
    out.push('\n');
    fs::write(path, out)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

    Ok(())
}

/// Rewrite `name`, `description` and `repository.url`, and add
/// `"private": true` when requested. Every other field is left untouched.
pub fn apply(manifest: &mut Value, identity: &RepoIdentity, private: bool) -> Result<()> {
    let fields = manifest
        .as_object_mut()
        .context("Manifest root is not a JSON object")?;

    fields.insert("name".to_string(), json!(identity.name));
    fields.insert(
        "description".to_string(),
        json!(format!("{} (created from the project template)", identity.name)),
    );

    match fields.get_mut("repository").and_then(Value::as_object_mut) {
        Some(repository) => {
            repository.insert("url".to_string(), json!(identity.https_url()));
        }
        None => {
            fields.insert(
                "repository".to_string(),
                json!({ "type": "git", "url": identity.https_url() }),
            );
        }
    }

    if private {
        fields.insert("private".to_string(), json!(true));
    }

    Ok(())
}
