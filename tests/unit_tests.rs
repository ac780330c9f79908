use sprout::manifest;
use sprout::models::RepoIdentity;
use sprout::readme;
use sprout::sync::{self, Patch};

#[test]
fn test_identity_from_https_url() {
    let identity = RepoIdentity::from_remote_url("https://github.com/acme/widget.git").unwrap();

    assert_eq!(identity.name, "widget");
    assert_eq!(identity.owner, "acme");
    assert_eq!(identity.host, "github.com");
    assert_eq!(identity.slug(), "acme/widget");
    assert_eq!(identity.https_url(), "https://github.com/acme/widget.git");
}

#[test]
fn test_identity_from_ssh_url() {
    let identity = RepoIdentity::from_remote_url("git@github.com:acme/widget.git").unwrap();

    assert_eq!(identity.name, "widget");
    assert_eq!(identity.owner, "acme");
    assert_eq!(identity.host, "github.com");
}

#[test]
fn test_identity_without_git_suffix() {
    let identity = RepoIdentity::from_remote_url("https://github.com/acme/widget").unwrap();
    assert_eq!(identity.name, "widget");

    let identity = RepoIdentity::from_remote_url("https://github.com/acme/widget/").unwrap();
    assert_eq!(identity.name, "widget");
}

#[test]
fn test_identity_rejects_malformed_urls() {
    assert!(RepoIdentity::from_remote_url("").is_err());
    assert!(RepoIdentity::from_remote_url("not-a-url").is_err());
    assert!(RepoIdentity::from_remote_url("git@github.com:").is_err());
}

fn widget_identity() -> RepoIdentity {
    RepoIdentity::from_remote_url("git@github.com:acme/widget.git").unwrap()
}

const MANIFEST_INPUT: &str = r#"{
  "name": "template",
  "version": "0.3.1",
  "description": "The template project",
  "scripts": {
    "test": "jest"
  },
  "repository": {
    "type": "git",
    "url": "https://github.com/acme/template.git"
  },
  "dependencies": {
    "left-pad": "^1.3.0"
  }
}"#;

#[test]
fn test_manifest_rewrites_identity_fields() {
    let mut manifest: serde_json::Value = serde_json::from_str(MANIFEST_INPUT).unwrap();
    manifest::apply(&mut manifest, &widget_identity(), false).unwrap();

    assert_eq!(manifest["name"], "widget");
    assert_eq!(
        manifest["description"],
        "widget (created from the project template)"
    );
    assert_eq!(
        manifest["repository"]["url"],
        "https://github.com/acme/widget.git"
    );
    // visibility flag unset: no private field is added
    assert!(manifest.get("private").is_none());
}

#[test]
fn test_manifest_preserves_other_fields_and_order() {
    let original: serde_json::Value = serde_json::from_str(MANIFEST_INPUT).unwrap();
    let mut updated = original.clone();
    manifest::apply(&mut updated, &widget_identity(), false).unwrap();

    let original_fields = original.as_object().unwrap();
    let updated_fields = updated.as_object().unwrap();

    let original_keys: Vec<&String> = original_fields.keys().collect();
    let updated_keys: Vec<&String> = updated_fields.keys().collect();
    assert_eq!(original_keys, updated_keys);

    for (key, value) in original_fields {
        if key == "name" || key == "description" || key == "repository" {
            continue;
        }
        assert_eq!(updated_fields[key], *value, "field '{key}' was modified");
    }

    assert_eq!(updated["repository"]["type"], "git");
}

#[test]
fn test_manifest_private_flag() {
    let mut manifest: serde_json::Value = serde_json::from_str(MANIFEST_INPUT).unwrap();
    manifest::apply(&mut manifest, &widget_identity(), true).unwrap();
    assert_eq!(manifest["private"], true);
}

#[test]
fn test_manifest_creates_missing_repository_field() {
    let mut manifest = serde_json::json!({ "name": "template", "version": "1.0.0" });
    manifest::apply(&mut manifest, &widget_identity(), false).unwrap();

    assert_eq!(manifest["repository"]["type"], "git");
    assert_eq!(
        manifest["repository"]["url"],
        "https://github.com/acme/widget.git"
    );
}

#[test]
fn test_manifest_rejects_non_object_root() {
    let mut manifest = serde_json::json!(["not", "an", "object"]);
    assert!(manifest::apply(&mut manifest, &widget_identity(), false).is_err());
}

#[test]
fn test_manifest_update_on_disk() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("package.json");
    std::fs::write(&path, MANIFEST_INPUT).unwrap();

    manifest::update(&path, &widget_identity(), true).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.ends_with('\n'));

    let manifest: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(manifest["name"], "widget");
    assert_eq!(manifest["version"], "0.3.1");
    assert_eq!(manifest["private"], true);
}

const SYNC_CONFIG: &str = "\
group:
  - files:
      - source: workflows/ci.yml
        dest: .github/workflows/ci.yml
    repos: |
      # template-workflows
      acme/service-a
      acme/service-b
  - files:
      - source: configs/lint.json
        dest: lint.json
    repos: |
      # template-configs
      acme/service-a
";

#[test]
fn test_sync_patch_inserts_after_both_sentinels() {
    let Patch::Updated(patched) = sync::patch_sync_config(SYNC_CONFIG, "acme/widget").unwrap()
    else {
        panic!("expected an updated document");
    };

    let expected = "\
group:
  - files:
      - source: workflows/ci.yml
        dest: .github/workflows/ci.yml
    repos: |
      # template-workflows
      acme/widget
      acme/service-a
      acme/service-b
  - files:
      - source: configs/lint.json
        dest: lint.json
    repos: |
      # template-configs
      acme/widget
      acme/service-a
";
    assert_eq!(patched, expected);
}

#[test]
fn test_sync_patch_is_idempotent() {
    let Patch::Updated(patched) = sync::patch_sync_config(SYNC_CONFIG, "acme/widget").unwrap()
    else {
        panic!("expected an updated document");
    };

    let second = sync::patch_sync_config(&patched, "acme/widget").unwrap();
    assert_eq!(second, Patch::Unchanged);
}

#[test]
fn test_sync_patch_skips_already_registered_entry() {
    let result = sync::patch_sync_config(SYNC_CONFIG, "acme/service-a").unwrap();
    assert_eq!(result, Patch::Unchanged);
}

#[test]
fn test_sync_patch_fails_on_missing_sentinel() {
    let doc = "group:\n  - repos: |\n      # template-workflows\n";
    let err = sync::patch_sync_config(doc, "acme/widget").unwrap_err();
    assert!(err.to_string().contains("# template-configs"));
}

#[test]
fn test_sync_patch_preserves_surrounding_document() {
    let doc = format!("# header comment\n{SYNC_CONFIG}# trailing comment\n");
    let Patch::Updated(patched) = sync::patch_sync_config(&doc, "acme/widget").unwrap() else {
        panic!("expected an updated document");
    };

    assert!(patched.starts_with("# header comment\n"));
    assert!(patched.ends_with("# trailing comment\n"));
    // exactly the two entry lines were added
    assert_eq!(patched.lines().count(), doc.lines().count() + 2);
}

#[test]
fn test_readme_includes_release_instructions_when_public() {
    let readme = readme::render(&widget_identity(), false);

    assert!(readme.starts_with("# widget\n"));
    assert!(readme.contains("## Releasing"));
    assert!(readme.contains("NPM_TOKEN"));
}

#[test]
fn test_readme_omits_release_instructions_when_private() {
    let readme = readme::render(&widget_identity(), true);

    assert!(readme.starts_with("# widget\n"));
    assert!(!readme.contains("## Releasing"));
    assert!(!readme.contains("NPM_TOKEN"));
}
