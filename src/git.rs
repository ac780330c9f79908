use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Output};

use crate::error_handling;

/// Run a git command and return the output
pub fn run_git_command(args: &[&str], working_dir: Option<&Path>) -> Result<Output> {
    let mut cmd = Command::new("git");
    cmd.args(args);

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .with_context(|| format!("Failed to execute git command: git {}", args.join(" ")))?;

    Ok(output)
}

/// Run a git command and return stdout as string
pub fn run_git_command_string(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let output = run_git_command(args, cwd)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
    }

    Ok(String::from_utf8(output.stdout)
        .context("Git command output is not valid UTF-8")?
        .trim()
        .to_string())
}

/// Check if git is available on the system
pub fn check_git_availability() -> Result<()> {
    Command::new("git").args(["--version"]).output().context(
        "Git is not installed or not available in PATH. Please install git and try again.",
    )?;
    Ok(())
}

/// Read the URL of the `origin` remote in the current repository
pub fn origin_url() -> Result<String> {
    let url = run_git_command_string(&["remote", "get-url", "origin"], None)
        .context("Failed to read the 'origin' remote URL. Is this a git repository?")?;

    if url.is_empty() {
        anyhow::bail!("The 'origin' remote has no URL configured");
    }

    Ok(url)
}

/// Clone a repository into a specific destination directory
pub fn clone_into(url: &str, dest: &Path) -> Result<()> {
    let dest_str = dest.to_string_lossy();
    let output = run_git_command(&["clone", url, &dest_str], None)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error_handling::handle_clone_error(url, &stderr)?;
    }

    Ok(())
}

/// Add all changes to staging
pub fn add_all(cwd: &Path) -> Result<()> {
    run_git_command_string(&["add", "."], Some(cwd))?;
    Ok(())
}

/// Commit changes with a message
pub fn commit(message: &str, cwd: &Path) -> Result<()> {
    run_git_command_string(&["commit", "-m", message], Some(cwd))?;
    Ok(())
}

/// Push to remote
pub fn push(cwd: &Path) -> Result<()> {
    let output = run_git_command(&["push"], Some(cwd))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error_handling::handle_push_error(&stderr)?;
    }

    Ok(())
}
