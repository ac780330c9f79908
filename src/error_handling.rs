use crate::ui;
use anyhow::Result;

/// Handle git clone errors with specific recovery guidance
pub fn handle_clone_error(url: &str, stderr: &str) -> Result<()> {
    if stderr.contains("Permission denied") || stderr.contains("publickey") {
        show_ssh_auth_error(url)
    } else if stderr.contains("not found") || stderr.contains("does not exist") {
        show_repo_not_found_error(url)
    } else if stderr.contains("timeout") || stderr.contains("network") {
        show_network_error(url)
    } else {
        show_generic_clone_error(url, stderr)
    }
}

/// Handle git push errors against the sync repository
pub fn handle_push_error(stderr: &str) -> Result<()> {
    if stderr.contains("non-fast-forward") || stderr.contains("fetch first") {
        ui::print_error("Push rejected - the sync repository changed underneath us");
        ui::print_info("Concurrent update detected:");
        ui::print_info("   • Re-run the initializer to pick up the latest sync config");
        anyhow::bail!("Push to sync repository rejected: {}", stderr.trim())
    } else if stderr.contains("Permission denied") || stderr.contains("403") {
        ui::print_error("Not allowed to push to the sync repository");
        ui::print_info("Access issues:");
        ui::print_info("   • Check write access to the sync repository");
        ui::print_info("   • Check auth status: gh auth status");
        anyhow::bail!("No push access to sync repository: {}", stderr.trim())
    } else {
        ui::print_error("Failed to push to the sync repository");
        ui::print_info(&format!("   • Error: {}", stderr.trim()));
        anyhow::bail!("Failed to push to sync repository: {stderr}")
    }
}

fn show_ssh_auth_error(url: &str) -> Result<()> {
    ui::print_error(&format!("SSH authentication failed for {url}"));
    ui::print_info("SSH key issues detected:");
    ui::print_info("   • Test SSH connection: ssh -T git@github.com");
    ui::print_info("   • Add SSH key to GitHub: gh auth refresh -h github.com -s admin:public_key");
    anyhow::bail!("SSH authentication failed for '{url}'")
}

fn show_repo_not_found_error(url: &str) -> Result<()> {
    ui::print_error(&format!("Repository not found: {url}"));
    ui::print_info("Repository access issues:");
    ui::print_info("   • Verify the sync repository exists for this owner");
    ui::print_info("   • Ensure you have access to this repository");
    anyhow::bail!("Repository '{url}' not found or inaccessible")
}

fn show_network_error(url: &str) -> Result<()> {
    ui::print_error(&format!("Network timeout cloning {url}"));
    ui::print_info("Network issues detected:");
    ui::print_info("   • Check internet connection");
    ui::print_info("   • Try again in a few moments");
    anyhow::bail!("Network timeout cloning '{url}'")
}

fn show_generic_clone_error(url: &str, stderr: &str) -> Result<()> {
    ui::print_error(&format!("Failed to clone {url}"));
    ui::print_info("Git clone failed:");
    ui::print_info(&format!("   • Error: {}", stderr.trim()));
    ui::print_info("   • Check repository URL and permissions");
    anyhow::bail!("Failed to clone '{url}': {stderr}")
}
