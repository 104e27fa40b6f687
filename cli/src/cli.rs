// cli/src/cli.rs
use clap::{Parser, Subcommand};

use repodock_core::types::PathMapping;

#[derive(Debug, Parser)]
#[command(
    name = "repodock",
    about = "Open GitHub repositories, files, and pull requests in a local IDE",
    version
)]
pub struct Args {
    /// Override the service base URL for this invocation
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Settings file path (default: ~/.repodock/settings.json)
    #[arg(long, global = true)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a GitHub repository, directory, file, or pull request URL
    Open {
        url: String,

        /// Jump to a line when opening a file URL
        #[arg(long)]
        line: Option<u32>,
    },

    /// Open the GitHub URL currently on the clipboard
    Clipboard,

    /// Open a pull request by owner/repo and number
    Pr {
        /// Repository as owner/repo, e.g. acme/widgets
        repo: String,
        number: u32,
    },

    /// Check whether the companion service is running
    Status,

    /// Show or edit settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the current settings
    Show,

    /// Update settings (saved even when the service is unreachable)
    Set {
        #[arg(long)]
        service_url: Option<String>,

        #[arg(long)]
        ide: Option<String>,

        /// Path mapping as pattern=localPath; repeat to set several,
        /// order is significant (first match wins)
        #[arg(long = "mapping", value_parser = parse_mapping)]
        mappings: Vec<PathMapping>,
    },

    /// Push the local path mappings into the service's /config
    PushMappings,
}

fn parse_mapping(input: &str) -> Result<PathMapping, String> {
    match input.split_once('=') {
        Some((pattern, local_path)) if !pattern.is_empty() && !local_path.is_empty() => {
            Ok(PathMapping {
                pattern: pattern.to_string(),
                local_path: local_path.to_string(),
            })
        }
        _ => Err(format!("expected pattern=localPath, got {input:?}")),
    }
}
