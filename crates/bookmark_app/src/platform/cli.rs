use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "bookmark-audit")]
#[command(about = "Find duplicate and dead bookmarks in a browser bookmarks file")]
#[command(version)]
pub struct Cli {
    /// Chromium-style `Bookmarks` JSON file
    #[arg(long, global = true, value_name = "FILE", default_value = "Bookmarks")]
    pub bookmarks: PathBuf,

    /// Settings file (created on first save)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = "bookmark-audit.json"
    )]
    pub settings: PathBuf,

    /// Where log output goes
    #[arg(long, global = true, value_name = "WHERE", default_value = "terminal")]
    pub log: LogDestination,

    /// Log debug details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List folders with their ids, for use with --folder
    Folders,

    /// Group bookmarks that share a URL (or a host)
    Duplicates {
        /// Group by host name instead of the full URL
        #[arg(long)]
        by_domain: bool,

        /// Only look inside these folders (repeatable)
        #[arg(long = "folder", value_name = "ID")]
        folders: Vec<String>,
    },

    /// Probe every bookmark and group the ones that fail
    DeadLinks {
        /// Only look inside these folders (repeatable)
        #[arg(long = "folder", value_name = "ID")]
        folders: Vec<String>,

        /// Subtrees checked at the same time, for this run only
        #[arg(long, value_name = "N")]
        max_requests: Option<u32>,

        /// Per-request timeout in seconds, for this run only
        #[arg(long, value_name = "SECS")]
        timeout: Option<u32>,
    },

    /// Delete bookmarks or empty folders by id
    Remove {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },

    /// Show settings, or change and save them
    Settings {
        #[arg(long, value_name = "N")]
        max_requests: Option<u32>,

        #[arg(long, value_name = "SECS")]
        timeout: Option<u32>,

        #[arg(long, value_name = "BOOL")]
        by_domain: Option<bool>,
    },
}
