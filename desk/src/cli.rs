// Command-line surface of the `asset-desk` binary.
use clap::{Args, Parser, Subcommand};
use shared::catalog::Resource;
use shared::models::SortDirection;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "asset-desk", version, about = "Browse and maintain asset-maintenance records")]
pub struct Cli {
    /// JSON file merged over the built-in configuration
    #[arg(long, global = true, env = "ASSET_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Preferences file (language, session, saved views)
    #[arg(long, global = true)]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        username: String,
        #[arg(long, env = "ASSET_DESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or change the interface language
    Language { code: Option<String> },
    /// List the known resources
    Resources,
    /// Show one page of a resource table
    List(ListArgs),
    /// Cycle the sort of one column: ascending, descending, off
    Sort { resource: Resource, column: String },
    /// Write the filtered and sorted rows to CSV
    Export {
        resource: Resource,
        /// Directory, or a file ending in .csv
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete rows by id
    Delete {
        resource: Resource,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Attach documents to one row
    Upload {
        resource: Resource,
        id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Deep-merge locale JSON files
    MergeLocales {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Report keys of the first file missing from the others
        #[arg(long)]
        check: bool,
    },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub resource: Resource,

    /// COLUMN=VALUE; an empty value clears that filter
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Drop every saved filter first
    #[arg(long)]
    pub clear_filters: bool,

    /// COLUMN[:asc|desc]
    #[arg(long = "sort", value_parser = parse_sort)]
    pub sorts: Vec<(String, SortDirection)>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,

    #[arg(long)]
    pub per_page: Option<usize>,

    #[arg(long = "show")]
    pub show: Vec<String>,

    #[arg(long = "hide")]
    pub hide: Vec<String>,

    /// Forget the saved view before applying the other options
    #[arg(long)]
    pub reset: bool,

    /// Print the page as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", raw))?;
    let column = column.trim();
    if column.is_empty() {
        return Err("filter column is empty".to_string());
    }
    Ok((column.to_string(), value.to_string()))
}

fn parse_sort(raw: &str) -> Result<(String, SortDirection), String> {
    match raw.split_once(':') {
        Some((column, dir)) if !column.is_empty() => Ok((column.to_string(), dir.parse()?)),
        Some(_) => Err("sort column is empty".to_string()),
        None if raw.is_empty() => Err("sort column is empty".to_string()),
        None => Ok((raw.to_string(), SortDirection::Asc)),
    }
}
