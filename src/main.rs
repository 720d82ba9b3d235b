//! pagelist - Entry Point

use clap::Parser;
use pagelist::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    CliOverrides,
};
use pagelist::view::AppSettings;
use std::path::PathBuf;
use tracing::info;

/// pagelist - page through a JSON Lines file, live
#[derive(Parser, Debug)]
#[command(name = "pagelist")]
#[command(version)]
#[command(about = "Browse a JSON Lines file as an incrementally loaded, auto-refreshing list")]
pub struct Args {
    /// Path to the JSON Lines file
    pub file: PathBuf,

    /// Items fetched per page (must be positive)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Auto-refresh interval in seconds (0 disables)
    #[arg(short, long)]
    pub refresh: Option<u64>,

    /// Record field used as the unique key
    #[arg(short, long)]
    pub key_field: Option<String>,

    /// Record field shown next to the key
    #[arg(short, long)]
    pub summary_field: Option<String>,

    /// Start with this filter applied
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            page_size: self.page_size.and_then(|n| usize::try_from(n).ok()),
            auto_refresh_secs: self.refresh,
            key_field: self.key_field.clone(),
            summary_field: self.summary_field.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = load_config_with_precedence(args.config.clone())?;
        let merged = merge_config(config_file);
        let with_env = apply_env_overrides(merged)?;
        apply_cli_overrides(with_env, args.overrides())
    };

    pagelist::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        file = %args.file.display(),
        "Configuration loaded and resolved"
    );

    let settings = AppSettings {
        list: config.list_config()?,
        key_field: config.key_field,
        summary_field: config.summary_field,
        initial_filter: args.filter,
    };

    pagelist::view::run(args.file, settings)?;

    Ok(())
}
