//! CLI argument parsing module for modup

use crate::executor::{RetryPolicy, DEFAULT_ATTEMPTS, DEFAULT_CONCURRENCY};
use crate::pipeline::PipelineConfig;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Default base delay between query attempts, in milliseconds
const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// Parse duration string in format: Nd (days), Nw (weeks), Nm (months)
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num_str, unit) = if let Some(n) = s.strip_suffix('d') {
        (n, 'd')
    } else if let Some(n) = s.strip_suffix('w') {
        (n, 'w')
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 'm')
    } else {
        return Err(format!("invalid duration format: {}", s));
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in duration: {}", num_str))?;

    let days = match unit {
        'd' => num,
        'w' => num * 7,
        _ => num * 30, // months (30 days)
    };

    Ok(Duration::from_secs(days * 24 * 60 * 60))
}

/// Interactive upgrader for the direct requirements of a Go module
#[derive(Parser, Debug, Clone)]
#[command(
    name = "modup",
    version,
    about = "Interactive upgrader for Go module dependencies"
)]
pub struct CliArgs {
    /// Module directory containing go.mod (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Dry run mode - list available upgrades without prompting or changing go.mod
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Upgrade every available module without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Package filters
    /// Exclude specific modules from the upgrade (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Upgrade only specific modules (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Age filter
    /// Only upgrade to versions released at least this long ago (e.g., 2w, 10d, 1m)
    #[arg(long, value_parser = parse_duration)]
    pub age: Option<Duration>,

    // Resolution options
    /// Maximum number of modules queried at once
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Attempts per module query before giving up
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    pub retries: u32,

    /// Delay before the first retry in milliseconds, doubled on each retry
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay: u64,

    /// Query the module proxy over HTTP instead of `go list` (default: first GOPROXY entry)
    #[arg(long, value_name = "URL", num_args = 0..=1, default_missing_value = "")]
    pub proxy: Option<String>,

    // Output options
    /// Output the outcome in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Retry policy for module queries
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries).with_base_delay(Duration::from_millis(self.retry_delay))
    }

    /// Build the pipeline configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            concurrency: self.concurrency,
            retry: self.retry_policy(),
            min_age: self.age,
            dry_run: self.dry_run,
            only: self.only.clone(),
            exclude: self.exclude.clone(),
        }
    }

    /// Proxy URL to query, if the proxy backend was requested
    ///
    /// `--proxy` without a value falls back to `goproxy_env`.
    pub fn proxy_url(&self, goproxy_env: Option<&str>) -> Option<String> {
        match self.proxy.as_deref() {
            None => None,
            Some("") => Some(crate::query::proxy_url_from_env(goproxy_env)),
            Some(url) => Some(url.to_string()),
        }
    }
}
