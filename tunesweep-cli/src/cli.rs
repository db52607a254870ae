use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tunesweep",
    version,
    about = "Sweep a sampling parameter against a text-generation endpoint and log every response"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one request per batch and knob value, appending responses to the logs
    Run(SweepArgs),
    /// Print the log files and knob values a run would produce, without sending anything
    Plan(SweepArgs),
}

/// Flags override values from the settings file.
#[derive(Debug, Default, Args)]
pub struct SweepArgs {
    /// YAML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bearer token for the endpoint (falls back to OPENAI_API_KEY)
    #[arg(long, env = "TUNESWEEP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Print the first request body and stop before sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Endpoint selector: 1/chat or 2/edit
    #[arg(short, long, value_name = "SELECTOR")]
    pub endpoint: Option<String>,

    /// Request parameter to sweep, e.g. temperature or top_p
    #[arg(long)]
    pub knob: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    #[arg(long)]
    pub increment: Option<f64>,

    /// Number of log files, each receiving a full pass over the knob range
    #[arg(short, long)]
    pub batches: Option<u32>,

    #[arg(long)]
    pub prompt: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Directory name grouping this run's logs
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_name = "DIR")]
    pub log_root: Option<PathBuf>,

    /// What to do with an unparseable response: abort or skip
    #[arg(long, value_name = "POLICY")]
    pub on_parse_error: Option<String>,

    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}
