mod cli;
mod settings;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tunesweep::{FileLogWriter, HttpTransport, Sweep, SweepConfig, SweepReport};

use crate::cli::{Cli, Command, SweepArgs};
use crate::settings::Settings;

const DEFAULT_LOG_FILTER: &str = "tunesweep=info,tunesweep_core=info,tunesweep_llm=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(&args).await,
        Command::Plan(args) => plan(&args),
    }
}

// stdout carries only the dry-run body and summaries
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SweepArgs) -> anyhow::Result<SweepConfig> {
    Settings::resolve(args)?
        .into_config()
        .context("invalid sweep configuration")
}

async fn run(args: &SweepArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let transport = HttpTransport::from_config(&config)?;
    let writer = FileLogWriter::new(config.log_root());
    let sweep = Sweep::new(config, transport, writer);

    match sweep.run().await.context("sweep aborted")? {
        SweepReport::DryRun { request } => {
            println!("{}", request.body);
        }
        SweepReport::Completed(stats) => {
            let knob_dir = sweep
                .log_writer()
                .root()
                .join(sweep.config().title())
                .join(&sweep.config().knob().name);
            println!(
                "{} responses logged to {} ({} skipped, {} failed log writes)",
                stats.entries,
                knob_dir.display(),
                stats.skipped,
                stats.failed_writes
            );
            if stats.failed_writes > 0 {
                tracing::warn!(
                    failed_writes = stats.failed_writes,
                    "some log blocks were not written; entries may be incomplete"
                );
            }
        }
    }
    Ok(())
}

fn plan(args: &SweepArgs) -> anyhow::Result<()> {
    // nothing is sent, so no credential is needed
    let mut settings = Settings::resolve(args)?;
    settings.dry_run = Some(true);
    let config = settings
        .into_config()
        .context("invalid sweep configuration")?;

    println!("endpoint: {}", config.endpoint().url());
    let mut total = 0;
    for batch in tunesweep::plan(&config) {
        let values: Vec<String> = batch.values.iter().map(ToString::to_string).collect();
        total += values.len();
        println!(
            "{}: {}",
            config.log_root().join(batch.target.relative_path()).display(),
            values.join(", ")
        );
    }
    println!("{total} requests");
    Ok(())
}
