use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snyk_report::{Config, CsvExporter, ReportConfig, ReportPipeline, SnykClient};

#[derive(Parser, Debug)]
#[command(name = "snyk-report")]
#[command(version)]
#[command(about = "Export fixable Snyk issues across organizations to CSV")]
struct Args {
    /// Directory the CSV reports are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Organization name to skip (repeatable, replaces SNYK_EXCLUDE_ORGS)
    #[arg(long = "exclude-org")]
    exclude_orgs: Vec<String>,

    /// Project name to skip (repeatable, replaces SNYK_EXCLUDE_PROJECTS)
    #[arg(long = "exclude-project")]
    exclude_projects: Vec<String>,

    /// Snyk API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("snyk_report=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = apply_args(Config::from_env()?, &args);

    println!("Generating Snyk vulnerability report. Please wait...");

    let client = SnykClient::with_base_url(&config.snyk_token, &config.api_url)?;
    let mut report_config = ReportConfig::from(&config);
    report_config.show_progress = !args.quiet;

    let pipeline = ReportPipeline::new(client, report_config);
    let run = pipeline
        .run()
        .await
        .context("Failed to enumerate Snyk organizations and projects")?;

    let generated_at = chrono::Local::now();
    let exporter = CsvExporter::new(&config.output_dir);
    match exporter
        .export(&run.records, &generated_at)
        .context("Failed to write CSV reports")?
    {
        Some(files) => println!(
            "Reports generated successfully:\n1. {}\n2. {}",
            files.unsorted.display(),
            files.sorted.display()
        ),
        None => println!("No fixable issues found across the target organizations."),
    }

    Ok(())
}

fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(ref dir) = args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(ref url) = args.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if !args.exclude_orgs.is_empty() {
        config.excluded_orgs = args.exclude_orgs.clone();
    }
    if !args.exclude_projects.is_empty() {
        config.excluded_projects = args.exclude_projects.clone();
    }
    config
}
