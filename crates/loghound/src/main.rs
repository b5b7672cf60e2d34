use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loghound::catalog::Catalog;
use loghound::cli::Cli;
use loghound::conf::ScanConfig;
use loghound::pipeline::Pipeline;
use loghound::report::Reporter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    run(cli).await
}

/// Initialise the tracing / logging subsystem. Diagnostics go to stderr so
/// stdout stays clean for the report.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loghound=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ScanConfig::load(cli.config.as_deref())?;
    let catalog = Arc::new(Catalog::compile(&config)?);
    info!(
        shapes = catalog.shapes.len(),
        signatures = catalog.signatures.len(),
        "catalog compiled"
    );

    let mut pipeline = Pipeline::new(Arc::clone(&catalog));
    let outcome = pipeline.run(cli.inputs()).await?;

    if !outcome.skipped.is_empty() {
        warn!(skipped = outcome.skipped.len(), "some sources could not be scanned");
    }
    info!(identities = outcome.tally.len(), "scan complete");

    let reporter = Reporter::new(cli.format);
    match &cli.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            reporter.write(&outcome.tally, &mut file)?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            reporter.write(&outcome.tally, &mut lock)?;
            lock.flush()?;
        }
    }

    Ok(())
}
