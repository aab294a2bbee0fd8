//! pisum CLI entry point

use anyhow::{Context, Result};
use pisum::config::cli::Cli;
use pisum::config::{toml, validator, Config};
use pisum::output::json::JsonReporter;
use pisum::output::text::TextReporter;
use pisum::sink::Reporter;
use pisum::Calculation;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    let config = toml::load_config(&cli).context("Failed to load configuration")?;
    init_logging(config.runtime.debug);

    validator::validate_config(&config).context("Configuration validation failed")?;

    println!("pisum v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("{}", config);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }
    println!();

    run(&config)
}

/// Install the tracing subscriber on stderr; `RUST_LOG` takes precedence
fn init_logging(debug: bool) {
    let directive = if debug { "pisum=debug" } else { "pisum=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the runtime and run one calculation on it
fn run(config: &Config) -> Result<()> {
    let calculation = Calculation::try_from(config)?;
    let reporter = build_reporter(config, &calculation);

    let threads = config.runtime.effective_threads();
    debug!(threads, "building runtime");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .thread_name("pisum-worker")
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let result = runtime
        .block_on(pisum::calculate(calculation, reporter))
        .context("Calculation failed")?;

    info!(value = result.value, "done");
    Ok(())
}

fn build_reporter(config: &Config, calculation: &Calculation) -> Vec<Box<dyn Reporter>> {
    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();

    if !config.output.quiet {
        reporters.push(Box::new(TextReporter::stdout().with_terms(calculation.terms())));
    }
    if let Some(ref path) = config.output.json_output {
        reporters.push(Box::new(JsonReporter::new(path, *calculation)));
    }

    reporters
}
