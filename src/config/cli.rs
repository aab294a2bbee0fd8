//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// pisum - Leibniz-series pi approximation over a round-robin worker pool
#[derive(Parser, Debug, Default)]
#[command(name = "pisum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI options take precedence)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === Workload Options ===
    /// Number of workers in the pool [default: 8]
    #[arg(short = 'w', long, env = "PISUM_POOL_SIZE")]
    pub pool_size: Option<usize>,

    /// Number of work units to dispatch [default: 10000]
    #[arg(short = 'n', long)]
    pub total_units: Option<u64>,

    /// Series terms per work unit [default: 10000]
    #[arg(short = 'e', long)]
    pub unit_size: Option<u64>,

    // === Runtime Options ===
    /// Runtime worker threads [default: number of CPUs]
    #[arg(short = 't', long, env = "PISUM_THREADS")]
    pub threads: Option<usize>,

    /// Validate configuration and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    // === Output Options ===
    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Suppress the text report
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pool_size == Some(0) {
            anyhow::bail!("pool_size must be at least 1");
        }

        if self.total_units == Some(0) {
            anyhow::bail!("total_units must be at least 1");
        }

        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }

        Ok(())
    }
}
