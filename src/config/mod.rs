//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of workers behind the round-robin distributor
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_pool_size() -> usize {
    8
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
        }
    }
}

/// Workload partitioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Number of work units dispatched
    #[serde(default = "default_total_units")]
    pub total_units: u64,
    /// Series terms per work unit
    #[serde(default = "default_unit_size")]
    pub unit_size: u64,
}

fn default_total_units() -> u64 {
    10_000
}

fn default_unit_size() -> u64 {
    10_000
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            total_units: default_total_units(),
            unit_size: default_unit_size(),
        }
    }
}

impl WorkloadConfig {
    /// Total number of series terms, `None` on overflow
    pub fn terms(&self) -> Option<u64> {
        self.total_units.checked_mul(self.unit_size)
    }
}

/// Execution substrate configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Runtime worker threads (defaults to the number of CPUs)
    pub threads: Option<usize>,
    /// Validate and print the configuration without computing
    #[serde(default)]
    pub dry_run: bool,
    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

impl RuntimeConfig {
    /// Thread count the runtime is built with
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report file path
    pub json_output: Option<PathBuf>,
    /// Suppress the text report
    #[serde(default)]
    pub quiet: bool,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Workers:")?;
        writeln!(f, "    Pool size: {}", self.workers.pool_size)?;
        writeln!(f, "  Workload:")?;
        writeln!(f, "    Total units: {}", self.workload.total_units)?;
        writeln!(f, "    Unit size: {}", self.workload.unit_size)?;
        match self.workload.terms() {
            Some(terms) => writeln!(f, "    Terms: {}", terms)?,
            None => writeln!(f, "    Terms: overflow")?,
        }
        writeln!(f, "  Runtime:")?;
        write!(f, "    Threads: {}", self.runtime.effective_threads())?;
        if let Some(ref path) = self.output.json_output {
            writeln!(f)?;
            writeln!(f, "  Output:")?;
            write!(f, "    JSON: {}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = Config::default();
        assert_eq!(config.workers.pool_size, 8);
        assert_eq!(config.workload.total_units, 10_000);
        assert_eq!(config.workload.unit_size, 10_000);
        assert_eq!(config.workload.terms(), Some(100_000_000));
        assert!(config.output.json_output.is_none());
    }

    #[test]
    fn test_terms_overflow() {
        let workload = WorkloadConfig {
            total_units: u64::MAX,
            unit_size: 2,
        };
        assert_eq!(workload.terms(), None);
    }

    #[test]
    fn test_effective_threads() {
        let runtime = RuntimeConfig {
            threads: Some(3),
            ..Default::default()
        };
        assert_eq!(runtime.effective_threads(), 3);
        assert!(RuntimeConfig::default().effective_threads() >= 1);
    }

    #[test]
    fn test_display() {
        let text = Config::default().to_string();
        assert!(text.contains("Pool size: 8"));
        assert!(text.contains("Terms: 100000000"));
    }
}
