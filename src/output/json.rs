//! JSON output formatting
//!
//! Serializes the final result together with the parameters that produced it,
//! so runs can be compared after the fact.

use crate::message::FinalResult;
use crate::sink::Reporter;
use crate::system::Calculation;
use crate::util::time::format_duration;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Parameters of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonParameters {
    pub pool_size: usize,
    pub total_units: u64,
    pub unit_size: u64,
    pub terms: u64,
}

/// Complete JSON report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    pub pi: f64,
    /// `pi - std::f64::consts::PI`
    pub error: f64,
    pub elapsed: JsonDuration,
    pub parameters: JsonParameters,
    /// RFC 3339 timestamp of report generation
    pub generated_at: String,
}

impl JsonReport {
    pub fn new(result: &FinalResult, calculation: &Calculation) -> Self {
        Self {
            pi: result.value,
            error: result.value - std::f64::consts::PI,
            elapsed: JsonDuration::from_duration(result.elapsed),
            parameters: JsonParameters {
                pool_size: calculation.pool_size.get(),
                total_units: calculation.total_units,
                unit_size: calculation.unit_size,
                terms: calculation.terms(),
            },
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Write a report to `output_path`
pub fn write_json_output(output_path: &Path, report: &JsonReport, pretty: bool) -> anyhow::Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;

    if pretty {
        serde_json::to_writer_pretty(file, report)?;
    } else {
        serde_json::to_writer(file, report)?;
    }

    Ok(())
}

/// Reporter writing a [`JsonReport`] file
#[derive(Debug)]
pub struct JsonReporter {
    path: PathBuf,
    calculation: Calculation,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>, calculation: Calculation) -> Self {
        Self {
            path: path.into(),
            calculation,
        }
    }
}

impl Reporter for JsonReporter {
    fn report(&mut self, result: &FinalResult) -> anyhow::Result<()> {
        let report = JsonReport::new(result, &self.calculation);
        write_json_output(&self.path, &report, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculation() -> Calculation {
        Calculation::new(4, 4, 1000).unwrap()
    }

    #[test]
    fn test_report_fields() {
        let result = FinalResult {
            value: 3.0,
            elapsed: Duration::from_micros(2500),
        };
        let report = JsonReport::new(&result, &calculation());

        assert_eq!(report.pi, 3.0);
        assert!((report.error - (3.0 - std::f64::consts::PI)).abs() < 1e-15);
        assert_eq!(report.elapsed.micros, 2500);
        assert_eq!(report.elapsed.human, "2.50ms");
        assert_eq!(report.parameters.terms, 4000);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_reporter_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pi.json");
        let mut reporter = JsonReporter::new(&path, calculation());

        reporter
            .report(&FinalResult { value: 3.1, elapsed: Duration::from_millis(1) })
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let report: JsonReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(report.pi, 3.1);
        assert_eq!(report.parameters.pool_size, 4);
    }

    #[test]
    fn test_reporter_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut reporter = JsonReporter::new(dir.path().join("missing/pi.json"), calculation());

        let err = reporter
            .report(&FinalResult { value: 3.1, elapsed: Duration::ZERO })
            .unwrap_err();
        assert!(err.to_string().contains("Failed to create JSON output"));
    }
}
