//! Human-readable text output

use crate::message::FinalResult;
use crate::sink::Reporter;
use crate::util::time::{format_duration, format_rate, terms_per_second};
use std::io::{self, Write};

/// Write the final result block to `out`
///
/// Shows the approximation, calculation time, distance from
/// `std::f64::consts::PI` and, when the term count is known, throughput.
pub fn write_results<W: Write>(out: &mut W, result: &FinalResult, terms: Option<u64>) -> io::Result<()> {
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    writeln!(out, "                    PI APPROXIMATION")?;
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(out, "  Pi approximation:   {}", result.value)?;
    writeln!(out, "  Calculation time:   {}", format_duration(result.elapsed))?;
    writeln!(out, "  Error:              {:e}", result.value - std::f64::consts::PI)?;

    if let Some(terms) = terms {
        writeln!(
            out,
            "  Throughput:         {} terms/s",
            format_rate(terms_per_second(terms, result.elapsed))
        )?;
    }

    writeln!(out)?;
    Ok(())
}

/// Reporter printing [`write_results`] to a writer (stdout by default)
pub struct TextReporter<W: Write + Send + 'static> {
    out: W,
    terms: Option<u64>,
}

impl TextReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, terms: None }
    }

    /// Include term throughput in the report
    pub fn with_terms(mut self, terms: u64) -> Self {
        self.terms = Some(terms);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> Reporter for TextReporter<W> {
    fn report(&mut self, result: &FinalResult) -> anyhow::Result<()> {
        write_results(&mut self.out, result, self.terms)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_write_results() {
        let mut out = Vec::new();
        let result = FinalResult {
            value: 3.0,
            elapsed: Duration::from_millis(1500),
        };
        write_results(&mut out, &result, Some(3000)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pi approximation:   3"));
        assert!(text.contains("Calculation time:   1.50s"));
        assert!(text.contains("Throughput:         2.00K terms/s"));
    }

    #[test]
    fn test_reporter_without_terms() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter
            .report(&FinalResult { value: 4.0, elapsed: Duration::from_micros(20) })
            .unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("Pi approximation:   4"));
        assert!(text.contains("20.00us"));
        assert!(!text.contains("Throughput"));
    }
}
