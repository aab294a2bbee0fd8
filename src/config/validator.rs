//! Configuration validation

use super::*;
use anyhow::Result;
use tracing::warn;

/// Largest term count for which every index is exact in an `f64`
const MAX_EXACT_TERMS: u64 = 1 << 53;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workers(&config.workers)?;
    validate_workload(&config.workload)?;
    validate_runtime(&config.runtime)?;

    Ok(())
}

/// Validate worker pool configuration
pub fn validate_workers(workers: &WorkerConfig) -> Result<()> {
    if workers.pool_size == 0 {
        anyhow::bail!("pool_size must be greater than 0");
    }

    Ok(())
}

/// Validate workload configuration
pub fn validate_workload(workload: &WorkloadConfig) -> Result<()> {
    if workload.total_units == 0 {
        anyhow::bail!("total_units must be greater than 0");
    }

    // 2i + 1 over the last index must stay representable
    let terms = match workload.terms() {
        Some(terms) if terms <= u64::MAX / 2 => terms,
        _ => anyhow::bail!(
            "total_units ({}) * unit_size ({}) exceeds the supported term count",
            workload.total_units,
            workload.unit_size
        ),
    };

    if terms > MAX_EXACT_TERMS {
        warn!(
            terms,
            "term count exceeds 2^53, indices are no longer exact in f64"
        );
    }

    Ok(())
}

/// Validate runtime configuration
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.threads == Some(0) {
        anyhow::bail!("threads must be greater than 0");
    }

    Ok(())
}
