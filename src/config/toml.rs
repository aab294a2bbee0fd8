//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(pool_size) = cli.pool_size {
        config.workers.pool_size = pool_size;
    }
    if let Some(total_units) = cli.total_units {
        config.workload.total_units = total_units;
    }
    if let Some(unit_size) = cli.unit_size {
        config.workload.unit_size = unit_size;
    }

    if cli.threads.is_some() {
        config.runtime.threads = cli.threads;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    if cli.json_output.is_some() {
        config.output.json_output = cli.json_output.clone();
    }
    if cli.quiet {
        config.output.quiet = true;
    }

    config
}

/// Build the effective configuration: TOML file (if any) overlaid with CLI options
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    Ok(merge_cli_with_config(cli, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_toml_basic() {
        let toml = r#"
[workers]
pool_size = 4

[workload]
total_units = 4
unit_size = 1000

[runtime]
threads = 2

[output]
json_output = "/tmp/pi.json"
"#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.workers.pool_size, 4);
        assert_eq!(config.workload.total_units, 4);
        assert_eq!(config.workload.unit_size, 1000);
        assert_eq!(config.runtime.threads, Some(2));
        assert_eq!(config.output.json_output, Some(PathBuf::from("/tmp/pi.json")));
        assert!(!config.output.quiet);
    }

    #[test]
    fn test_parse_toml_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config, Config::default());

        let config = parse_toml_string("[workload]\nunit_size = 10\n").unwrap();
        assert_eq!(config.workload.total_units, 10_000);
        assert_eq!(config.workload.unit_size, 10);
        assert_eq!(config.workers.pool_size, 8);
    }

    #[test]
    fn test_parse_toml_invalid() {
        assert!(parse_toml_string("[workload]\ntotal_units = -1\n").is_err());
        assert!(parse_toml_string("[workers\n").is_err());
    }

    #[test]
    fn test_parse_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[workers]\npool_size = 3").unwrap();

        let config = parse_toml_file(file.path()).unwrap();
        assert_eq!(config.workers.pool_size, 3);
    }

    #[test]
    fn test_parse_toml_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_toml_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = parse_toml_string("[workers]\npool_size = 3\n[workload]\ntotal_units = 50\n").unwrap();
        let cli = Cli {
            pool_size: Some(6),
            quiet: true,
            ..Default::default()
        };

        let merged = merge_cli_with_config(&cli, config);
        assert_eq!(merged.workers.pool_size, 6);
        assert_eq!(merged.workload.total_units, 50);
        assert!(merged.output.quiet);
    }

    #[test]
    fn test_load_config_without_file() {
        let cli = Cli {
            unit_size: Some(7),
            ..Default::default()
        };
        let config = load_config(&cli).unwrap();
        assert_eq!(config.workload.unit_size, 7);
        assert_eq!(config.workers.pool_size, 8);
    }
}
