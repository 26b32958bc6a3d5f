//! Application configuration management.
//!
//! Settings are merged from default values, an optional configuration file and
//! environment variables, in increasing order of precedence.

use crate::CliError;
use econ_solver::models::Settings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, schemars::JsonSchema)]
pub struct AppConfig {
    /// Numeric settings of the engine (tolerance, sample counts, default table size)
    #[serde(default)]
    pub solver: Settings,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given on the command line
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `ECON_<SECTION>__<KEY>` to `<section>.<key>`:
    ///
    /// ```bash
    /// # Loosen the tolerance used to detect parallel curves and slack constraints
    /// export ECON_SOLVER__TOLERANCE=1e-6
    ///
    /// # Tabulate twenty workers when a firm scenario does not say otherwise
    /// export ECON_SOLVER__MAX_WORKERS=20
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(CliError::MissingConfig(path.to_path_buf()).into());
            }
        }

        config = config.add_source(
            config::Environment::with_prefix("ECON")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("econlab-{}.toml", std::process::id()));
        fs::write(&path, "[solver]\nmax_workers = 4\n").unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.solver.max_workers, 4);
        assert_eq!(config.solver.samples, Settings::default().samples);
    }

    #[test]
    fn missing_file() {
        let error = AppConfig::load(Some(Path::new("/nonexistent/econlab.toml"))).unwrap_err();
        assert!(error.to_string().contains("does not exist"));
    }
}
