//! Layered settings.
//!
//! Defaults, then an optional settings file, then `CLUSTERWATCH_*`
//! environment variables (nested keys joined with `__`, e.g.
//! `CLUSTERWATCH_OUTPUT__PRETTY=true`). Command line flags are applied on
//! top by the binary.
//!
//! ```toml
//! [log]
//! filter = "clusterwatch=debug"
//!
//! [output]
//! pretty = true
//!
//! [pipeline]
//! units = ["health_counters"]
//!
//! [watch]
//! refresh_secs = 5
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "CLUSTERWATCH";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub output: OutputSettings,
    pub pipeline: PipelineSettings,
    pub watch: WatchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive, used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Names of the units to run. Empty runs every unit.
    pub units: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// How often to check the bundle file for changes.
    pub refresh_secs: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { refresh_secs: 1 }
    }
}

impl WatchSettings {
    pub fn refresh(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("pipeline.units")
                    .try_parsing(true),
            )
            .build()
            .context("loading settings")?;

        config
            .try_deserialize()
            .context("invalid settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log.filter, "info");
        assert!(!settings.output.pretty);
        assert!(settings.pipeline.units.is_empty());
        assert_eq!(settings.watch.refresh(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file() {
        let file = settings_file(
            r#"
            [output]
            pretty = true

            [pipeline]
            units = ["health_counters"]

            [watch]
            refresh_secs = 5
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();

        assert!(settings.output.pretty);
        assert_eq!(settings.pipeline.units, vec!["health_counters"]);
        assert_eq!(settings.watch.refresh_secs, 5);
        // untouched sections keep their defaults
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn test_zero_refresh_is_clamped() {
        let watch = WatchSettings { refresh_secs: 0 };
        assert_eq!(watch.refresh(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/clusterwatch.toml"))).is_err());
    }
}
