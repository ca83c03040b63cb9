//! Live HTTP probing (requires the "probe" feature).
//!
//! This module turns probewatch from a viewer into a self-contained
//! monitor: a background task probes the configured targets on an interval
//! and feeds the TUI through the standard channel source.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     probewatch Process                        │
//! │  ┌──────────┐ GET   ┌─────────┐                               │
//! │  │ Targets  │◀──────│ Prober  │  (one round per interval,     │
//! │  └──────────┘       └────┬────┘   targets probed concurrently)│
//! │                          │ outcomes                           │
//! │                          ▼                                    │
//! │                 ┌─────────────────┐     watch::Sender         │
//! │                 │ TargetState set │──────────────┐            │
//! │                 └─────────────────┘              ▼            │
//! │                                     ┌────────────────────┐    │
//! │                                     │ ChannelSource (TUI)│    │
//! │                                     └────────────────────┘    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Probe targets listed in a TOML file
//! probewatch --probe targets.toml
//!
//! # Probe ad-hoc targets
//! probewatch --target https://example.com --target https://grafana.example
//! ```

mod prober;
mod source;

pub use prober::{ProbeOutcome, Prober};
pub use source::start_collector;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;

fn default_interval() -> String {
    "1m".to_string()
}

/// Probe configuration loaded from a TOML file.
///
/// ```toml
/// interval = "1m"
/// targets = [
///     "https://example.com",
///     "https://grafana.example",
/// ]
/// ```
///
/// Values can be overridden with `PROBEWATCH_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSettings {
    pub targets: Vec<String>,
    #[serde(default = "default_interval")]
    pub interval: String,
}

impl ProbeSettings {
    /// Load settings from a TOML file with environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("PROBEWATCH"))
            .build()
            .with_context(|| format!("loading probe config {}", path.display()))?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Build settings from ad-hoc command line targets.
    pub fn from_targets(targets: Vec<String>, interval: &str) -> Result<Self> {
        let settings = Self {
            targets,
            interval: interval.to_string(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            bail!("No probe targets configured");
        }
        parse_duration(&self.interval)
            .with_context(|| format!("invalid probe interval '{}'", self.interval))?;
        Ok(())
    }

    /// The probe interval as a Duration.
    pub fn interval(&self) -> Duration {
        // validate() already proved this parses
        parse_duration(&self.interval).unwrap_or(Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_settings_from_toml() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
interval = "30s"
targets = ["https://example.com", "https://grafana.example"]
"#
        )
        .unwrap();
        file.flush().unwrap();

        let settings = ProbeSettings::load(file.path()).unwrap();
        assert_eq!(settings.targets.len(), 2);
        assert_eq!(settings.interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_interval_defaults_to_one_minute() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, r#"targets = ["https://example.com"]"#).unwrap();
        file.flush().unwrap();

        let settings = ProbeSettings::load(file.path()).unwrap();
        assert_eq!(settings.interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_empty_targets_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "targets = []").unwrap();
        file.flush().unwrap();

        assert!(ProbeSettings::load(file.path()).is_err());
    }

    #[test]
    fn test_bad_interval_rejected() {
        assert!(
            ProbeSettings::from_targets(vec!["https://example.com".into()], "whenever").is_err()
        );
    }

    #[test]
    fn test_from_targets() {
        let settings =
            ProbeSettings::from_targets(vec!["https://example.com".into()], "5m").unwrap();
        assert_eq!(settings.interval(), Duration::from_secs(300));
    }
}
