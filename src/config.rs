//! Service configuration

use anyhow::{bail, Context, Result};
use dispatch_shared::limits;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "DRONE_DISPATCH_CONFIG";

/// Config file looked up in the working directory when the variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "dispatch.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Seconds between battery sweeps
    pub sweep_interval_secs: u64,
    /// Register the demo catalog and fleet on boot
    pub seed_demo_fleet: bool,
    /// Tracing filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: limits::BATTERY_SWEEP_INTERVAL_SECS,
            seed_demo_fleet: false,
            log_filter: "info".into(),
        }
    }
}

impl DispatchConfig {
    /// Resolve and load the config file, falling back to defaults when
    /// no file is configured or present.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(&PathBuf::from(path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sweep_interval_secs == 0 {
            bail!("sweep_interval_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(3600));
        assert!(!config.seed_demo_fleet);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = DispatchConfig::from_toml("seed_demo_fleet = true\n").unwrap();
        assert!(config.seed_demo_fleet);
        assert_eq!(config.sweep_interval_secs, 3600);
    }

    #[test]
    fn test_full_file() {
        let raw = r#"
            sweep_interval_secs = 60
            seed_demo_fleet = true
            log_filter = "drone_dispatch=debug"
        "#;
        let config = DispatchConfig::from_toml(raw).unwrap();
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.log_filter, "drone_dispatch=debug");
    }

    #[test]
    fn test_rejects_bad_files() {
        assert!(DispatchConfig::from_toml("sweep_interval_secs = 0").is_err());
        assert!(DispatchConfig::from_toml("sweep_interval = 60").is_err());
        assert!(DispatchConfig::from_toml("sweep_interval_secs = \"hourly\"").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = DispatchConfig::from_file(Path::new("/nonexistent/dispatch.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
