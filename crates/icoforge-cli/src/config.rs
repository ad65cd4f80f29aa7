//! Command line configuration
//!
//! Loaded from `--config <path>`, or from `icoforge.toml` in the working
//! directory when that file exists. Every field has a default, so an empty
//! file is a valid configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use icoforge_core::BatchPolicy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "icoforge.toml";

/// Settings shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where `build` writes the icon
    pub output: PathBuf,
    /// Report admissions and removals at info level
    pub verbose: bool,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Scan directories recursively
    pub recursive: bool,
    /// Stop at the first failing image, or skip it and continue
    pub policy: BatchPolicy,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("icon.ico"),
            verbose: false,
            log_level: "warn".to_string(),
            recursive: false,
            policy: BatchPolicy::StopOnFirstError,
        }
    }
}

impl CliConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this structure or the
    /// log level is unknown
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from `path`
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// `working_dir` is used if present, defaults otherwise.
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be loaded
    pub fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let candidate = working_dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load_from(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values serde cannot check
    ///
    /// # Errors
    /// Returns error if `log_level` is not a tracing level
    pub fn validate(&self) -> Result<()> {
        if LevelFilter::from_str(&self.log_level).is_err() {
            bail!(
                "unknown log level '{}', expected one of off, error, warn, info, debug, trace",
                self.log_level
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = CliConfig::from_toml(
            r#"
            output = "dist/app.ico"
            policy = "continue"
            "#,
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("dist/app.ico"));
        assert_eq!(config.policy, BatchPolicy::ContinueOnError);
        assert_eq!(config.log_level, "warn");
        assert!(!config.recursive);
    }

    #[test]
    fn full_policy_names_accepted() {
        let config = CliConfig::from_toml(r#"policy = "stop-on-first-error""#).unwrap();
        assert_eq!(config.policy, BatchPolicy::StopOnFirstError);
    }

    #[test]
    fn unknown_log_level_rejected() {
        let err = CliConfig::from_toml(r#"log_level = "loud""#).unwrap_err();
        assert!(err.to_string().contains("unknown log level"));
    }

    #[test]
    fn unknown_policy_rejected() {
        assert!(CliConfig::from_toml(r#"policy = "sometimes""#).is_err());
    }

    #[test]
    fn resolve_uses_working_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "recursive = true\n").unwrap();

        let config = CliConfig::resolve(None, dir.path()).unwrap();
        assert!(config.recursive);
    }

    #[test]
    fn resolve_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            CliConfig::resolve(None, dir.path()).unwrap(),
            CliConfig::default()
        );
    }

    #[test]
    fn resolve_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = CliConfig::resolve(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
