//! Tool configuration.
//!
//! Loaded from `codemodel.yaml` in the working directory, or from a file passed with
//! `--config`. Every field has a default, so an empty file is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::FormatOptions;

/// File name looked up when no configuration is passed explicitly.
pub const CONFIG_FILE_NAME: &str = "codemodel.yaml";

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Declaration rendering used by `show`.
    #[serde(default)]
    pub format: FormatOptions,
    #[serde(default)]
    pub check: CheckConfig,
    /// Glob patterns for manifest paths to skip when walking directories (e.g. "**/fixtures/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

/// What makes `check` fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Fail when a class or structure leaves an interface member unimplemented (default: true)
    #[serde(default = "default_true")]
    pub fail_on_missing: bool,
    /// Fail when any model carries load errors (default: false)
    #[serde(default)]
    pub fail_on_load_errors: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fail_on_missing: true,
            fail_on_load_errors: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else `codemodel.yaml` in `dir` if present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::parse_file(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using discovered config");
            Self::parse_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Check that every excluded_paths pattern compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exclusion_set().map(|_| ())
    }

    /// Compile excluded_paths into one matcher.
    pub fn exclusion_set(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Pattern {
            pattern: self.excluded_paths.join(", "),
            source,
        })
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Patterns that fail to compile never match.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }
        let path_str = path.to_string_lossy();
        self.excluded_paths.iter().any(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
format:
  include_attributes: false
check:
  fail_on_load_errors: true
excluded_paths:
  - "**/generated/**"
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert!(!config.format.include_attributes);
        assert!(config.format.include_security);
        assert!(config.check.fail_on_missing);
        assert!(config.check.fail_on_load_errors);
        assert_eq!(config.excluded_paths.len(), 1);
    }

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.check.fail_on_missing);
        assert!(!config.check.fail_on_load_errors);
    }

    #[test]
    fn test_path_exclusion() {
        let config = Config {
            excluded_paths: vec!["**/generated/**".into(), "*.json".into()],
            ..Config::default()
        };
        assert!(config.is_path_excluded(Path::new("src/generated/api.yaml")));
        assert!(config.is_path_excluded(Path::new("shapes.json")));
        assert!(!config.is_path_excluded(Path::new("src/shapes.yaml")));
        assert!(!Config::default().is_path_excluded(Path::new("anything.yaml")));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Config::from_yaml_str("excluded_paths: [\"a[\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap(), Config::default());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "check:\n  fail_on_missing: false\n").unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert!(!config.check.fail_on_missing);

        let missing = dir.path().join("nope.yaml");
        let err = Config::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
