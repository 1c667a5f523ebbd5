//! Analysis configuration, stored as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Source;
use crate::error::ConfigError;
use crate::metrics::MetricOptions;
use crate::recipe::traverse::FlattenOptions;

/// Result type for config operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings for an analysis run. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Source label that marks bulk raw material.
    pub factory_source: String,
    /// Products whose raw-material demand is reported by default.
    pub factory_targets: Vec<String>,
    /// Optional limit on recipe nesting depth.
    pub max_depth: Option<usize>,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            factory_source: Source::FACTORY.into(),
            factory_targets: vec!["donuts".into(), "couch".into(), "lawn mower".into()],
            max_depth: None,
            log_level: "info".into(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Options passed to the metric computations.
    pub fn metric_options(&self) -> MetricOptions {
        MetricOptions {
            factory_source: self.factory_source.clone(),
            flatten: FlattenOptions {
                max_depth: self.max_depth,
            },
        }
    }
}
