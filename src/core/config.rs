//! Configuration management

use crate::core::error::{Error, Result};
use crate::graph::types::{Layer, NodeRole};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub colors: ColorConfig,
}

/// Which parts are visible right after a document is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialView {
    /// Leaves without incoming links, plus their groups
    #[default]
    Roots,
    /// Source nodes only, same as a reset
    Sources,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial visibility after load
    pub initial_view: InitialView,
    /// How many levels a trace-from highlights
    pub trace_depth: usize,
    /// Layers removed right after load
    pub hidden_layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub source: String,
    pub sink: String,
    pub default: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_view: InitialView::Roots,
            trace_depth: DEFAULT_TRACE_DEPTH,
            hidden_layers: vec![],
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            source: "gold".to_string(),
            sink: "aquamarine".to_string(),
            default: "lightblue".to_string(),
        }
    }
}

impl ColorConfig {
    /// Fill color for a leaf node
    pub fn color_for(&self, role: NodeRole) -> &str {
        match role {
            NodeRole::Source => &self.source,
            NodeRole::Sink => &self.sink,
            NodeRole::Plain => &self.default,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit file, defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::flowview_home()?.join("config.toml"))
    }

    /// Get the flowview home directory
    pub fn flowview_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("FLOWVIEW_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "flowview", "flowview")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine flowview home directory".to_string(),
            })
    }
}

pub const DEFAULT_TRACE_DEPTH: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.view.trace_depth, 4);
        assert_eq!(config.colors.color_for(NodeRole::Source), "gold");
    }

    #[test]
    fn test_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[view]
initial_view = "sources"
hidden_layers = ["package"]

[colors]
sink = "salmon"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.view.initial_view, InitialView::Sources);
        assert_eq!(config.view.hidden_layers, vec![Layer::Package]);
        assert_eq!(config.view.trace_depth, DEFAULT_TRACE_DEPTH);
        assert_eq!(config.colors.color_for(NodeRole::Sink), "salmon");
        assert_eq!(config.colors.color_for(NodeRole::Plain), "lightblue");
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[view]\ntrace_depth = \"deep\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(Error::TomlParse(_))
        ));
    }
}
