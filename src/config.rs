//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables (`RUST_LOG` for the log filter)
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

/// DOT output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Graphviz shape of the base state node
    #[serde(default = "default_base_shape")]
    pub base_shape: String,

    /// Graphviz colour of the base state node
    #[serde(default = "default_base_color")]
    pub base_color: String,
}

/// Rust code generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Wrap the machine module in one `pub mod` per package segment
    #[serde(default = "default_true")]
    pub nest_package_modules: bool,

    /// Emit the "generated, do not edit" banner
    #[serde(default = "default_true")]
    pub header: bool,
}

// Default value functions

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_indent() -> usize {
    4
}

fn default_base_shape() -> String {
    "doublecircle".to_string()
}

fn default_base_color() -> String {
    "blue".to_string()
}

fn default_true() -> bool {
    true
}

// Default implementations

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            base_shape: default_base_shape(),
            base_color: default_base_color(),
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            nest_package_modules: true,
            header: true,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./scxml-fsm.toml
    /// 2. ~/.scxml-fsm/config.toml
    /// 3. /etc/scxml-fsm/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("scxml-fsm.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".scxml-fsm").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/scxml-fsm/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }
}
