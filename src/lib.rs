//! SCXML state machine compiler
//!
//! Reads a small subset of SCXML markup describing a flat state machine and
//! turns it into something usable.
//!
//! This library provides functionality for:
//! - Parsing and validating markup into a [`Document`](document::Document)
//! - Rendering the machine as a Graphviz digraph
//! - Generating a self-contained Rust module implementing the machine
//! - Running a machine in-process with caller-supplied hooks
//!
//! ```
//! use scxml_fsm::document::Document;
//!
//! let doc: Document = r#"<scxml name="pkg.Door">
//!     <state id="Closed"><transition event="Open" target="Opened"/></state>
//!     <state id="Opened"/>
//! </scxml>"#
//!     .parse()
//!     .unwrap();
//!
//! assert!(scxml_fsm::graph::to_dot(&doc).starts_with("digraph Door {"));
//! ```

pub mod cli;
pub mod codegen;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod markup;
pub mod runtime;

pub use config::{Config, LoggingConfig};
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging from the logging configuration
///
/// Logs go to stderr, or to `file` when one is configured, since stdout
/// carries the generated output.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use std::sync::Mutex;
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::Config(format!("Failed to open log file {:?}: {}", path, e)))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = config
        .file
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| Error::custom(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "scxml-fsm");
    }
}
