//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// State machine markup compiler
#[derive(Parser, Debug)]
#[command(name = "scxml-fsm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCXML_FSM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the machine as a Graphviz digraph
    Dot {
        /// Markup input file
        input: PathBuf,
    },

    /// Print a Rust module implementing the machine
    Rust {
        /// Markup input file
        input: PathBuf,

        /// Override the class name taken from the markup
        #[arg(long)]
        class_name: Option<String>,
    },

    /// Validate a markup file and summarize the machine
    Check {
        /// Markup input file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Start the machine and push events through it
    Run {
        /// Markup input file
        input: PathBuf,

        /// Events, in the order they are pushed
        events: Vec<String>,
    },
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Table,
}

/// Execute the CLI command, writing its output to stdout
pub fn execute(args: Cli, config: Config) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match args.command {
        Commands::Dot { input } => commands::dot::execute(&input, &config, &mut stdout),
        Commands::Rust { input, class_name } => {
            commands::rust::execute(&input, class_name, &config, &mut stdout)
        }
        Commands::Check { input, output } => commands::check::execute(&input, output, &mut stdout),
        Commands::Run { input, events } => commands::run::execute(&input, &events, &mut stdout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["scxml-fsm", "check", "machine.xml", "--output", "json"])
            .unwrap();

        match cli.command {
            Commands::Check { input, output } => {
                assert_eq!(input, PathBuf::from("machine.xml"));
                assert_eq!(output, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_run_collects_events() {
        let cli = Cli::try_parse_from([
            "scxml-fsm",
            "--config",
            "custom.toml",
            "run",
            "machine.xml",
            "EventA",
            "Reset",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Run { events, .. } => assert_eq!(events, vec!["EventA", "Reset"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["scxml-fsm", "dot"]).is_err());
    }
}
