/// Command-line interface for the standalone host
///
/// `tickerdesk [--config PATH] [--verbose] [--debug TAG]... <COMMAND>`
///
/// Commands:
/// - `serve` (default) - activate the plugin and serve the REST facade
/// - `call <tool> [json]` - run one tool and print its text
/// - `tools` - list tool definitions
use crate::constants::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tickerdesk", version, about = "Market data tools and REST facade")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log everything, including raw upstream bodies
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug output for a subsystem (api, cache, tools, webserver, config)
    #[arg(long = "debug", value_name = "TAG", global = true)]
    pub debug_tags: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Activate the plugin and serve the REST facade until Ctrl-C
    Serve,

    /// Invoke one tool and print its result
    Call {
        /// Tool name, e.g. quote
        tool: String,

        /// Arguments as a JSON object, e.g. '{"symbol":"AAPL"}'
        args: Option<String>,
    },

    /// List available tools
    Tools,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    /// Flags in the form `logger::init` understands
    pub fn logger_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.verbose {
            flags.push("--verbose".to_string());
        }
        if self.quiet {
            flags.push("--quiet".to_string());
        }
        for tag in &self.debug_tags {
            flags.push(format!("--debug-{}", tag.trim().to_lowercase()));
        }
        flags
    }
}
