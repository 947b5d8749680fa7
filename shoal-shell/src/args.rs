//! Command-line argument parsing for the shell binary.

use std::io::IsTerminal;

use clap::Parser;

use crate::{events, productinfo};

const SHORT_DESCRIPTION: &str = "A small POSIX-style shell";

const LONG_DESCRIPTION: &str = r"
shoal is a Rust-implemented, POSIX-style shell built around a pipeline
execution engine. It runs commands read interactively, from a script file,
or from a -c string.
";

/// Parsed command-line arguments for the shoal shell.
#[derive(Parser)]
#[clap(name = productinfo::PRODUCT_NAME,
       version = productinfo::PRODUCT_VERSION,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION)]
pub struct CommandLineArgs {
    /// Execute the provided command and then exit.
    #[arg(short = 'c', value_name = "COMMAND")]
    pub command: Option<String>,

    /// Run in interactive mode.
    #[clap(short = 'i')]
    pub interactive: bool,

    /// Enable debug tracing for an event class.
    #[clap(long = "log-enable", value_name = "EVENT")]
    pub enabled_log_events: Vec<events::TraceEvent>,

    /// Path to script to execute.
    pub script_path: Option<String>,

    /// Arguments for the script.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub script_args: Vec<String>,
}

impl CommandLineArgs {
    /// Returns whether the shell session should be interactive: requested
    /// explicitly, or reading commands from a terminal.
    pub fn is_interactive(&self) -> bool {
        if self.interactive {
            return true;
        }
        if self.command.is_some() || self.script_path.is_some() {
            return false;
        }

        std::io::stdin().is_terminal()
    }
}
