use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Write arguments to standard output.
#[derive(Parser)]
#[clap(disable_help_flag = true)]
pub(crate) struct EchoCommand {
    /// The text to write. A leading "-n" suppresses the trailing newline;
    /// anything else is written literally.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl builtins::Command for EchoCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        let mut args = self.args.as_slice();
        let mut trailing_newline = true;
        if let Some((first, rest)) = args.split_first() {
            if first == "-n" {
                trailing_newline = false;
                args = rest;
            }
        }

        let mut stdout = context.stdout()?;
        write!(stdout, "{}", args.join(" "))?;
        if trailing_newline {
            writeln!(stdout)?;
        }
        stdout.flush()?;

        Ok(builtins::ExitCode::Success)
    }
}
