use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Print the exported variables, one NAME=VALUE per line, in the order they
/// were defined.
#[derive(Parser)]
pub(crate) struct EnvCommand {}

impl builtins::Command for EnvCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        let mut stdout = context.stdout()?;
        for (name, value) in context.shell.env.to_environ() {
            writeln!(stdout, "{name}={value}")?;
        }
        stdout.flush()?;

        Ok(builtins::ExitCode::Success)
    }
}
