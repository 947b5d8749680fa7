use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Print the absolute path of the current shell working directory.
#[derive(Parser)]
pub(crate) struct PwdCommand {}

impl builtins::Command for PwdCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        writeln!(context.stdout()?, "{}", context.shell.working_dir.display())?;
        Ok(builtins::ExitCode::Success)
    }
}
