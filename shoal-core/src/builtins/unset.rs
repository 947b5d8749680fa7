use clap::Parser;

use crate::{builtins, commands};

/// Remove shell variables.
#[derive(Parser)]
pub(crate) struct UnsetCommand {
    /// The names of the variables to remove. Undefined names are ignored.
    names: Vec<String>,
}

impl builtins::Command for UnsetCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        for name in &self.names {
            context.shell.env.unset(name);
        }

        Ok(builtins::ExitCode::Success)
    }
}
