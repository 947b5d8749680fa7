use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Exit the shell with the given status.
#[derive(Parser)]
pub(crate) struct ExitCommand {
    /// The exit status. Defaults to the status of the last command executed.
    code: Option<String>,
}

impl builtins::Command for ExitCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        let code = match &self.code {
            Some(code) => match code.parse::<i64>() {
                // The status is taken modulo 256, like a process exit code.
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                Ok(code) => (code & 0xFF) as u8,
                Err(_) => {
                    writeln!(context.stderr()?, "exit: {code}: numeric argument required")?;
                    // The shell stays alive when the argument is invalid.
                    return Ok(builtins::ExitCode::InvalidUsage);
                }
            },
            None => context.shell.last_exit_status,
        };

        Ok(builtins::ExitCode::ExitShell(code))
    }
}
