use std::io::Write;

use clap::Parser;
use itertools::Itertools;

use crate::{builtins, commands, env};

/// Mark shell variables for export to child process environments.
#[derive(Parser)]
pub(crate) struct ExportCommand {
    /// Names to export, each optionally with a `NAME=VALUE` assignment.
    /// Without arguments, lists the exported variables.
    names: Vec<String>,
}

impl builtins::Command for ExportCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        if self.names.is_empty() {
            return list_exports(&context);
        }

        let mut exit_code = builtins::ExitCode::Success;
        for entry in &self.names {
            let (name, value) = match entry.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (entry.as_str(), None),
            };

            if !env::is_valid_variable_name(name) {
                writeln!(
                    context.stderr()?,
                    "export: `{entry}': not a valid identifier"
                )?;
                exit_code = builtins::ExitCode::Custom(1);
                continue;
            }

            if let Some(value) = value {
                context.shell.env.set(name, value);
            }
            context.shell.env.export(name);
        }

        Ok(exit_code)
    }
}

/// Lists the exported variables sorted by name, in `declare -x` form.
fn list_exports(
    context: &commands::ExecutionContext<'_>,
) -> Result<builtins::ExitCode, crate::error::Error> {
    let mut stdout = context.stdout()?;
    for (name, var) in context
        .shell
        .env
        .iter()
        .filter(|(_, var)| var.exported)
        .sorted_by_key(|(name, _)| name.as_str())
    {
        if var.assigned {
            writeln!(stdout, "declare -x {name}=\"{}\"", var.value)?;
        } else {
            writeln!(stdout, "declare -x {name}")?;
        }
    }
    stdout.flush()?;

    Ok(builtins::ExitCode::Success)
}
