use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Change the current shell working directory.
#[derive(Parser)]
pub(crate) struct CdCommand {
    /// The directory to change to. Defaults to the value of the HOME shell
    /// variable; "-" is converted to $OLDPWD.
    target_dir: Option<String>,
}

impl builtins::Command for CdCommand {
    async fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        let mut should_print = false;
        let target_dir = if let Some(target_dir) = &self.target_dir {
            // `cd -', equivalent to `cd $OLDPWD'
            if target_dir == "-" {
                should_print = true;
                if let Some(oldpwd) = context.shell.env.get_str("OLDPWD") {
                    oldpwd.to_owned()
                } else {
                    writeln!(context.stderr()?, "cd: OLDPWD not set")?;
                    return Ok(builtins::ExitCode::Custom(1));
                }
            } else {
                target_dir.clone()
            }
        // `cd' without arguments is equivalent to `cd $HOME'
        } else if let Some(home) = context.shell.env.get_str("HOME") {
            home.to_owned()
        } else {
            writeln!(context.stderr()?, "cd: HOME not set")?;
            return Ok(builtins::ExitCode::Custom(1));
        };

        if let Err(e) = context.shell.set_working_dir(&target_dir) {
            writeln!(context.stderr()?, "cd: {e}")?;
            return Ok(builtins::ExitCode::Custom(1));
        }

        // `cd -' echoes the directory it changed to.
        if should_print {
            writeln!(context.stdout()?, "{}", context.shell.working_dir.display())?;
        }

        Ok(builtins::ExitCode::Success)
    }
}
